//! Client-side core for the token launchpad.
//!
//! Two subsystems do the real work: the burner wallet lifecycle
//! (`wallet`, with chain primitives in `chain`) and the rate-limited
//! cached fetch layer (`fetch`) that the market data services
//! (`services`) route every upstream call through.

pub mod chain;
pub mod config;
pub mod fetch;
pub mod observability;
pub mod services;
pub mod wallet;

pub use config::ClientConfig;
pub use fetch::{FetchError, FetchGate, FetchOptions};
pub use wallet::{BurnerWalletManager, WalletAdapter, WalletError};
