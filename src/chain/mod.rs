//! Minimal host-chain primitives.
//!
//! # Responsibilities
//! - Public key / signature newtypes with base-58 text forms
//! - Transaction container with the partial-sign convention
//!
//! The chain itself (RPC submission, program calls) is an external
//! collaborator; nothing here talks to the network.

pub mod transaction;
pub mod types;

pub use transaction::Transaction;
pub use types::{ChainError, Pubkey, Signature};
