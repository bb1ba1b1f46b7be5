//! Burner wallet subsystem.
//!
//! # Data Flow
//! ```text
//! host UI action (create / connect / disconnect / sign)
//!     → manager.rs (lifecycle state machine, expiry enforcement)
//!         → keys.rs (ed25519 keypair, signing)
//!         → store.rs (injected key-value persistence)
//!     → adapter.rs (generic capability surface for call sites)
//!
//! background: expiry timer → purge → event to observers
//! ```
//!
//! # Design Decisions
//! - One wallet per manager; creating again replaces the old identity
//! - Expiry is enforced lazily at every capability entry point, so the
//!   background timer is a latency optimization, not a correctness hook
//! - The persisted JSON record layout is a compatibility surface

pub mod adapter;
pub mod keys;
pub mod manager;
pub mod store;
pub mod types;

// Re-export WalletConfig next to the manager that consumes it.
pub use crate::config::schema::WalletConfig;
pub use adapter::WalletAdapter;
pub use keys::BurnerKeypair;
pub use manager::BurnerWalletManager;
pub use store::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, StoreError};
pub use types::{StoredWallet, WalletBackup, WalletError, WalletEvent, WalletResult};
