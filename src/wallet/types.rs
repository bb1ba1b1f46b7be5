//! Wallet error, event, and persisted-record definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chain::Pubkey;

/// Errors that can occur during burner wallet operations.
#[derive(Debug, Error)]
pub enum WalletError {
    /// Keypair generation failed at the entropy/crypto layer. Fatal.
    #[error("keypair generation failed: {0}")]
    Generation(String),

    /// No burner wallet exists; the caller should prompt creation.
    #[error("no burner wallet found")]
    NotFound,

    /// A wallet exists but is past its expiry and has been purged;
    /// the caller should prompt re-creation.
    #[error("burner wallet expired")]
    Expired,

    /// Signing was attempted without an active connection.
    #[error("wallet not connected")]
    NotConnected,

    /// The persistence layer rejected a write.
    #[error("wallet storage error: {0}")]
    Storage(String),
}

/// Result type for wallet operations.
pub type WalletResult<T> = Result<T, WalletError>;

/// Lifecycle notifications emitted to observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    /// A fresh wallet was generated and persisted.
    Created(Pubkey),
    /// The wallet entered the connected state.
    Connected(Pubkey),
    /// The wallet was disconnected and its material purged.
    Disconnected,
    /// The wallet reached its expiry and was purged.
    Expired,
}

/// The persisted wallet record.
///
/// Field names and encodings are a compatibility surface: base-58 public
/// key, raw secret byte array, ISO-8601 creation timestamp, stored as one
/// JSON document under a fixed storage key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredWallet {
    pub public_key: String,
    pub secret_key: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

/// One-time key material handed back from wallet creation so the user can
/// back it up. Never retained by the manager in this form.
#[derive(Debug, Clone)]
pub struct WalletBackup {
    pub public_key: Pubkey,
    pub secret_key: [u8; 64],
}
