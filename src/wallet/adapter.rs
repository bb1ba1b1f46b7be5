//! Generic wallet capability surface.
//!
//! Call sites that build and submit transactions accept any
//! [`WalletAdapter`], so the burner identity is interchangeable with an
//! extension-backed wallet (or a hardware signer) wired in by the host.

use crate::chain::{Pubkey, Transaction};
use crate::wallet::manager::BurnerWalletManager;
use crate::wallet::types::WalletResult;

/// The capability set every wallet identity exposes.
pub trait WalletAdapter: Send + Sync {
    /// The identity's public key, if one is available.
    fn public_key(&self) -> Option<Pubkey>;

    /// Whether the wallet is currently connected.
    fn connected(&self) -> bool;

    /// Establish the connection. Implementations define which failures
    /// are recoverable by prompting the user.
    fn connect(&self) -> WalletResult<()>;

    /// Tear down the connection. Must be infallible and idempotent.
    fn disconnect(&self);

    /// Sign one transaction, appending this identity's signature.
    fn sign_transaction(&self, tx: Transaction) -> WalletResult<Transaction>;

    /// Sign a batch; the first failure aborts.
    fn sign_all_transactions(&self, txs: Vec<Transaction>) -> WalletResult<Vec<Transaction>>;
}

impl WalletAdapter for BurnerWalletManager {
    fn public_key(&self) -> Option<Pubkey> {
        BurnerWalletManager::public_key(self)
    }

    fn connected(&self) -> bool {
        self.is_connected()
    }

    fn connect(&self) -> WalletResult<()> {
        BurnerWalletManager::connect(self)
    }

    fn disconnect(&self) {
        BurnerWalletManager::disconnect(self)
    }

    fn sign_transaction(&self, tx: Transaction) -> WalletResult<Transaction> {
        BurnerWalletManager::sign_transaction(self, tx)
    }

    fn sign_all_transactions(&self, txs: Vec<Transaction>) -> WalletResult<Vec<Transaction>> {
        BurnerWalletManager::sign_all_transactions(self, txs)
    }
}
