//! Burner wallet lifecycle management.
//!
//! # Responsibilities
//! - Generate and persist the temporary signing keypair
//! - Enforce the 24-hour expiry (background timer + lazy checks)
//! - Gate signing behind an explicit connected state
//! - Notify observers of lifecycle transitions
//!
//! # Design Decisions
//! - The persisted record is the source of truth; in-memory state is
//!   rebuilt from it on construction and on `revalidate`
//! - Corrupt or mismatched records are purged and treated as absence,
//!   never surfaced to callers
//! - The expiry timer is an optimization: every entry point that hands
//!   out capability re-checks expiry itself, so a suspended timer can
//!   never extend a wallet's life
//!
//! # Security
//! - Secret material leaves the manager only via `create_wallet`'s
//!   one-time backup and the explicit `export_secret_key` call
//! - Keys are never logged

use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::chain::{Pubkey, Transaction};
use crate::wallet::keys::BurnerKeypair;
use crate::wallet::store::KeyValueStore;
use crate::wallet::types::{StoredWallet, WalletBackup, WalletError, WalletEvent, WalletResult};
use crate::wallet::WalletConfig;

/// Margin added to the expiry timer so the wake-up lands past the
/// deadline under clock granularity differences.
const EXPIRY_TIMER_SLACK: Duration = Duration::from_millis(50);

struct LoadedWallet {
    keypair: BurnerKeypair,
    expires_at: DateTime<Utc>,
}

struct ManagerState {
    wallet: Option<LoadedWallet>,
    connected: bool,
}

/// Manages a single temporary signing identity: generation, persistence,
/// expiry, and signing, behind the generic wallet capability surface.
pub struct BurnerWalletManager {
    store: Arc<dyn KeyValueStore>,
    config: WalletConfig,
    state: Mutex<ManagerState>,
    events: broadcast::Sender<WalletEvent>,
    expiry_task: Mutex<Option<JoinHandle<()>>>,
    weak_self: Weak<BurnerWalletManager>,
}

impl BurnerWalletManager {
    /// Construct the manager, loading any persisted wallet.
    ///
    /// An expired or corrupt record found at this point is purged and the
    /// manager starts absent.
    pub fn new(store: Arc<dyn KeyValueStore>, config: WalletConfig) -> Arc<Self> {
        let (events, _) = broadcast::channel(16);
        let manager = Arc::new_cyclic(|weak_self| Self {
            store,
            config,
            state: Mutex::new(ManagerState {
                wallet: None,
                connected: false,
            }),
            events,
            expiry_task: Mutex::new(None),
            weak_self: weak_self.clone(),
        });

        let loaded = manager.load_record();
        if let Some(wallet) = loaded {
            tracing::info!(
                public_key = %wallet.keypair.pubkey(),
                expires_at = %wallet.expires_at,
                "Persisted burner wallet loaded"
            );
            manager
                .state
                .lock()
                .expect("wallet state mutex poisoned")
                .wallet = Some(wallet);
            manager.rearm_expiry_timer();
        }
        manager
    }

    /// Generate a fresh wallet, persist it, and return the raw key
    /// material once for mandatory user backup.
    ///
    /// Replaces any existing wallet; if one was connected, observers see a
    /// disconnect first.
    pub fn create_wallet(&self) -> WalletResult<WalletBackup> {
        let keypair = BurnerKeypair::generate()?;
        let created_at = Utc::now();
        let expires_at = created_at + self.expiry_duration();

        let record = StoredWallet {
            public_key: keypair.pubkey().to_string(),
            secret_key: keypair.to_secret_bytes().to_vec(),
            created_at,
        };
        let json = serde_json::to_string(&record).map_err(|e| WalletError::Storage(e.to_string()))?;
        // Persist before exposing the new wallet anywhere.
        self.store
            .set(&self.config.storage_key, &json)
            .map_err(|e| WalletError::Storage(e.to_string()))?;

        let backup = WalletBackup {
            public_key: keypair.pubkey(),
            secret_key: keypair.to_secret_bytes(),
        };

        let was_connected = {
            let mut state = self.state.lock().expect("wallet state mutex poisoned");
            let was_connected = state.connected;
            state.wallet = Some(LoadedWallet { keypair, expires_at });
            state.connected = false;
            was_connected
        };
        if was_connected {
            let _ = self.events.send(WalletEvent::Disconnected);
        }
        self.rearm_expiry_timer();
        let _ = self.events.send(WalletEvent::Created(backup.public_key));

        tracing::info!(
            public_key = %backup.public_key,
            expires_at = %expires_at,
            "Burner wallet created"
        );
        Ok(backup)
    }

    /// Transition to connected, if and only if a non-expired wallet is
    /// loaded. Idempotent while connected.
    pub fn connect(&self) -> WalletResult<()> {
        if self.purge_if_expired() {
            return Err(WalletError::Expired);
        }

        let pubkey = {
            let mut state = self.state.lock().expect("wallet state mutex poisoned");
            match &state.wallet {
                None => return Err(WalletError::NotFound),
                Some(_) if state.connected => return Ok(()),
                Some(wallet) => {
                    let pubkey = wallet.keypair.pubkey();
                    state.connected = true;
                    pubkey
                }
            }
        };

        let _ = self.events.send(WalletEvent::Connected(pubkey));
        tracing::info!(public_key = %pubkey, "Burner wallet connected");
        Ok(())
    }

    /// Clear connected state, purge persisted material, cancel the expiry
    /// timer, and notify observers. Never fails; safe to call repeatedly.
    pub fn disconnect(&self) {
        {
            let mut state = self.state.lock().expect("wallet state mutex poisoned");
            state.wallet = None;
            state.connected = false;
        }
        self.cancel_expiry_timer();
        self.remove_record();
        let _ = self.events.send(WalletEvent::Disconnected);
        tracing::info!("Burner wallet disconnected and purged");
    }

    /// Sign a transaction with the wallet's key, appending the signature.
    /// Requires connected state.
    pub fn sign_transaction(&self, mut tx: Transaction) -> WalletResult<Transaction> {
        self.purge_if_expired();

        let state = self.state.lock().expect("wallet state mutex poisoned");
        if !state.connected {
            return Err(WalletError::NotConnected);
        }
        let wallet = state.wallet.as_ref().ok_or(WalletError::NotConnected)?;

        let signature = wallet.keypair.sign(&tx.message);
        tx.append_signature(wallet.keypair.pubkey(), signature);
        Ok(tx)
    }

    /// Sign each transaction independently; the first failure aborts the
    /// batch.
    pub fn sign_all_transactions(&self, txs: Vec<Transaction>) -> WalletResult<Vec<Transaction>> {
        txs.into_iter()
            .map(|tx| self.sign_transaction(tx))
            .collect()
    }

    /// Time left until expiry; zero when no wallet is loaded. Pure read.
    pub fn time_remaining(&self) -> Duration {
        let state = self.state.lock().expect("wallet state mutex poisoned");
        match &state.wallet {
            Some(wallet) => (wallet.expires_at - Utc::now())
                .to_std()
                .unwrap_or(Duration::ZERO),
            None => Duration::ZERO,
        }
    }

    /// Re-check persisted state and expiry.
    ///
    /// Hosts call this from whatever lifecycle hook signals "the app is
    /// back in the foreground" (tab visibility, window focus, resume).
    /// Correctness never depends on it: the timer and the lazy checks in
    /// `connect`/`sign_*` already enforce expiry. It exists so a wallet
    /// replaced or purged by another session is noticed promptly.
    pub fn revalidate(&self) {
        self.purge_if_expired();
        let loaded = self.load_record();

        let (changed, was_connected) = {
            let mut state = self.state.lock().expect("wallet state mutex poisoned");
            let unchanged = matches!(
                (&state.wallet, &loaded),
                (Some(current), Some(new)) if current.keypair.pubkey() == new.keypair.pubkey()
            );
            if unchanged {
                (false, false)
            } else {
                let was_connected = state.connected;
                let had_any = state.wallet.is_some() || loaded.is_some();
                state.wallet = loaded;
                state.connected = false;
                (had_any, was_connected)
            }
        };

        if changed {
            if was_connected {
                let _ = self.events.send(WalletEvent::Disconnected);
            }
            tracing::debug!("Burner wallet state reloaded from storage");
            self.rearm_expiry_timer();
        }
    }

    /// The wallet's public key, if one is loaded.
    pub fn public_key(&self) -> Option<Pubkey> {
        let state = self.state.lock().expect("wallet state mutex poisoned");
        state.wallet.as_ref().map(|w| w.keypair.pubkey())
    }

    pub fn is_connected(&self) -> bool {
        self.state
            .lock()
            .expect("wallet state mutex poisoned")
            .connected
    }

    /// Export the full 64-byte secret for user-initiated backup.
    pub fn export_secret_key(&self) -> WalletResult<[u8; 64]> {
        if self.purge_if_expired() {
            return Err(WalletError::Expired);
        }
        let state = self.state.lock().expect("wallet state mutex poisoned");
        state
            .wallet
            .as_ref()
            .map(|w| w.keypair.to_secret_bytes())
            .ok_or(WalletError::NotFound)
    }

    /// Subscribe to lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<WalletEvent> {
        self.events.subscribe()
    }

    fn expiry_duration(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.config.expiry_secs as i64)
    }

    /// Purge the wallet if it is past expiry. Returns true if a purge
    /// happened on this call.
    fn purge_if_expired(&self) -> bool {
        {
            let mut state = self.state.lock().expect("wallet state mutex poisoned");
            match &state.wallet {
                Some(wallet) if Utc::now() >= wallet.expires_at => {
                    state.wallet = None;
                    state.connected = false;
                }
                _ => return false,
            }
        }
        self.cancel_expiry_timer();
        self.remove_record();
        let _ = self.events.send(WalletEvent::Expired);
        tracing::info!("Burner wallet expired and was purged");
        true
    }

    /// Read, parse, and validate the persisted record. Corrupt, mismatched,
    /// or expired records are purged from storage and reported as absent.
    fn load_record(&self) -> Option<LoadedWallet> {
        let raw = match self.store.get(&self.config.storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "Wallet storage read failed, treating as absent");
                return None;
            }
        };

        let record: StoredWallet = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "Corrupt wallet record, purging");
                self.remove_record();
                return None;
            }
        };

        let keypair = match BurnerKeypair::from_secret_bytes(&record.secret_key) {
            Ok(keypair) => keypair,
            Err(e) => {
                tracing::warn!(error = %e, "Unusable wallet record, purging");
                self.remove_record();
                return None;
            }
        };
        if keypair.pubkey().to_string() != record.public_key {
            tracing::warn!("Wallet record public key mismatch, purging");
            self.remove_record();
            return None;
        }

        let expires_at = record.created_at + self.expiry_duration();
        if Utc::now() >= expires_at {
            self.remove_record();
            tracing::info!("Expired wallet record purged on load");
            return None;
        }

        Some(LoadedWallet { keypair, expires_at })
    }

    fn remove_record(&self) {
        if let Err(e) = self.store.remove(&self.config.storage_key) {
            tracing::warn!(error = %e, "Failed to purge wallet record from storage");
        }
    }

    /// (Re)arm the background expiry timer from the current wallet's
    /// deadline. Without an async runtime the timer is skipped and the
    /// lazy checks alone enforce expiry.
    fn rearm_expiry_timer(&self) {
        let mut task = self.expiry_task.lock().expect("expiry task mutex poisoned");
        if let Some(handle) = task.take() {
            handle.abort();
        }

        let expires_at = {
            let state = self.state.lock().expect("wallet state mutex poisoned");
            match &state.wallet {
                Some(wallet) => wallet.expires_at,
                None => return,
            }
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("No async runtime, expiry enforced lazily only");
            return;
        };

        let remaining = (expires_at - Utc::now()).to_std().unwrap_or(Duration::ZERO);
        let weak = self.weak_self.clone();
        *task = Some(runtime.spawn(async move {
            tokio::time::sleep(remaining + EXPIRY_TIMER_SLACK).await;
            if let Some(manager) = weak.upgrade() {
                manager.purge_if_expired();
            }
        }));
    }

    fn cancel_expiry_timer(&self) {
        let mut task = self.expiry_task.lock().expect("expiry task mutex poisoned");
        if let Some(handle) = task.take() {
            handle.abort();
        }
    }
}

impl std::fmt::Debug for BurnerWalletManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BurnerWalletManager")
            .field("storage_key", &self.config.storage_key)
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}
