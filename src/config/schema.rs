//! Configuration schema definitions.
//!
//! All types derive Serde traits and default every field, so a missing or
//! minimal config file still yields a runnable client.

use serde::{Deserialize, Serialize};

use crate::fetch::FetchOptions;

/// Root configuration for the launchpad client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Burner wallet settings.
    pub wallet: WalletConfig,

    /// Market data (prices, stats, trending) settings.
    pub market_data: MarketDataConfig,

    /// Token metadata lookup settings.
    pub metadata: MetadataConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Burner wallet configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Path of the file backing the key-value store.
    pub storage_path: String,

    /// Storage key the wallet record is persisted under.
    pub storage_key: String,

    /// Wallet lifetime from creation, in seconds.
    pub expiry_secs: u64,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            storage_path: "launchpad-wallet.json".to_string(),
            storage_key: "launchpad.burner_wallet".to_string(),
            expiry_secs: 86_400,
        }
    }
}

/// Market data API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MarketDataConfig {
    /// Base URL of the market data API.
    pub endpoint: String,

    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Fetch gating for price/stats lookups.
    pub fetch: FetchOptions,

    /// Number of entries requested from the trending list.
    pub trending_limit: usize,
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.coingecko.com/api/v3".to_string(),
            request_timeout_secs: 10,
            fetch: FetchOptions::default(),
            trending_limit: 10,
        }
    }
}

/// Token metadata lookup configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Gateway base used to resolve ipfs:// metadata URIs.
    pub ipfs_gateway: String,

    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Fetch gating for metadata documents.
    pub fetch: FetchOptions,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            ipfs_gateway: "https://ipfs.io".to_string(),
            request_timeout_secs: 10,
            fetch: FetchOptions {
                // Metadata documents are immutable in practice; cache much
                // longer than market data.
                ttl_ms: 3_600_000,
                ..FetchOptions::default()
            },
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
