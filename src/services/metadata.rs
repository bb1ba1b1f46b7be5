//! Off-chain token metadata lookups.

use url::Url;

use crate::config::MetadataConfig;
use crate::fetch::{FetchError, FetchGate, FetchResult};
use crate::services::http::{build_client, get_json};
use crate::services::types::TokenMetadata;

/// Fetches token metadata documents by URI, resolving `ipfs://` URIs
/// through the configured gateway. Documents are effectively immutable,
/// so the gate is typically configured with a long TTL.
pub struct MetadataService {
    http: reqwest::Client,
    ipfs_gateway: Url,
    gate: FetchGate<TokenMetadata>,
}

impl MetadataService {
    pub fn new(config: &MetadataConfig) -> FetchResult<Self> {
        let ipfs_gateway = Url::parse(&config.ipfs_gateway)
            .map_err(|e| FetchError::Transport(format!("ipfs gateway: {e}")))?;
        Ok(Self {
            http: build_client(config.request_timeout_secs)?,
            ipfs_gateway,
            gate: FetchGate::new(config.fetch.clone()),
        })
    }

    /// Fetch the metadata document at `uri`.
    pub async fn token_metadata(&self, uri: &str) -> FetchResult<TokenMetadata> {
        let url = resolve_uri(&self.ipfs_gateway, uri)?;
        let key = url.to_string();
        self.gate
            .fetch(&key, || async { get_json(&self.http, url.clone()).await })
            .await
    }
}

/// Turn a metadata URI into a fetchable URL: http(s) passes through,
/// `ipfs://<cid>[/path]` is rewritten onto the gateway.
fn resolve_uri(gateway: &Url, uri: &str) -> FetchResult<Url> {
    if let Some(rest) = uri.strip_prefix("ipfs://") {
        let rest = rest.strip_prefix("ipfs/").unwrap_or(rest);
        let joined = format!(
            "{}/ipfs/{}",
            gateway.as_str().trim_end_matches('/'),
            rest.trim_start_matches('/')
        );
        return Url::parse(&joined)
            .map_err(|e| FetchError::Transport(format!("metadata uri: {e}")));
    }

    let url =
        Url::parse(uri).map_err(|e| FetchError::Transport(format!("metadata uri: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(FetchError::Transport(format!(
            "unsupported metadata uri scheme '{other}'"
        ))),
    }
}
