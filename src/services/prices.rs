//! Price, stats, and trending lookups against the market data API.
//!
//! Every lookup class goes through its own [`FetchGate`], so SOL spot
//! polling, per-token stats, and the trending list each get their own
//! cache and share one request window per service instance.

use std::collections::HashMap;

use serde::Deserialize;
use url::Url;

use crate::config::MarketDataConfig;
use crate::fetch::{FetchError, FetchGate, FetchResult};
use crate::services::http::{build_client, get_json};
use crate::services::types::{TokenStats, TrendingToken};

/// Market data lookups. Construct once at the composition root and share.
pub struct PriceService {
    http: reqwest::Client,
    endpoint: Url,
    trending_limit: usize,
    sol_price: FetchGate<f64>,
    stats: FetchGate<TokenStats>,
    trending: FetchGate<Vec<TrendingToken>>,
}

impl PriceService {
    pub fn new(config: &MarketDataConfig) -> FetchResult<Self> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| FetchError::Transport(format!("market data endpoint: {e}")))?;
        Ok(Self {
            http: build_client(config.request_timeout_secs)?,
            endpoint,
            trending_limit: config.trending_limit,
            sol_price: FetchGate::new(config.fetch.clone()),
            stats: FetchGate::new(config.fetch.clone()),
            trending: FetchGate::new(config.fetch.clone()),
        })
    }

    /// Current SOL spot price in USD.
    pub async fn sol_price_usd(&self) -> FetchResult<f64> {
        let url = self.join("simple/price?ids=solana&vs_currencies=usd")?;
        self.sol_price
            .fetch("sol", || async {
                let body: SimplePriceResponse = get_json(&self.http, url.clone()).await?;
                price_from_simple(&body, "solana")
            })
            .await
    }

    /// Market statistics for one token by its API identifier.
    pub async fn token_stats(&self, id: &str) -> FetchResult<TokenStats> {
        let url = self.join(&format!(
            "coins/{id}?localization=false&tickers=false&market_data=true\
             &community_data=false&developer_data=false"
        ))?;
        self.stats
            .fetch(id, || async {
                let body: CoinResponse = get_json(&self.http, url.clone()).await?;
                stats_from_coin(body)
            })
            .await
    }

    /// The current trending list, truncated to the configured limit.
    pub async fn trending(&self) -> FetchResult<Vec<TrendingToken>> {
        let url = self.join("search/trending")?;
        let limit = self.trending_limit;
        self.trending
            .fetch("trending", || async {
                let body: TrendingResponse = get_json(&self.http, url.clone()).await?;
                let mut tokens = trending_from_response(body);
                tokens.truncate(limit);
                Ok(tokens)
            })
            .await
    }

    fn join(&self, path_and_query: &str) -> FetchResult<Url> {
        self.endpoint
            .join(&format!(
                "{}/{}",
                self.endpoint.path().trim_end_matches('/'),
                path_and_query
            ))
            .map_err(|e| FetchError::Transport(format!("market data url: {e}")))
    }
}

// --- wire shapes ---

type SimplePriceResponse = HashMap<String, HashMap<String, f64>>;

#[derive(Debug, Deserialize)]
struct CoinResponse {
    market_data: Option<CoinMarketData>,
}

#[derive(Debug, Deserialize)]
struct CoinMarketData {
    #[serde(default)]
    current_price: HashMap<String, f64>,
    #[serde(default)]
    market_cap: HashMap<String, f64>,
    #[serde(default)]
    total_volume: HashMap<String, f64>,
    price_change_percentage_24h: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct TrendingResponse {
    #[serde(default)]
    coins: Vec<TrendingEntry>,
}

#[derive(Debug, Deserialize)]
struct TrendingEntry {
    item: TrendingItem,
}

#[derive(Debug, Deserialize)]
struct TrendingItem {
    id: String,
    name: String,
    symbol: String,
    market_cap_rank: Option<u32>,
}

fn price_from_simple(body: &SimplePriceResponse, id: &str) -> FetchResult<f64> {
    body.get(id)
        .and_then(|prices| prices.get("usd"))
        .copied()
        .ok_or_else(|| FetchError::Decode(format!("no usd price for '{id}' in response")))
}

fn stats_from_coin(body: CoinResponse) -> FetchResult<TokenStats> {
    let market = body
        .market_data
        .ok_or_else(|| FetchError::Decode("response missing market_data".to_string()))?;
    let price_usd = market
        .current_price
        .get("usd")
        .copied()
        .ok_or_else(|| FetchError::Decode("market_data missing usd price".to_string()))?;

    Ok(TokenStats {
        price_usd,
        market_cap_usd: market.market_cap.get("usd").copied(),
        volume_24h_usd: market.total_volume.get("usd").copied(),
        price_change_24h_pct: market.price_change_percentage_24h,
    })
}

fn trending_from_response(body: TrendingResponse) -> Vec<TrendingToken> {
    body.coins
        .into_iter()
        .map(|entry| TrendingToken {
            id: entry.item.id,
            name: entry.item.name,
            symbol: entry.item.symbol,
            market_cap_rank: entry.item.market_cap_rank,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_price_parsing() {
        let body: SimplePriceResponse =
            serde_json::from_str(r#"{"solana":{"usd":142.37}}"#).unwrap();
        assert_eq!(price_from_simple(&body, "solana").unwrap(), 142.37);
        assert!(price_from_simple(&body, "bitcoin").is_err());
    }

    #[test]
    fn test_coin_stats_parsing() {
        let raw = r#"{
            "market_data": {
                "current_price": {"usd": 0.0042},
                "market_cap": {"usd": 420000.0},
                "total_volume": {"usd": 69000.0},
                "price_change_percentage_24h": -12.5
            }
        }"#;
        let body: CoinResponse = serde_json::from_str(raw).unwrap();
        let stats = stats_from_coin(body).unwrap();

        assert_eq!(stats.price_usd, 0.0042);
        assert_eq!(stats.market_cap_usd, Some(420000.0));
        assert_eq!(stats.volume_24h_usd, Some(69000.0));
        assert_eq!(stats.price_change_24h_pct, Some(-12.5));
    }

    #[test]
    fn test_coin_stats_require_usd_price() {
        let body: CoinResponse =
            serde_json::from_str(r#"{"market_data":{"current_price":{}}}"#).unwrap();
        assert!(matches!(
            stats_from_coin(body),
            Err(FetchError::Decode(_))
        ));
    }

    #[test]
    fn test_trending_parsing() {
        let raw = r#"{
            "coins": [
                {"item": {"id": "dogwifhat", "name": "dogwifhat", "symbol": "WIF", "market_cap_rank": 40}},
                {"item": {"id": "bonk", "name": "Bonk", "symbol": "BONK", "market_cap_rank": null}}
            ]
        }"#;
        let body: TrendingResponse = serde_json::from_str(raw).unwrap();
        let tokens = trending_from_response(body);

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].symbol, "WIF");
        assert_eq!(tokens[1].market_cap_rank, None);
    }
}
