//! Token price lookup
//!
//! Resolves a free-text token query to display data. The production client
//! talks to the DexScreener search API; only the fields shown to users are
//! decoded and everything else in the response is ignored.

use std::collections::HashMap;
use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::settings::LookupConfig;
use crate::utils::errors::{LookupError, LookupResult, TradeFlowError, Result};

/// Display data for a token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenQuote {
    pub name: String,
    pub symbol: String,
    pub price_usd: Option<f64>,
    pub liquidity_usd: Option<f64>,
    pub volume_24h: Option<f64>,
    pub dex_id: Option<String>,
}

/// Price lookup collaborator.
///
/// `Ok(None)` means nothing matched the query. Transport faults are errors.
#[async_trait]
pub trait PriceLookup: Send + Sync {
    async fn search(&self, query: &str) -> LookupResult<Option<TokenQuote>>;
}

/// DexScreener search response; `pairs` may be missing or null
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    pairs: Option<Vec<Pair>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Pair {
    base_token: BaseToken,
    #[serde(default)]
    price_usd: Option<String>,
    #[serde(default)]
    liquidity: Option<Liquidity>,
    #[serde(default)]
    volume: Option<Volume>,
    #[serde(default)]
    dex_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BaseToken {
    name: String,
    symbol: String,
}

#[derive(Debug, Deserialize)]
struct Liquidity {
    #[serde(default)]
    usd: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Volume {
    #[serde(default)]
    h24: Option<f64>,
}

impl From<Pair> for TokenQuote {
    fn from(pair: Pair) -> Self {
        Self {
            name: pair.base_token.name,
            symbol: pair.base_token.symbol,
            price_usd: pair.price_usd.and_then(|p| p.parse().ok()),
            liquidity_usd: pair.liquidity.and_then(|l| l.usd),
            volume_24h: pair.volume.and_then(|v| v.h24),
            dex_id: pair.dex_id,
        }
    }
}

/// Decode a search response body, taking the first pair
fn parse_search_response(body: &str) -> LookupResult<Option<TokenQuote>> {
    let response: SearchResponse = serde_json::from_str(body)
        .map_err(|e| LookupError::InvalidResponse(e.to_string()))?;

    Ok(response
        .pairs
        .and_then(|pairs| pairs.into_iter().next())
        .map(TokenQuote::from))
}

/// DexScreener search client
#[derive(Debug, Clone)]
pub struct DexScreenerClient {
    client: Client,
    api_url: String,
}

impl DexScreenerClient {
    /// Create a client; every request is bounded by the configured timeout
    pub fn new(config: &LookupConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("TradeFlow/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(TradeFlowError::Http)?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    fn search_url(&self, query: &str) -> String {
        format!("{}?q={}", self.api_url, urlencoding::encode(query.trim()))
    }
}

#[async_trait]
impl PriceLookup for DexScreenerClient {
    async fn search(&self, query: &str) -> LookupResult<Option<TokenQuote>> {
        let url = self.search_url(query);
        debug!(url = %url, "Making price lookup request");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                LookupError::Timeout
            } else if e.is_connect() {
                LookupError::Connection
            } else {
                LookupError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            info!(status = %status, query = query, "Price lookup returned non-success status");
            return Ok(None);
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                LookupError::Timeout
            } else {
                LookupError::RequestFailed(e.to_string())
            }
        })?;

        let quote = parse_search_response(&body)?;
        debug!(query = query, found = quote.is_some(), "Price lookup completed");
        Ok(quote)
    }
}

/// Lookup over a fixed table of quotes, keyed by lower-cased query
#[derive(Debug, Clone, Default)]
pub struct StaticLookup {
    quotes: HashMap<String, TokenQuote>,
    failing: bool,
}

impl StaticLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quote(mut self, query: &str, quote: TokenQuote) -> Self {
        self.quotes.insert(query.trim().to_lowercase(), quote);
        self
    }

    /// Make every search fail with a connection error
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }
}

#[async_trait]
impl PriceLookup for StaticLookup {
    async fn search(&self, query: &str) -> LookupResult<Option<TokenQuote>> {
        if self.failing {
            return Err(LookupError::Connection);
        }
        Ok(self.quotes.get(&query.trim().to_lowercase()).cloned())
    }
}
