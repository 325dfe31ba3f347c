//! Price lookup doubles

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Notify;
use TradeFlow::services::{PriceLookup, TokenQuote};
use TradeFlow::utils::errors::LookupResult;

pub fn bonk_quote() -> TokenQuote {
    TokenQuote {
        name: "Bonk".to_string(),
        symbol: "BONK".to_string(),
        price_usd: Some(0.00002),
        liquidity_usd: Some(2_500_000.0),
        volume_24h: Some(900_000.0),
        dex_id: Some("raydium".to_string()),
    }
}

/// Lookup that blocks until released, for holding a dispatch in flight
#[derive(Default)]
pub struct GatedLookup {
    pub entered: Notify,
    pub release: Notify,
    pub calls: AtomicUsize,
}

impl GatedLookup {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PriceLookup for GatedLookup {
    async fn search(&self, _query: &str) -> LookupResult<Option<TokenQuote>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        self.release.notified().await;
        Ok(Some(bonk_quote()))
    }
}

/// Lookup that counts calls and never finds anything
#[derive(Default)]
pub struct CountingLookup {
    pub calls: AtomicUsize,
}

impl CountingLookup {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PriceLookup for CountingLookup {
    async fn search(&self, _query: &str) -> LookupResult<Option<TokenQuote>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(None)
    }
}
