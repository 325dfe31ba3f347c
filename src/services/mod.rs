//! Services module
//!
//! This module contains the collaborators handlers reach through the
//! [`ServiceFactory`]

pub mod price;

// Re-export commonly used services
pub use price::{DexScreenerClient, PriceLookup, StaticLookup, TokenQuote};

use std::sync::Arc;

use crate::config::settings::Settings;
use crate::state::balances::BalanceBook;
use crate::utils::errors::Result;

/// Shared services handed to every handler
#[derive(Clone)]
pub struct ServiceFactory {
    pub settings: Settings,
    pub balances: BalanceBook,
    pub price_lookup: Arc<dyn PriceLookup>,
}

impl ServiceFactory {
    /// Create a ServiceFactory backed by the DexScreener client
    pub fn new(settings: Settings) -> Result<Self> {
        let price_lookup = DexScreenerClient::new(&settings.lookup)?;
        Ok(Self::with_lookup(settings, Arc::new(price_lookup)))
    }

    /// Create a ServiceFactory with a specific price lookup
    pub fn with_lookup(settings: Settings, price_lookup: Arc<dyn PriceLookup>) -> Self {
        Self {
            settings,
            balances: BalanceBook::new(),
            price_lookup,
        }
    }

    /// Display address configured for the wallet screens
    pub fn wallet_address(&self) -> Option<&str> {
        self.settings.wallet.address.as_deref()
    }

    /// Whether `user_id` is the configured administrator
    pub fn is_admin(&self, user_id: crate::models::UserId) -> bool {
        user_id.0 == self.settings.bot.admin_id
    }
}

impl std::fmt::Debug for ServiceFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceFactory")
            .field("balances", &self.balances.len())
            .finish_non_exhaustive()
    }
}
