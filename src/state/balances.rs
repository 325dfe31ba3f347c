//! Wallet balance book
//!
//! Address → balance map edited by the admin balance flow and read by the
//! display handlers. In memory only.

use std::sync::Arc;
use dashmap::DashMap;

use crate::models::{Currency, WalletBalance};

#[derive(Debug, Clone, Default)]
pub struct BalanceBook {
    balances: Arc<DashMap<String, WalletBalance>>,
}

impl BalanceBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of an address; zero when it has never been set
    pub fn get(&self, address: &str) -> WalletBalance {
        self.balances.get(address).map(|b| *b).unwrap_or_default()
    }

    /// Set one currency of an address, returning the updated balance
    pub fn set(&self, address: &str, currency: Currency, amount: f64) -> WalletBalance {
        let mut entry = self.balances.entry(address.to_string()).or_default();
        match currency {
            Currency::Sol => entry.sol = amount,
            Currency::Usd => entry.usd = amount,
        }
        *entry
    }

    /// Drop every balance, returning how many addresses were cleared
    pub fn reset_all(&self) -> usize {
        let cleared = self.balances.len();
        self.balances.clear();
        cleared
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}
