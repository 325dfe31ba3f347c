//! Wallet models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record of an imported wallet. The private key itself is never kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedWallet {
    pub fingerprint: String,
    pub imported_at: DateTime<Utc>,
}

/// Balance shown for a wallet address
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WalletBalance {
    pub sol: f64,
    pub usd: f64,
}

/// Currency an admin balance edit applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    Sol,
    Usd,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Sol => "SOL",
            Currency::Usd => "USD",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "SOL" => Some(Currency::Sol),
            "USD" => Some(Currency::Usd),
            _ => None,
        }
    }
}
