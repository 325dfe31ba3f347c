//! Limit order model

use std::fmt;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitOrder {
    pub symbol: String,
    pub price: f64,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
}

impl LimitOrder {
    /// Parse `<SYMBOL> <PRICE> <AMOUNT>`; the symbol is upper-cased
    pub fn parse(text: &str) -> Option<Self> {
        let parts: Vec<&str> = text.split_whitespace().collect();
        let [symbol, price, amount] = parts.as_slice() else {
            return None;
        };

        let price = price.parse::<f64>().ok().filter(|p| p.is_finite() && *p > 0.0)?;
        let amount = amount.parse::<f64>().ok().filter(|a| a.is_finite() && *a > 0.0)?;

        Some(Self {
            symbol: symbol.to_uppercase(),
            price,
            amount,
            created_at: Utc::now(),
        })
    }
}

impl fmt::Display for LimitOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} @ ${}", self.amount, self.symbol, self.price)
    }
}
