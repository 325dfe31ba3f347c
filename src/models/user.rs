//! User identity and profile model

use std::fmt;
use serde::{Deserialize, Serialize};

use super::order::LimitOrder;
use super::wallet::ImportedWallet;

/// Stable identifier of a chat user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-user data that outlives a single flow
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub imported_wallet: Option<ImportedWallet>,
    pub wallet_label: Option<String>,
    pub copy_trade_address: Option<String>,
    pub sniper_action: Option<String>,
    pub buy_slippage: Option<f64>,
    pub sell_slippage: Option<f64>,
    /// Ask for confirmation before trades
    #[serde(default)]
    pub confirm_trades: bool,
    pub orders: Vec<LimitOrder>,
}
