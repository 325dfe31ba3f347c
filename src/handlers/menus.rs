//! Screens and inline keyboards
//!
//! Every keyboard the bot renders is built here so the set of callback
//! signatures in circulation is easy to audit.

use crate::models::{button, Keyboard, UserProfile};
use crate::services::ServiceFactory;
use crate::utils::helpers::escape_markdown;

pub fn main_menu() -> Keyboard {
    vec![
        vec![button("Buy", "buy"), button("Sell", "sell")],
        vec![button("Positions", "positions"), button("Wallet", "wallet")],
        vec![button("DCA Orders", "dca_orders"), button("Copy Trade", "copy_trade")],
        vec![
            button("Sniper 🆕", "sniper"),
            button("Limit Orders", "limit_orders"),
            button("⭐ Watchlist", "watchlist"),
        ],
        vec![button("Trenches", "trenches"), button("💰 Referrals", "referrals")],
        vec![button("Withdraw", "withdraw"), button("Settings", "settings")],
        vec![button("Help", "help"), button("🔄 Refresh", "refresh")],
    ]
}

pub fn wallet_menu() -> Keyboard {
    vec![
        vec![button("Import Solana Wallet", "import_wallet"), button("Delete Wallet", "delete_wallet")],
        vec![button("Label Wallet", "label_wallet"), button("🔄 Refresh", "refresh_wallet")],
        vec![button("⬅️ Back", "main_menu")],
    ]
}

pub fn settings_menu() -> Keyboard {
    vec![
        vec![button("Buy Settings", "buy_settings"), button("Sell Settings", "sell_settings")],
        vec![button("Set Referral", "set_referral"), button("Confirm Trades", "confirm_trades")],
        vec![button("⬅️ Back", "main_menu")],
    ]
}

pub fn admin_menu() -> Keyboard {
    vec![
        vec![button("Set SOL Balance", "set_wallet_sol")],
        vec![button("Set USD Balance", "set_wallet_usd")],
        vec![button("Reset All Balances", "reset_balances")],
        vec![button("⬅️ Back", "main_menu")],
    ]
}

/// Amount buttons shown under a token quote
pub fn buy_amounts() -> Keyboard {
    vec![
        vec![button("0.5 SOL", "buy_0.5_sol"), button("1 SOL", "buy_1_sol")],
        vec![button("3 SOL", "buy_3_sol"), button("5 SOL", "buy_5_sol")],
        vec![button("10 SOL", "buy_10_sol"), button("20 SOL", "buy_20_sol")],
        vec![button("⬅️ Back", "main_menu")],
    ]
}

pub fn import_prompt() -> Keyboard {
    vec![vec![button("Proceed With Import", "proceed_import"), button("Cancel", "cancel_import")]]
}

pub fn import_confirm() -> Keyboard {
    vec![vec![button("Finalize Import", "finalize_import"), button("Cancel", "cancel_import")]]
}

pub fn insufficient_balance() -> Keyboard {
    vec![vec![button("Wallet", "wallet")], vec![button("⬅️ Back", "main_menu")]]
}

pub fn limit_orders_menu() -> Keyboard {
    vec![
        vec![button("➕ Create Limit Order", "create_limit_order")],
        vec![button("⬅️ Back", "main_menu")],
    ]
}

pub fn back() -> Keyboard {
    vec![vec![button("⬅️ Back", "main_menu")]]
}

/// Every keyboard above, for consistency checks
pub fn all() -> Vec<Keyboard> {
    vec![
        main_menu(),
        wallet_menu(),
        settings_menu(),
        admin_menu(),
        buy_amounts(),
        import_prompt(),
        import_confirm(),
        insufficient_balance(),
        limit_orders_menu(),
        back(),
    ]
}

fn balance_line(services: &ServiceFactory) -> String {
    match services.wallet_address() {
        Some(address) => {
            let balance = services.balances.get(address);
            format!("`{}` _(tap to copy)_\nBalance: {} SOL (${})", address, balance.sol, balance.usd)
        }
        None => "No wallet address configured.".to_string(),
    }
}

/// Home screen text
pub fn home_text(services: &ServiceFactory, profile: &UserProfile) -> String {
    let mut text = format!("💳 *Solana*\n{}\n", balance_line(services));

    if let Some(label) = &profile.wallet_label {
        text.push_str(&format!("🏷 {}\n", escape_markdown(label)));
    }
    if !profile.orders.is_empty() {
        text.push_str(&format!("📝 Active limit orders: {}\n", profile.orders.len()));
    }

    text.push_str("\nPick an action below.");
    text
}

/// Wallet screen text
pub fn wallet_text(services: &ServiceFactory, profile: &UserProfile) -> String {
    let mut text = format!("🔐 *Wallet Options:*\n\n💳 Solana: {}\n", balance_line(services));

    match &profile.imported_wallet {
        Some(wallet) => text.push_str(&format!(
            "\n🔑 Imported wallet `{}` ({})",
            wallet.fingerprint,
            wallet.imported_at.format("%Y-%m-%d")
        )),
        None => text.push_str("\n🔑 No imported wallet."),
    }

    if let Some(label) = &profile.wallet_label {
        text.push_str(&format!("\n🏷 Label: {}", escape_markdown(label)));
    }

    text
}
