//! Stateless actions
//!
//! Handlers that answer a command or a menu button without touching flow
//! state.

use async_trait::async_trait;
use teloxide::utils::command::BotCommands;
use tracing::debug;

use crate::models::Keyboard;
use crate::router::handler::{ActionHandler, HandlerContext};
use crate::utils::errors::Result;
use crate::utils::helpers::parse_amount;
use crate::utils::logging::log_user_action;
use super::commands::Command;
use super::menus;

/// Whether an action answers with a new message or edits the one it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Render {
    Send,
    Replace,
}

impl Render {
    fn emit(self, cx: &mut HandlerContext<'_>, text: String, keyboard: Option<Keyboard>) {
        match (self, keyboard) {
            (Render::Send, Some(keyboard)) => cx.outbox.reply_with(text, keyboard),
            (Render::Send, None) => cx.outbox.reply(text),
            (Render::Replace, Some(keyboard)) => cx.outbox.replace_with(text, keyboard),
            (Render::Replace, None) => cx.outbox.replace(text),
        }
    }
}

/// Fixed text with an optional keyboard
pub struct Reply {
    text: &'static str,
    keyboard: Option<fn() -> Keyboard>,
    render: Render,
}

impl Reply {
    pub fn send(text: &'static str) -> Self {
        Self {
            text,
            keyboard: None,
            render: Render::Send,
        }
    }

    pub fn replace(text: &'static str) -> Self {
        Self {
            text,
            keyboard: Some(menus::back),
            render: Render::Replace,
        }
    }

    pub fn with_keyboard(mut self, keyboard: fn() -> Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}

#[async_trait]
impl ActionHandler for Reply {
    async fn handle(&self, cx: &mut HandlerContext<'_>) -> Result<()> {
        self.render.emit(cx, self.text.to_string(), self.keyboard.map(|k| k()));
        Ok(())
    }
}

/// Home screen with the main menu
pub struct ShowHome(pub Render);

#[async_trait]
impl ActionHandler for ShowHome {
    async fn handle(&self, cx: &mut HandlerContext<'_>) -> Result<()> {
        let text = menus::home_text(cx.services, &cx.session.profile);
        self.0.emit(cx, text, Some(menus::main_menu()));
        Ok(())
    }
}

/// Wallet screen
pub struct ShowWallet(pub Render);

#[async_trait]
impl ActionHandler for ShowWallet {
    async fn handle(&self, cx: &mut HandlerContext<'_>) -> Result<()> {
        let text = menus::wallet_text(cx.services, &cx.session.profile);
        self.0.emit(cx, text, Some(menus::wallet_menu()));
        Ok(())
    }
}

/// Settings menu with the user's current preferences
pub struct ShowSettings(pub Render);

#[async_trait]
impl ActionHandler for ShowSettings {
    async fn handle(&self, cx: &mut HandlerContext<'_>) -> Result<()> {
        let profile = &cx.session.profile;
        let slippage = |value: Option<f64>| value.map_or_else(|| "default".to_string(), |v| format!("{}%", v));

        let text = format!(
            "⚙️ *Settings Menu*\n\nBuy slippage: {}\nSell slippage: {}\nConfirm trades: {}",
            slippage(profile.buy_slippage),
            slippage(profile.sell_slippage),
            if profile.confirm_trades { "on" } else { "off" },
        );
        self.0.emit(cx, text, Some(menus::settings_menu()));
        Ok(())
    }
}

/// Command reference
pub struct ShowHelp(pub Render);

#[async_trait]
impl ActionHandler for ShowHelp {
    async fn handle(&self, cx: &mut HandlerContext<'_>) -> Result<()> {
        let text = format!("📖 {}", Command::descriptions());
        self.0.emit(cx, text, Some(menus::back()));
        Ok(())
    }
}

/// Flip the confirm-trades preference
pub struct ToggleConfirmTrades;

#[async_trait]
impl ActionHandler for ToggleConfirmTrades {
    async fn handle(&self, cx: &mut HandlerContext<'_>) -> Result<()> {
        let profile = &mut cx.session.profile;
        profile.confirm_trades = !profile.confirm_trades;
        let enabled = profile.confirm_trades;

        log_user_action(cx.user_id(), "confirm_trades", Some(if enabled { "on" } else { "off" }));
        cx.outbox.replace_with(
            format!("✅ Trade confirmation turned {}.", if enabled { "on" } else { "off" }),
            menus::settings_menu(),
        );
        Ok(())
    }
}

/// Forget the imported wallet record
pub struct DeleteWallet;

#[async_trait]
impl ActionHandler for DeleteWallet {
    async fn handle(&self, cx: &mut HandlerContext<'_>) -> Result<()> {
        match cx.session.profile.imported_wallet.take() {
            Some(wallet) => {
                log_user_action(cx.user_id(), "delete_wallet", Some(&wallet.fingerprint));
                cx.outbox.replace_with("🗑 Imported wallet removed.", menus::wallet_menu());
            }
            None => cx.outbox.replace_with("❌ No imported wallet to delete.", menus::wallet_menu()),
        }
        Ok(())
    }
}

/// Amount buttons under a quote, `buy_<amount>_sol`
pub struct BuyAmount;

impl BuyAmount {
    /// Amount encoded as `buy_<amount>_sol`; anything not a positive number is rejected
    fn amount(data: &str) -> Option<f64> {
        parse_amount(data.strip_prefix("buy_")?.strip_suffix("_sol")?).filter(|amount| *amount > 0.0)
    }
}

#[async_trait]
impl ActionHandler for BuyAmount {
    async fn handle(&self, cx: &mut HandlerContext<'_>) -> Result<()> {
        let event = cx.event;
        let data = match &event.kind {
            crate::models::EventKind::Callback(data) => data.as_str(),
            _ => "",
        };

        let text = match Self::amount(data) {
            Some(amount) => format!("❌ Insufficient balance to buy {} SOL. Deposit SOL first.", amount),
            None => {
                debug!(callback_data = data, "Buy button without an amount");
                "❌ Insufficient balance. Deposit SOL first.".to_string()
            }
        };

        cx.outbox.replace_with(text, menus::insufficient_balance());
        Ok(())
    }
}
