//! Command actions
//!
//! Stateless `/command` handlers. `/backup` is not here: it starts the
//! wallet import flow.

use teloxide::utils::command::BotCommands;

use crate::middleware::auth::HandlerTag;
use crate::router::registry::{ActionRegistry, RegistryError};
use crate::state::flows::Trigger;
use super::actions::{Render, Reply, ShowHelp, ShowHome, ShowSettings};
use super::flows::admin_balance::ShowAdminPanel;
use super::flows::limit_order::ListOrders;
use super::flows::token_lookup::BuyCommand;

/// All available bot commands
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Show the main menu")]
    Start,
    #[command(description = "Show this help")]
    Help,
    #[command(description = "Look up a token: /buy <token>")]
    Buy,
    #[command(description = "Sell a token")]
    Sell,
    #[command(description = "Show open positions")]
    Positions,
    #[command(description = "Open settings")]
    Settings,
    #[command(description = "Snipe a token")]
    Snipe,
    #[command(description = "Burn a token")]
    Burn,
    #[command(description = "Withdraw funds")]
    Withdraw,
    #[command(description = "List limit orders")]
    Orders,
    #[command(description = "Import a wallet from its private key")]
    Backup,
    #[command(description = "Cancel the current operation")]
    Cancel,
    #[command(description = "Admin panel (admin only)")]
    Admin,
}

/// Register every stateless command
pub fn register(registry: &mut ActionRegistry) -> Result<(), RegistryError> {
    use HandlerTag::{Admin, Public};

    registry.register_action(Trigger::command("start"), Public, ShowHome(Render::Send))?;
    registry.register_action(Trigger::command("help"), Public, ShowHelp(Render::Send))?;
    registry.register_action(Trigger::command("buy"), Public, BuyCommand)?;
    registry.register_action(Trigger::command("sell"), Public, Reply::send("❌ You have no tokens to sell."))?;
    registry.register_action(Trigger::command("positions"), Public, Reply::send("📊 You have no open positions."))?;
    registry.register_action(Trigger::command("settings"), Public, ShowSettings(Render::Send))?;
    registry.register_action(Trigger::command("snipe"), Public, Reply::send("❌ Insufficient balance to snipe."))?;
    registry.register_action(Trigger::command("burn"), Public, Reply::send("❌ No token to burn."))?;
    registry.register_action(Trigger::command("withdraw"), Public, Reply::send("❌ Zero balance."))?;
    registry.register_action(Trigger::command("orders"), Public, ListOrders(Render::Send))?;
    registry.register_action(Trigger::command("cancel"), Public, Reply::send("ℹ️ Nothing to cancel."))?;
    registry.register_action(Trigger::command("admin"), Admin, ShowAdminPanel)?;

    Ok(())
}
