//! Callback actions
//!
//! Menu buttons that answer in place without opening a flow. Buttons that
//! open a flow are registered with the flow itself.

use crate::middleware::auth::HandlerTag;
use crate::router::registry::{ActionRegistry, RegistryError};
use crate::state::flows::Trigger;
use super::actions::{BuyAmount, DeleteWallet, Render, Reply, ShowHelp, ShowHome, ShowSettings, ShowWallet, ToggleConfirmTrades};
use super::flows::admin_balance::ResetBalances;
use super::flows::limit_order::ListOrders;
use super::flows::wallet_import::{CancelImport, FinalizeImport};
use super::menus;

/// Register every stateless callback
pub fn register(registry: &mut ActionRegistry) -> Result<(), RegistryError> {
    use HandlerTag::{Admin, Public};

    registry.register_action(Trigger::callback("main_menu"), Public, ShowHome(Render::Replace))?;
    registry.register_action(Trigger::callback("refresh"), Public, ShowHome(Render::Replace))?;
    registry.register_action(Trigger::callback("wallet"), Public, ShowWallet(Render::Replace))?;
    registry.register_action(Trigger::callback("refresh_wallet"), Public, ShowWallet(Render::Replace))?;
    registry.register_action(Trigger::callback("delete_wallet"), Public, DeleteWallet)?;
    registry.register_action(Trigger::callback("settings"), Public, ShowSettings(Render::Replace))?;
    registry.register_action(Trigger::callback("confirm_trades"), Public, ToggleConfirmTrades)?;
    registry.register_action(Trigger::callback("help"), Public, ShowHelp(Render::Replace))?;
    registry.register_action(Trigger::callback("limit_orders"), Public, ListOrders(Render::Replace))?;

    registry.register_action(Trigger::callback("positions"), Public, Reply::replace("📊 You have no open positions."))?;
    registry.register_action(Trigger::callback("sell"), Public, Reply::replace("❌ You have no tokens to sell."))?;
    registry.register_action(Trigger::callback("withdraw"), Public, Reply::replace("❌ Zero balance."))?;
    registry.register_action(Trigger::callback("dca_orders"), Public, Reply::replace("📊 No active DCA orders."))?;
    registry.register_action(
        Trigger::callback("trenches"),
        Public,
        Reply::replace("🚀 Latest graduated tokens will appear here."),
    )?;
    registry.register_action(Trigger::callback("referrals"), Public, Reply::replace("💰 Referral system coming soon."))?;
    registry.register_action(Trigger::callback("watchlist"), Public, Reply::replace("⭐ Your watchlist is empty."))?;
    registry.register_action(
        Trigger::callback("set_referral"),
        Public,
        Reply::replace("💰 Referral codes are not available yet.").with_keyboard(menus::settings_menu),
    )?;

    registry.register_action(Trigger::callback("finalize_import"), Public, FinalizeImport)?;
    registry.register_action(Trigger::callback("cancel_import"), Public, CancelImport)?;
    registry.register_action(Trigger::callback("reset_balances"), Admin, ResetBalances)?;
    registry.register_action(Trigger::callback_prefix("buy_"), Public, BuyAmount)?;

    Ok(())
}
