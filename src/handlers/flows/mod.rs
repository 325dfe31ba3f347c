//! Multi-step flows
//!
//! Each submodule defines one or more flow tables and their step handlers.
//! This module holds the shared fallbacks and registers every flow.

pub mod admin_balance;
pub mod limit_order;
pub mod preferences;
pub mod token_lookup;
pub mod wallet_import;

use async_trait::async_trait;

use crate::router::handler::{FallbackHandler, HandlerContext};
use crate::router::registry::{ActionRegistry, RegistryError};
use crate::state::flows::{FlowDefinition, FlowId, Trigger};
use crate::utils::errors::Result;
use crate::utils::logging::log_user_action;
use super::menus;

/// Generic cancel: acknowledge and offer the main menu
pub struct CancelFlow;

#[async_trait]
impl FallbackHandler for CancelFlow {
    async fn handle(&self, cx: &mut HandlerContext<'_>, flow: FlowId) -> Result<()> {
        log_user_action(cx.user_id(), "cancel_flow", Some(flow.as_str()));
        cx.outbox.reply_with("❌ Cancelled.", menus::back());
        Ok(())
    }
}

/// Add the fallbacks every user-facing flow shares
pub(crate) fn with_user_fallbacks(flow: FlowDefinition) -> FlowDefinition {
    flow.fallback(Trigger::command("cancel"), CancelFlow)
        .fallback(Trigger::callback("cancel_import"), CancelFlow)
}

/// Register every flow
pub fn register(registry: &mut ActionRegistry) -> std::result::Result<(), RegistryError> {
    registry.register_flow(wallet_import::flow())?;
    registry.register_flow(token_lookup::flow())?;
    registry.register_flow(limit_order::flow())?;
    for flow in preferences::flows() {
        registry.register_flow(flow)?;
    }
    registry.register_flow(admin_balance::flow())?;
    Ok(())
}
