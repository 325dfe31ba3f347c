//! Admin balance management
//!
//! Admin-only panel for setting the displayed SOL/USD balance of a wallet
//! address. The flow and every action here are tagged `Admin`, so the gate
//! has already checked the identity before these handlers run.

use async_trait::async_trait;

use crate::handlers::menus;
use crate::middleware::auth::HandlerTag;
use crate::models::{Currency, EventSignature};
use crate::router::handler::{ActionHandler, HandlerContext, StepHandler, StepInput, StepOutcome};
use crate::state::flows::{FlowDefinition, FlowId, StepId, StepSpec, Trigger};
use crate::utils::errors::{FailureKind, TradeFlowError, Result};
use crate::utils::helpers::{is_base58_address, parse_amount};
use crate::utils::logging::log_admin_action;
use super::CancelFlow;

const CURRENCY_KEY: &str = "currency";
const PROMPT: &str = "Send `<address> <amount>`, for example `6dyzT3kVsy27bPomXcKuLSPNXzreYqF2KiNM2HopZBXy 12.5`";

pub fn flow() -> FlowDefinition {
    FlowDefinition::new(FlowId::AdminBalance, StepId::AwaitingLine)
        .tagged(HandlerTag::Admin)
        .entry(Trigger::callback("set_wallet_sol"))
        .entry(Trigger::callback("set_wallet_usd"))
        .step(StepSpec::text(StepId::AwaitingLine, PROMPT, BalanceLineStep).completes())
        .fallback(Trigger::command("cancel"), CancelFlow)
}

/// Parse `<address> <amount>`
pub fn parse_balance_line(text: &str) -> Option<(String, f64)> {
    let parts: Vec<&str> = text.split_whitespace().collect();
    let [address, amount] = parts.as_slice() else {
        return None;
    };

    if !is_base58_address(address) {
        return None;
    }
    Some((address.to_string(), parse_amount(amount)?))
}

/// Waits for the address and amount
pub struct BalanceLineStep;

#[async_trait]
impl StepHandler for BalanceLineStep {
    async fn handle(&self, cx: &mut HandlerContext<'_>, input: StepInput) -> Result<StepOutcome> {
        let text = match input {
            StepInput::Entry(EventSignature::Callback(data)) => {
                let currency = if data.ends_with("_usd") { Currency::Usd } else { Currency::Sol };
                cx.session.set_text(CURRENCY_KEY, currency.as_str());

                let hint = match cx.services.wallet_address() {
                    Some(address) => format!("\nConfigured wallet: `{}`", address),
                    None => String::new(),
                };
                cx.outbox.reply(format!("Enter new {} balance.\n{}{}", currency.as_str(), PROMPT, hint));
                return Ok(StepOutcome::Retry);
            }
            StepInput::Text(text) => text,
            _ => {
                cx.outbox.reply(PROMPT);
                return Ok(StepOutcome::Retry);
            }
        };

        let currency = cx
            .session
            .get_text(CURRENCY_KEY)
            .and_then(Currency::parse)
            .ok_or_else(|| TradeFlowError::InvalidStateTransition {
                from: "admin_balance without currency".to_string(),
                to: StepId::AwaitingLine.to_string(),
            })?;

        let Some((address, amount)) = parse_balance_line(&text) else {
            cx.outbox.reply(format!("{}\n{}", FailureKind::InvalidInput.user_message(), PROMPT));
            return Ok(StepOutcome::Retry);
        };

        let balance = cx.services.balances.set(&address, currency, amount);
        log_admin_action(cx.user_id(), "set_balance", Some(&address), Some(&format!("{} {}", amount, currency.as_str())));

        cx.outbox.reply_with(
            format!(
                "✅ {} balance of `{}` updated to {}\nNow: {} SOL (${})",
                currency.as_str(),
                address,
                amount,
                balance.sol,
                balance.usd
            ),
            menus::admin_menu(),
        );
        Ok(StepOutcome::Complete)
    }
}

/// `/admin`
pub struct ShowAdminPanel;

#[async_trait]
impl ActionHandler for ShowAdminPanel {
    async fn handle(&self, cx: &mut HandlerContext<'_>) -> Result<()> {
        let text = format!(
            "🔧 *Admin Panel - Balance Management*\n\nTracked addresses: {}",
            cx.services.balances.len()
        );
        cx.outbox.reply_with(text, menus::admin_menu());
        Ok(())
    }
}

/// Clear every balance
pub struct ResetBalances;

#[async_trait]
impl ActionHandler for ResetBalances {
    async fn handle(&self, cx: &mut HandlerContext<'_>) -> Result<()> {
        let cleared = cx.services.balances.reset_all();
        log_admin_action(cx.user_id(), "reset_balances", None, Some(&cleared.to_string()));
        cx.outbox.replace_with("✅ Balances reset to zero.", menus::admin_menu());
        Ok(())
    }
}
