//! Limit orders
//!
//! `create_limit_order` asks for `<SYMBOL> <PRICE> <AMOUNT>` until it gets
//! one that parses; `limit_orders` and `/orders` list what the user has.

use async_trait::async_trait;

use crate::handlers::actions::Render;
use crate::handlers::menus;
use crate::models::LimitOrder;
use crate::router::handler::{ActionHandler, HandlerContext, StepHandler, StepInput, StepOutcome};
use crate::state::flows::{FlowDefinition, FlowId, StepId, StepSpec, Trigger};
use crate::utils::errors::Result;
use crate::utils::helpers::escape_markdown;
use crate::utils::logging::log_user_action;
use super::with_user_fallbacks;

const PROMPT: &str = "📝 Format: `<SYMBOL> <PRICE> <AMOUNT>`\nExample: `SOL 25 10`";

pub fn flow() -> FlowDefinition {
    with_user_fallbacks(
        FlowDefinition::new(FlowId::LimitOrder, StepId::AwaitingDetails)
            .entry(Trigger::callback("create_limit_order"))
            .step(StepSpec::text(StepId::AwaitingDetails, PROMPT, DetailsStep).completes()),
    )
}

/// Waits for the order details
pub struct DetailsStep;

#[async_trait]
impl StepHandler for DetailsStep {
    async fn handle(&self, cx: &mut HandlerContext<'_>, input: StepInput) -> Result<StepOutcome> {
        let Some(text) = input.text() else {
            cx.outbox.replace(PROMPT);
            return Ok(StepOutcome::Retry);
        };

        match LimitOrder::parse(text) {
            Some(order) => {
                let summary = order.to_string();
                log_user_action(cx.user_id(), "limit_order", Some(&summary));
                cx.session.profile.orders.push(order);
                cx.outbox.reply_with(
                    format!("✅ Limit order created: {}", escape_markdown(&summary)),
                    menus::limit_orders_menu(),
                );
                Ok(StepOutcome::Complete)
            }
            None => {
                cx.outbox.reply("❌ Format: SYMBOL PRICE AMOUNT");
                Ok(StepOutcome::Retry)
            }
        }
    }
}

/// List the user's limit orders
pub struct ListOrders(pub Render);

impl ListOrders {
    fn text(orders: &[LimitOrder]) -> String {
        if orders.is_empty() {
            return "📭 No active limit orders.".to_string();
        }

        let mut text = "📝 *Active limit orders*\n".to_string();
        for (index, order) in orders.iter().enumerate() {
            text.push_str(&format!("\n{}. {}", index + 1, escape_markdown(&order.to_string())));
        }
        text
    }
}

#[async_trait]
impl ActionHandler for ListOrders {
    async fn handle(&self, cx: &mut HandlerContext<'_>) -> Result<()> {
        let text = Self::text(&cx.session.profile.orders);
        match self.0 {
            Render::Send => cx.outbox.reply_with(text, menus::limit_orders_menu()),
            Render::Replace => cx.outbox.replace_with(text, menus::limit_orders_menu()),
        }
        Ok(())
    }
}
