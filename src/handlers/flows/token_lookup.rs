//! Token lookup
//!
//! The `buy` button asks for a token and looks it up; `/buy <token>` does
//! the same in one shot. Exactly one lookup is made per query and every
//! result, including a failure, ends the flow.

use async_trait::async_trait;
use tracing::warn;

use crate::handlers::menus;
use crate::router::handler::{ActionHandler, HandlerContext, StepHandler, StepInput, StepOutcome};
use crate::services::TokenQuote;
use crate::state::flows::{FlowDefinition, FlowId, StepId, StepSpec, Trigger};
use crate::utils::errors::Result;
use crate::utils::helpers::{escape_markdown, truncate_text};
use crate::utils::logging::log_api_error;
use super::with_user_fallbacks;

const PROMPT: &str = "Enter a token symbol or address to buy:";

pub const NOT_FOUND: &str = "❌ Token not found.";
pub const LOOKUP_FAILED: &str = "❌ Error fetching token.";

pub fn flow() -> FlowDefinition {
    with_user_fallbacks(
        FlowDefinition::new(FlowId::TokenLookup, StepId::AwaitingToken)
            .entry(Trigger::callback("buy"))
            .step(StepSpec::text(StepId::AwaitingToken, PROMPT, TokenStep).completes()),
    )
}

/// Result of one lookup, as shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    Found,
    NotFound,
    Failed,
}

/// Look a query up and queue the reply
pub async fn lookup_and_render(cx: &mut HandlerContext<'_>, query: &str) -> LookupOutcome {
    let shown = escape_markdown(&truncate_text(query, 64));
    cx.outbox.reply(format!("🔍 Searching for `{}`…", shown));

    match cx.services.price_lookup.search(query).await {
        Ok(Some(quote)) => {
            cx.outbox.reply_with(quote_card(&quote), menus::buy_amounts());
            LookupOutcome::Found
        }
        Ok(None) => {
            cx.outbox.reply(NOT_FOUND);
            LookupOutcome::NotFound
        }
        Err(e) => {
            log_api_error("price_lookup", &e.to_string(), Some(query));
            cx.outbox.reply(LOOKUP_FAILED);
            LookupOutcome::Failed
        }
    }
}

fn usd(value: Option<f64>) -> String {
    match value {
        Some(v) if v >= 1.0 => format!("${:.2}", v),
        Some(v) => format!("${}", v),
        None => "n/a".to_string(),
    }
}

/// Markdown card for a quote
pub fn quote_card(quote: &TokenQuote) -> String {
    let mut card = format!(
        "💰 *{} ({})*\nPrice: {}",
        escape_markdown(&quote.name),
        escape_markdown(&quote.symbol),
        usd(quote.price_usd)
    );

    if quote.liquidity_usd.is_some() {
        card.push_str(&format!("\nLiquidity: {}", usd(quote.liquidity_usd)));
    }
    if quote.volume_24h.is_some() {
        card.push_str(&format!("\n24h volume: {}", usd(quote.volume_24h)));
    }
    if let Some(dex) = &quote.dex_id {
        card.push_str(&format!("\nVenue: {}", escape_markdown(dex)));
    }

    card
}

/// Waits for the token query
pub struct TokenStep;

#[async_trait]
impl StepHandler for TokenStep {
    async fn handle(&self, cx: &mut HandlerContext<'_>, input: StepInput) -> Result<StepOutcome> {
        let query = match input {
            StepInput::Text(text) if !text.trim().is_empty() => text.trim().to_string(),
            _ => {
                cx.outbox.reply(PROMPT);
                return Ok(StepOutcome::Retry);
            }
        };

        let outcome = lookup_and_render(cx, &query).await;
        if outcome == LookupOutcome::Failed {
            warn!(user_id = %cx.user_id(), "Token lookup failed, ending flow");
        }
        Ok(StepOutcome::Complete)
    }
}

/// `/buy <token>`
pub struct BuyCommand;

#[async_trait]
impl ActionHandler for BuyCommand {
    async fn handle(&self, cx: &mut HandlerContext<'_>) -> Result<()> {
        let query = cx.event.args().join(" ");
        if query.trim().is_empty() {
            cx.outbox.reply("💰 Usage: `/buy <token>`");
            return Ok(());
        }

        lookup_and_render(cx, query.trim()).await;
        Ok(())
    }
}
