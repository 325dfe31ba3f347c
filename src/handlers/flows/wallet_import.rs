//! Wallet import flow
//!
//! Asks for a private key, checks its length and records a fingerprint of
//! it. The key itself is dropped as soon as the fingerprint is taken and
//! is never logged, stored or forwarded.

use async_trait::async_trait;
use chrono::Utc;

use crate::models::{EventSignature, ImportedWallet};
use crate::router::handler::{ActionHandler, FallbackHandler, HandlerContext, StepHandler, StepInput, StepOutcome};
use crate::state::flows::{FlowDefinition, FlowId, StepId, StepSpec, Trigger};
use crate::utils::errors::Result;
use crate::utils::helpers::key_fingerprint;
use crate::utils::logging::log_user_action;
use crate::handlers::menus;
use super::CancelFlow;

/// Accepted private key length in characters, after trimming
pub const KEY_LENGTH: std::ops::RangeInclusive<usize> = 64..=90;

const PROMPT: &str = "Provide the private key you want to import:";
const PROCEED: &str = "proceed_import";

pub fn flow() -> FlowDefinition {
    FlowDefinition::new(FlowId::WalletImport, StepId::AwaitingKey)
        .entry(Trigger::callback("import_wallet"))
        .entry(Trigger::command("backup"))
        .entry(Trigger::callback(PROCEED))
        .step(
            StepSpec::text(StepId::AwaitingKey, PROMPT, KeyStep)
                .or_callback(PROCEED)
                .completes(),
        )
        .fallback(Trigger::command("cancel"), CancelFlow)
        .fallback(Trigger::callback("cancel_import"), CancelImport)
        .fallback(Trigger::callback("finalize_import"), FinalizeImport)
}

/// Waits for the private key
pub struct KeyStep;

#[async_trait]
impl StepHandler for KeyStep {
    async fn handle(&self, cx: &mut HandlerContext<'_>, input: StepInput) -> Result<StepOutcome> {
        match input {
            StepInput::Entry(EventSignature::Command(_)) => {
                cx.outbox.reply("🔐 Please send your private key to back up your wallet.");
                Ok(StepOutcome::Retry)
            }
            StepInput::Entry(EventSignature::Callback(data)) if data == PROCEED => {
                cx.outbox.reply(PROMPT);
                Ok(StepOutcome::Retry)
            }
            StepInput::Entry(_) => {
                cx.outbox.reply_with(
                    "Accepted formats: Phantom style `88631DEyXSWf...` or Solflare array `[93,182,...]`.",
                    menus::import_prompt(),
                );
                Ok(StepOutcome::Retry)
            }
            StepInput::Callback(_) => {
                cx.outbox.reply(PROMPT);
                Ok(StepOutcome::Retry)
            }
            StepInput::Text(text) => {
                let key = text.trim();
                if !KEY_LENGTH.contains(&key.chars().count()) {
                    cx.outbox.reply("❌ Invalid private key length.");
                    return Ok(StepOutcome::Retry);
                }

                let fingerprint = key_fingerprint(key);
                log_user_action(cx.user_id(), "wallet_import", Some(&fingerprint));

                cx.outbox.reply_with(
                    format!("*Wallet to be imported*\nFingerprint: `{}`", fingerprint),
                    menus::import_confirm(),
                );
                cx.session.profile.imported_wallet = Some(ImportedWallet {
                    fingerprint,
                    imported_at: Utc::now(),
                });
                Ok(StepOutcome::Complete)
            }
        }
    }
}

/// Confirm the pending import, inside or after the flow
pub struct FinalizeImport;

impl FinalizeImport {
    fn confirm(cx: &mut HandlerContext<'_>) {
        if cx.session.profile.imported_wallet.is_some() {
            cx.outbox.reply_with("✅ Wallet imported successfully!", menus::wallet_menu());
        } else {
            cx.outbox.reply_with("❌ No wallet pending import.", menus::wallet_menu());
        }
    }
}

#[async_trait]
impl ActionHandler for FinalizeImport {
    async fn handle(&self, cx: &mut HandlerContext<'_>) -> Result<()> {
        Self::confirm(cx);
        Ok(())
    }
}

#[async_trait]
impl FallbackHandler for FinalizeImport {
    async fn handle(&self, cx: &mut HandlerContext<'_>, _flow: FlowId) -> Result<()> {
        Self::confirm(cx);
        Ok(())
    }
}

/// Abandon the import; outside the flow this forgets the imported wallet
pub struct CancelImport;

#[async_trait]
impl ActionHandler for CancelImport {
    async fn handle(&self, cx: &mut HandlerContext<'_>) -> Result<()> {
        if let Some(wallet) = cx.session.profile.imported_wallet.take() {
            log_user_action(cx.user_id(), "cancel_import", Some(&wallet.fingerprint));
        }
        cx.outbox.reply_with("❌ Wallet import canceled.", menus::back());
        Ok(())
    }
}

#[async_trait]
impl FallbackHandler for CancelImport {
    async fn handle(&self, cx: &mut HandlerContext<'_>, _flow: FlowId) -> Result<()> {
        cx.outbox.reply_with("❌ Wallet import canceled.", menus::back());
        Ok(())
    }
}
