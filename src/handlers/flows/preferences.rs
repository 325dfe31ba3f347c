//! Single-question preference flows
//!
//! Copy-trade address, buy/sell slippage, sniper action and wallet label.
//! Each asks one question, keeps asking until the answer is valid, stores
//! it in the profile and ends.

use async_trait::async_trait;

use crate::handlers::menus;
use crate::models::UserProfile;
use crate::router::handler::{HandlerContext, StepHandler, StepInput, StepOutcome};
use crate::state::flows::{FlowDefinition, FlowId, StepId, StepSpec, Trigger};
use crate::utils::errors::Result;
use crate::utils::helpers::{is_base58_address, parse_amount};
use crate::utils::logging::log_user_action;
use super::with_user_fallbacks;

/// Longest wallet label accepted, in characters
pub const MAX_LABEL_CHARS: usize = 32;
/// Longest sniper action accepted, in characters
pub const MAX_SNIPER_ACTION_CHARS: usize = 128;

/// Which profile field a question fills and how the answer is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preference {
    CopyTradeAddress,
    BuySlippage,
    SellSlippage,
    SniperAction,
    WalletLabel,
}

impl Preference {
    fn prompt(self) -> &'static str {
        match self {
            Preference::CopyTradeAddress => "Enter address to copy trades from:",
            Preference::BuySlippage => "Enter buy slippage % (e.g. 0.5):",
            Preference::SellSlippage => "Enter sell slippage % (e.g. 0.5):",
            Preference::SniperAction => "Enter token address or snipe action:",
            Preference::WalletLabel => "Enter a label for your wallet:",
        }
    }

    fn invalid(self) -> &'static str {
        match self {
            Preference::CopyTradeAddress => "❌ Invalid address.",
            Preference::BuySlippage | Preference::SellSlippage => "❌ Invalid number. Enter a value above 0 and up to 100.",
            Preference::SniperAction => "❌ Sniper action is empty or too long.",
            Preference::WalletLabel => "❌ Label must be 1 to 32 characters.",
        }
    }

    fn saved(self) -> &'static str {
        match self {
            Preference::CopyTradeAddress => "✅ Copy-trade address saved.",
            Preference::BuySlippage => "✅ Buy slippage saved.",
            Preference::SellSlippage => "✅ Sell slippage saved.",
            Preference::SniperAction => "✅ Sniper action saved.",
            Preference::WalletLabel => "✅ Wallet label saved.",
        }
    }

    fn action(self) -> &'static str {
        match self {
            Preference::CopyTradeAddress => "copy_trade",
            Preference::BuySlippage => "buy_slippage",
            Preference::SellSlippage => "sell_slippage",
            Preference::SniperAction => "sniper",
            Preference::WalletLabel => "label_wallet",
        }
    }

    /// Validate the answer and store it; `false` when it is rejected
    fn apply(self, profile: &mut UserProfile, answer: &str) -> bool {
        let answer = answer.trim();
        match self {
            Preference::CopyTradeAddress if is_base58_address(answer) => {
                profile.copy_trade_address = Some(answer.to_string());
            }
            Preference::BuySlippage | Preference::SellSlippage => {
                let Some(value) = parse_amount(answer).filter(|v| *v > 0.0 && *v <= 100.0) else {
                    return false;
                };
                if self == Preference::BuySlippage {
                    profile.buy_slippage = Some(value);
                } else {
                    profile.sell_slippage = Some(value);
                }
            }
            Preference::SniperAction
                if !answer.is_empty() && answer.chars().count() <= MAX_SNIPER_ACTION_CHARS =>
            {
                profile.sniper_action = Some(answer.to_string());
            }
            Preference::WalletLabel if !answer.is_empty() && answer.chars().count() <= MAX_LABEL_CHARS => {
                profile.wallet_label = Some(answer.to_string());
            }
            _ => return false,
        }
        true
    }
}

/// Asks one question and stores the answer
pub struct PreferenceStep(pub Preference);

#[async_trait]
impl StepHandler for PreferenceStep {
    async fn handle(&self, cx: &mut HandlerContext<'_>, input: StepInput) -> Result<StepOutcome> {
        let preference = self.0;

        let Some(answer) = input.text() else {
            cx.outbox.replace(preference.prompt());
            return Ok(StepOutcome::Retry);
        };

        if !preference.apply(&mut cx.session.profile, answer) {
            cx.outbox.reply(preference.invalid());
            return Ok(StepOutcome::Retry);
        }

        log_user_action(cx.user_id(), preference.action(), None);
        let keyboard = match preference {
            Preference::BuySlippage | Preference::SellSlippage => menus::settings_menu(),
            Preference::WalletLabel => menus::wallet_menu(),
            _ => menus::back(),
        };
        cx.outbox.reply_with(preference.saved(), keyboard);
        Ok(StepOutcome::Complete)
    }
}

fn question(flow: FlowId, step: StepId, entry: &str, preference: Preference) -> FlowDefinition {
    with_user_fallbacks(
        FlowDefinition::new(flow, step)
            .entry(Trigger::callback(entry))
            .step(StepSpec::text(step, preference.prompt(), PreferenceStep(preference)).completes()),
    )
}

pub fn flows() -> Vec<FlowDefinition> {
    vec![
        question(FlowId::CopyTrade, StepId::AwaitingAddress, "copy_trade", Preference::CopyTradeAddress),
        question(FlowId::BuySlippage, StepId::AwaitingSlippage, "buy_settings", Preference::BuySlippage),
        question(FlowId::SellSlippage, StepId::AwaitingSlippage, "sell_settings", Preference::SellSlippage),
        question(FlowId::Sniper, StepId::AwaitingAction, "sniper", Preference::SniperAction),
        question(FlowId::WalletLabel, StepId::AwaitingLabel, "label_wallet", Preference::WalletLabel),
    ]
}
