//! Routing rules: cancellation, re-prompts, unmatched and ignored events

use assert_matches::assert_matches;
use TradeFlow::models::UserId;
use TradeFlow::state::{FlowId, StepId};
use TradeFlow::RouteOutcome;

use crate::helpers::*;

/// Entry button, acting user and resulting flow for every registered flow
fn flow_entries() -> Vec<(&'static str, UserId, FlowId)> {
    vec![
        ("import_wallet", USER_ID, FlowId::WalletImport),
        ("buy", USER_ID, FlowId::TokenLookup),
        ("create_limit_order", USER_ID, FlowId::LimitOrder),
        ("copy_trade", USER_ID, FlowId::CopyTrade),
        ("buy_settings", USER_ID, FlowId::BuySlippage),
        ("sell_settings", USER_ID, FlowId::SellSlippage),
        ("sniper", USER_ID, FlowId::Sniper),
        ("label_wallet", USER_ID, FlowId::WalletLabel),
        ("set_wallet_sol", ADMIN_ID, FlowId::AdminBalance),
    ]
}

#[tokio::test]
async fn test_cancel_ends_every_flow() {
    for (entry, user, flow) in flow_entries() {
        let ctx = TestContext::new();

        let started = ctx.press(user, entry).await;
        assert_matches!(started.outcome, RouteOutcome::Started { flow: f, .. } if f == flow);

        let cancelled = ctx.send_text(user, "/cancel").await;
        assert_eq!(cancelled.outcome, RouteOutcome::Cancelled(flow), "cancel from {}", flow);
        assert!(ctx.session(user).is_idle(), "{} left a position behind", flow);
        assert!(ctx.session(user).scratch.is_empty(), "{} left scratch data behind", flow);
    }
}

#[tokio::test]
async fn test_cancel_import_button_ends_user_flows() {
    let ctx = TestContext::new();

    ctx.press(USER_ID, "create_limit_order").await;
    let cancelled = ctx.press(USER_ID, "cancel_import").await;

    assert_eq!(cancelled.outcome, RouteOutcome::Cancelled(FlowId::LimitOrder));
    assert!(replied(&cancelled, "Cancelled"));
}

#[tokio::test]
async fn test_cancel_outside_flow() {
    let ctx = TestContext::new();

    let result = ctx.send_text(USER_ID, "/cancel").await;
    assert_eq!(result.outcome, RouteOutcome::ActionHandled);
    assert_eq!(texts(&result), vec!["ℹ️ Nothing to cancel."]);
}

#[tokio::test]
async fn test_known_event_that_does_not_fit_step_reprompts() {
    let ctx = TestContext::new();

    ctx.press(USER_ID, "create_limit_order").await;

    let reprompted = ctx.press(USER_ID, "settings").await;
    assert_eq!(
        reprompted.outcome,
        RouteOutcome::Reprompted { flow: FlowId::LimitOrder, step: StepId::AwaitingDetails }
    );
    assert_eq!(reprompted.messages.len(), 1);
    assert!(replied(&reprompted, "SYMBOL"));

    // Another flow's entry does not switch flows
    let reprompted = ctx.send_text(USER_ID, "/backup").await;
    assert_matches!(reprompted.outcome, RouteOutcome::Reprompted { flow: FlowId::LimitOrder, .. });
    assert!(ctx.session(USER_ID).is_at(FlowId::LimitOrder, StepId::AwaitingDetails));
}

#[tokio::test]
async fn test_unknown_signature_inside_flow_keeps_state() {
    let ctx = TestContext::new();

    ctx.press(USER_ID, "label_wallet").await;
    let before = ctx.session(USER_ID);

    let unmatched = ctx.press(USER_ID, "no_such_button").await;
    assert_eq!(unmatched.outcome, RouteOutcome::Unmatched);
    assert_eq!(texts(&unmatched), vec!["❌ Invalid action."]);

    let after = ctx.session(USER_ID);
    assert_eq!(after.position, before.position);
    assert_eq!(after.updated_at, before.updated_at);
}

#[tokio::test]
async fn test_unmatched_is_idempotent() {
    let ctx = TestContext::new();

    let first = ctx.send_text(USER_ID, "/nonsense").await;
    let snapshot = ctx.session(USER_ID);

    for _ in 0..3 {
        let again = ctx.send_text(USER_ID, "/nonsense").await;
        assert_eq!(again.outcome, first.outcome);
        assert_eq!(texts(&again), texts(&first));
    }

    let after = ctx.session(USER_ID);
    assert_eq!(first.outcome, RouteOutcome::Unmatched);
    assert!(after.is_idle());
    assert_eq!(after.profile, snapshot.profile);
    assert_eq!(after.updated_at, snapshot.updated_at);
}

#[tokio::test]
async fn test_free_text_outside_flow_is_ignored() {
    let ctx = TestContext::new();

    let ignored = ctx.send_text(USER_ID, "gm").await;
    assert_eq!(ignored.outcome, RouteOutcome::Ignored);
    assert!(ignored.messages.is_empty());
    assert!(ctx.session(USER_ID).is_idle());
}

#[tokio::test]
async fn test_prefix_action_and_exact_flow_entry() {
    let ctx = TestContext::new();

    let amount = ctx.press(USER_ID, "buy_1_sol").await;
    assert_eq!(amount.outcome, RouteOutcome::ActionHandled);
    assert!(replied(&amount, "Insufficient balance"));
    assert!(ctx.session(USER_ID).is_idle());

    let settings = ctx.press(USER_ID, "buy_settings").await;
    assert_matches!(settings.outcome, RouteOutcome::Started { flow: FlowId::BuySlippage, .. });
}

#[tokio::test]
async fn test_buy_amount_callback_data_is_not_echoed() {
    let ctx = TestContext::new();

    let amount = ctx.press(USER_ID, "buy_2.5_sol").await;
    assert_eq!(texts(&amount)[0], "❌ Insufficient balance to buy 2.5 SOL. Deposit SOL first.");

    let forged = ctx.press(USER_ID, "buy_*bold_sol").await;
    assert_eq!(forged.outcome, RouteOutcome::ActionHandled);
    assert_eq!(texts(&forged)[0], "❌ Insufficient balance. Deposit SOL first.");
    assert!(forged.messages.iter().all(|m| !m.text.contains("*bold")));
}

#[tokio::test]
async fn test_menu_navigation_edits_origin_message() {
    let ctx = TestContext::new();

    let home = ctx.press(USER_ID, "main_menu").await;
    assert_eq!(home.outcome, RouteOutcome::ActionHandled);
    assert_eq!(home.messages[0].delivery, TradeFlow::models::Delivery::Edit(10));

    let start = ctx.send_text(USER_ID, "/start").await;
    assert_eq!(start.messages[0].delivery, TradeFlow::models::Delivery::Send);
    assert!(replied(&start, WALLET_ADDRESS));
}

#[tokio::test]
async fn test_help_lists_commands() {
    let ctx = TestContext::new();

    let help = ctx.send_text(USER_ID, "/help").await;
    for command in ["/start", "/buy", "/cancel", "/orders"] {
        assert!(replied(&help, command), "help is missing {}", command);
    }
}
