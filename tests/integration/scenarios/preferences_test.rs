//! Preference questions

use TradeFlow::state::{FlowId, StepId};
use TradeFlow::RouteOutcome;

use crate::helpers::*;

#[tokio::test]
async fn test_buy_slippage_rejects_out_of_range() {
    let ctx = TestContext::new();

    let started = ctx.press(USER_ID, "buy_settings").await;
    assert_eq!(
        started.outcome,
        RouteOutcome::Started { flow: FlowId::BuySlippage, step: StepId::AwaitingSlippage }
    );

    for bad in ["150", "0", "-3", "lots"] {
        let retried = ctx.send_text(USER_ID, bad).await;
        assert_eq!(
            retried.outcome,
            RouteOutcome::Retried { flow: FlowId::BuySlippage, step: StepId::AwaitingSlippage },
            "{} should be rejected",
            bad
        );
    }

    let saved = ctx.send_text(USER_ID, "2.5").await;
    assert_eq!(saved.outcome, RouteOutcome::Completed(FlowId::BuySlippage));

    let profile = ctx.session(USER_ID).profile;
    assert_eq!(profile.buy_slippage, Some(2.5));
    assert_eq!(profile.sell_slippage, None);
}

#[tokio::test]
async fn test_sell_slippage_shows_in_settings() {
    let ctx = TestContext::new();

    ctx.press(USER_ID, "sell_settings").await;
    ctx.send_text(USER_ID, "1").await;

    let settings = ctx.press(USER_ID, "settings").await;
    assert_eq!(settings.outcome, RouteOutcome::ActionHandled);
    assert!(replied(&settings, "1%"));
}

#[tokio::test]
async fn test_copy_trade_requires_address() {
    let ctx = TestContext::new();

    ctx.press(USER_ID, "copy_trade").await;
    let retried = ctx.send_text(USER_ID, "not-an-address").await;
    assert!(replied(&retried, "Invalid address"));

    let saved = ctx.send_text(USER_ID, WALLET_ADDRESS).await;
    assert_eq!(saved.outcome, RouteOutcome::Completed(FlowId::CopyTrade));
    assert_eq!(ctx.session(USER_ID).profile.copy_trade_address.as_deref(), Some(WALLET_ADDRESS));
}

#[tokio::test]
async fn test_wallet_label_length_limit() {
    let ctx = TestContext::new();

    ctx.press(USER_ID, "label_wallet").await;
    let retried = ctx.send_text(USER_ID, &"x".repeat(33)).await;
    assert_eq!(
        retried.outcome,
        RouteOutcome::Retried { flow: FlowId::WalletLabel, step: StepId::AwaitingLabel }
    );

    ctx.send_text(USER_ID, "Main").await;
    assert_eq!(ctx.session(USER_ID).profile.wallet_label.as_deref(), Some("Main"));

    let wallet = ctx.press(USER_ID, "wallet").await;
    assert!(replied(&wallet, "Label: Main"));
}

#[tokio::test]
async fn test_sniper_action_saved() {
    let ctx = TestContext::new();

    ctx.press(USER_ID, "sniper").await;
    let saved = ctx.send_text(USER_ID, "snipe on launch").await;

    assert_eq!(saved.outcome, RouteOutcome::Completed(FlowId::Sniper));
    assert_eq!(ctx.session(USER_ID).profile.sniper_action.as_deref(), Some("snipe on launch"));
}

#[tokio::test]
async fn test_confirm_trades_toggle_persists() {
    let ctx = TestContext::new();

    ctx.press(USER_ID, "confirm_trades").await;
    assert!(ctx.session(USER_ID).profile.confirm_trades);

    ctx.press(USER_ID, "confirm_trades").await;
    assert!(!ctx.session(USER_ID).profile.confirm_trades);
}
