//! Limit order journey

use TradeFlow::state::{FlowId, StepId};
use TradeFlow::RouteOutcome;

use crate::helpers::*;

#[tokio::test]
async fn test_limit_order_parses_and_appends() {
    let ctx = TestContext::new();

    let started = ctx.press(USER_ID, "create_limit_order").await;
    assert_eq!(
        started.outcome,
        RouteOutcome::Started { flow: FlowId::LimitOrder, step: StepId::AwaitingDetails }
    );

    let completed = ctx.send_text(USER_ID, "SOL 25 10").await;
    assert_eq!(completed.outcome, RouteOutcome::Completed(FlowId::LimitOrder));
    assert!(replied(&completed, "Limit order created"));

    let session = ctx.session(USER_ID);
    assert!(session.is_idle());
    assert_eq!(session.profile.orders.len(), 1);

    let order = &session.profile.orders[0];
    assert_eq!(order.symbol, "SOL");
    assert_eq!(order.price, 25.0);
    assert_eq!(order.amount, 10.0);
}

#[tokio::test]
async fn test_missing_field_retries_in_place() {
    let ctx = TestContext::new();

    ctx.press(USER_ID, "create_limit_order").await;
    let retried = ctx.send_text(USER_ID, "SOL 25").await;

    assert_eq!(
        retried.outcome,
        RouteOutcome::Retried { flow: FlowId::LimitOrder, step: StepId::AwaitingDetails }
    );
    assert_eq!(texts(&retried), vec!["❌ Format: SYMBOL PRICE AMOUNT"]);
    assert!(ctx.session(USER_ID).is_at(FlowId::LimitOrder, StepId::AwaitingDetails));
    assert!(ctx.session(USER_ID).profile.orders.is_empty());

    ctx.send_text(USER_ID, "sol 25 10").await;
    assert_eq!(ctx.session(USER_ID).profile.orders.len(), 1);
}

#[tokio::test]
async fn test_orders_belong_to_their_user() {
    let ctx = TestContext::new();

    ctx.press(USER_ID, "create_limit_order").await;
    ctx.send_text(USER_ID, "BONK 0.5 1000").await;

    let mine = ctx.send_text(USER_ID, "/orders").await;
    assert!(replied(&mine, "1000 BONK @ $0.5"));

    let theirs = ctx.send_text(OTHER_USER_ID, "/orders").await;
    assert!(replied(&theirs, "No active limit orders"));
    assert!(ctx.session(OTHER_USER_ID).profile.orders.is_empty());
}

#[tokio::test]
async fn test_orders_accumulate_across_flows() {
    let ctx = TestContext::new();

    for line in ["SOL 25 10", "JUP 1.2 300"] {
        ctx.press(USER_ID, "create_limit_order").await;
        ctx.send_text(USER_ID, line).await;
    }

    let symbols: Vec<String> = ctx
        .session(USER_ID)
        .profile
        .orders
        .iter()
        .map(|o| o.symbol.clone())
        .collect();
    assert_eq!(symbols, vec!["SOL", "JUP"]);
}
