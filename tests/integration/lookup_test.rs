//! Price lookup against a mock DexScreener server

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use TradeFlow::handlers::flows::token_lookup::{LOOKUP_FAILED, NOT_FOUND};
use TradeFlow::services::{DexScreenerClient, PriceLookup};
use TradeFlow::state::FlowId;
use TradeFlow::utils::errors::LookupError;
use TradeFlow::RouteOutcome;

use crate::helpers::*;

#[tokio::test]
async fn test_client_decodes_first_pair() {
    let mock = DexScreenerMockServer::new().await;
    mock.mock_found("bonk").await;

    let client = DexScreenerClient::new(&mock.lookup_config(5)).expect("client builds");
    let quote = client.search("bonk").await.expect("lookup succeeds").expect("quote found");

    assert_eq!(quote.name, "Bonk");
    assert_eq!(quote.symbol, "Bonk");
    assert_eq!(quote.price_usd, Some(0.00002345));
    assert_eq!(quote.liquidity_usd, Some(5432100.25));
    assert_eq!(quote.volume_24h, Some(1234567.5));
    assert_eq!(quote.dex_id.as_deref(), Some("raydium"));
}

#[tokio::test]
async fn test_client_trims_and_encodes_query() {
    let mock = DexScreenerMockServer::new().await;
    mock.mock_found("dog wif").await;

    let client = DexScreenerClient::new(&mock.lookup_config(5)).expect("client builds");
    let quote = client.search("  dog wif ").await.expect("lookup succeeds");
    assert!(quote.is_some());
}

#[tokio::test]
async fn test_client_null_pairs_is_not_found() {
    let mock = DexScreenerMockServer::new().await;
    mock.mock_empty("nothing").await;

    let client = DexScreenerClient::new(&mock.lookup_config(5)).expect("client builds");
    assert_eq!(client.search("nothing").await.expect("lookup succeeds"), None);
}

#[tokio::test]
async fn test_client_error_status_is_not_found() {
    let mock = DexScreenerMockServer::new().await;
    mock.mock_status("broken", 500).await;

    let client = DexScreenerClient::new(&mock.lookup_config(5)).expect("client builds");
    assert_eq!(client.search("broken").await.expect("lookup succeeds"), None);
}

#[tokio::test]
async fn test_client_times_out() {
    let mock = DexScreenerMockServer::new().await;
    mock.mock_slow("slow", Duration::from_secs(3)).await;

    let client = DexScreenerClient::new(&mock.lookup_config(1)).expect("client builds");
    assert_matches!(client.search("slow").await, Err(LookupError::Timeout));
}

#[tokio::test]
async fn test_buy_flow_renders_quote_card() {
    let mock = DexScreenerMockServer::new().await;
    mock.mock_found("bonk").await;
    let client = DexScreenerClient::new(&mock.lookup_config(5)).expect("client builds");
    let ctx = TestContext::with_lookup(Arc::new(client));

    ctx.press(USER_ID, "buy").await;
    let result = ctx.send_text(USER_ID, "bonk").await;

    assert_eq!(result.outcome, RouteOutcome::Completed(FlowId::TokenLookup));
    assert!(replied(&result, "Searching for `bonk`"));
    let card = result.messages.last().expect("quote card");
    assert!(card.text.contains("*Bonk (Bonk)*"));
    assert!(card.text.contains("Venue: raydium"));
    assert!(card.signatures().any(|s| s == "buy_1_sol"));
}

#[tokio::test]
async fn test_buy_flow_not_found_ends_flow() {
    let mock = DexScreenerMockServer::new().await;
    mock.mock_status("zzz", 404).await;
    let client = DexScreenerClient::new(&mock.lookup_config(5)).expect("client builds");
    let ctx = TestContext::with_lookup(Arc::new(client));

    ctx.press(USER_ID, "buy").await;
    let result = ctx.send_text(USER_ID, "zzz").await;

    assert_eq!(result.outcome, RouteOutcome::Completed(FlowId::TokenLookup));
    assert!(replied(&result, NOT_FOUND));
    assert!(ctx.session(USER_ID).is_idle());
}

#[tokio::test]
async fn test_buy_flow_timeout_reports_failure_and_ends_flow() {
    let mock = DexScreenerMockServer::new().await;
    mock.mock_slow("slow", Duration::from_secs(3)).await;
    let client = DexScreenerClient::new(&mock.lookup_config(1)).expect("client builds");
    let ctx = TestContext::with_lookup(Arc::new(client));

    ctx.press(USER_ID, "buy").await;
    let result = ctx.send_text(USER_ID, "slow").await;

    assert_eq!(result.outcome, RouteOutcome::Completed(FlowId::TokenLookup));
    assert!(replied(&result, LOOKUP_FAILED));
    assert!(ctx.session(USER_ID).is_idle());
}

#[tokio::test]
async fn test_exactly_one_lookup_per_query() {
    let lookup = Arc::new(CountingLookup::default());
    let ctx = TestContext::with_lookup(lookup.clone());

    ctx.press(USER_ID, "buy").await;
    ctx.send_text(USER_ID, "unknown token").await;
    assert_eq!(lookup.calls(), 1);

    ctx.send_text(USER_ID, "/buy another").await;
    assert_eq!(lookup.calls(), 2);
}

#[tokio::test]
async fn test_buy_command_without_query_shows_usage() {
    let lookup = Arc::new(CountingLookup::default());
    let ctx = TestContext::with_lookup(lookup.clone());

    let usage = ctx.send_text(USER_ID, "/buy").await;
    assert_eq!(usage.outcome, RouteOutcome::ActionHandled);
    assert!(replied(&usage, "Usage"));
    assert_eq!(lookup.calls(), 0);
}

#[tokio::test]
async fn test_failing_lookup_via_static_double() {
    let ctx = TestContext::with_lookup(Arc::new(TradeFlow::services::StaticLookup::new().failing()));

    let result = ctx.send_text(USER_ID, "/buy bonk").await;
    assert_eq!(result.outcome, RouteOutcome::ActionHandled);
    assert!(replied(&result, LOOKUP_FAILED));
}
