//! Wallet import journey

use TradeFlow::state::{FlowId, StepId};
use TradeFlow::utils::helpers::key_fingerprint;
use TradeFlow::RouteOutcome;

use crate::helpers::*;

#[tokio::test]
async fn test_short_key_is_rejected_then_valid_key_completes() {
    let ctx = TestContext::new();

    let started = ctx.press(USER_ID, "import_wallet").await;
    assert_eq!(
        started.outcome,
        RouteOutcome::Started { flow: FlowId::WalletImport, step: StepId::AwaitingKey }
    );
    assert!(ctx.session(USER_ID).is_at(FlowId::WalletImport, StepId::AwaitingKey));

    let short_key = "3".repeat(50);
    let retried = ctx.send_text(USER_ID, &short_key).await;
    assert_eq!(
        retried.outcome,
        RouteOutcome::Retried { flow: FlowId::WalletImport, step: StepId::AwaitingKey }
    );
    assert!(replied(&retried, "Invalid private key length"));
    assert!(ctx.session(USER_ID).is_at(FlowId::WalletImport, StepId::AwaitingKey));
    assert!(ctx.session(USER_ID).profile.imported_wallet.is_none());

    let key = "4".repeat(70);
    let completed = ctx.send_text(USER_ID, &key).await;
    assert_eq!(completed.outcome, RouteOutcome::Completed(FlowId::WalletImport));

    let session = ctx.session(USER_ID);
    assert!(session.is_idle());
    let wallet = session.profile.imported_wallet.expect("wallet should be recorded");
    assert_eq!(wallet.fingerprint, key_fingerprint(&key));
}

#[tokio::test]
async fn test_private_key_never_leaves_the_step() {
    let ctx = TestContext::new();
    let key = format!("{}{}", "5Kd3NBUAdUnhyzenEwVLy9pBKxSwXvE9FMPyR4UKZvpe6E3AgLr", "Q7mWx2rTz9PbLc4HnJs8");
    assert_eq!(key.chars().count(), 71);

    ctx.press(USER_ID, "import_wallet").await;
    let completed = ctx.send_text(USER_ID, &key).await;
    assert_eq!(completed.outcome, RouteOutcome::Completed(FlowId::WalletImport));

    assert!(completed.messages.iter().all(|m| !m.text.contains(&key)));
    let stored = serde_json::to_string(&ctx.session(USER_ID)).expect("session serializes");
    assert!(!stored.contains(&key));
}

#[tokio::test]
async fn test_finalize_after_completion_confirms_import() {
    let ctx = TestContext::new();

    ctx.press(USER_ID, "import_wallet").await;
    ctx.send_text(USER_ID, &"6".repeat(88)).await;

    let finalized = ctx.press(USER_ID, "finalize_import").await;
    assert_eq!(finalized.outcome, RouteOutcome::ActionHandled);
    assert!(replied(&finalized, "Wallet imported successfully"));
}

#[tokio::test]
async fn test_finalize_inside_flow_ends_it() {
    let ctx = TestContext::new();

    ctx.press(USER_ID, "import_wallet").await;
    let finalized = ctx.press(USER_ID, "finalize_import").await;

    assert_eq!(finalized.outcome, RouteOutcome::Cancelled(FlowId::WalletImport));
    assert!(replied(&finalized, "No wallet pending import"));
    assert!(ctx.session(USER_ID).is_idle());
}

#[tokio::test]
async fn test_cancel_import_forgets_wallet_outside_flow() {
    let ctx = TestContext::new();

    ctx.press(USER_ID, "import_wallet").await;
    ctx.send_text(USER_ID, &"7".repeat(64)).await;
    assert!(ctx.session(USER_ID).profile.imported_wallet.is_some());

    let cancelled = ctx.press(USER_ID, "cancel_import").await;
    assert_eq!(cancelled.outcome, RouteOutcome::ActionHandled);
    assert!(ctx.session(USER_ID).profile.imported_wallet.is_none());
}

#[tokio::test]
async fn test_backup_command_enters_import() {
    let ctx = TestContext::new();

    let started = ctx.send_text(USER_ID, "/backup").await;
    assert_eq!(
        started.outcome,
        RouteOutcome::Started { flow: FlowId::WalletImport, step: StepId::AwaitingKey }
    );
    assert!(replied(&started, "private key"));
}

#[tokio::test]
async fn test_proceed_button_repeats_prompt() {
    let ctx = TestContext::new();

    ctx.press(USER_ID, "import_wallet").await;
    let proceed = ctx.press(USER_ID, "proceed_import").await;

    assert_eq!(
        proceed.outcome,
        RouteOutcome::Retried { flow: FlowId::WalletImport, step: StepId::AwaitingKey }
    );
    assert!(replied(&proceed, "Provide the private key"));
}

#[tokio::test]
async fn test_proceed_button_restarts_import_after_cancel() {
    let ctx = TestContext::new();

    let started = ctx.press(USER_ID, "import_wallet").await;
    assert!(started.messages.iter().any(|m| m.signatures().any(|s| s == "proceed_import")));
    ctx.send_text(USER_ID, "/cancel").await;
    assert!(ctx.session(USER_ID).is_idle());

    let proceed = ctx.press(USER_ID, "proceed_import").await;
    assert_eq!(
        proceed.outcome,
        RouteOutcome::Started { flow: FlowId::WalletImport, step: StepId::AwaitingKey }
    );
    assert!(replied(&proceed, "Provide the private key"));
    assert!(!replied(&proceed, "Invalid action"));
    assert!(ctx.session(USER_ID).is_at(FlowId::WalletImport, StepId::AwaitingKey));
}
