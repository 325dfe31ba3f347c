//! TradeFlow Telegram Bot
//!
//! Main application entry point

use std::sync::Arc;
use anyhow::Context;
use teloxide::{prelude::*, types::{CallbackQuery, Update}};
use teloxide::dispatching::UpdateHandler;
use teloxide::utils::command::BotCommands;
use tracing::{info, warn, error};

use TradeFlow::{
    config::Settings,
    handlers::{default_registry, Command},
    middleware::AuthGate,
    services::ServiceFactory,
    state::SessionStore,
    transport::telegram,
    utils::logging,
    FlowEngine,
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("failed to load configuration")?;
    settings.validate()?;

    // Initialize logging
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", TradeFlow::info());

    // Initialize bot
    let bot = Bot::new(&settings.bot.token);

    // Initialize services and the router
    info!("Initializing services...");
    let services = ServiceFactory::new(settings.clone())?;
    let registry = default_registry()?;
    let auth = AuthGate::from_settings(&settings);
    let engine = Arc::new(FlowEngine::new(registry, SessionStore::new(), auth, services));

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!(error = %e, "Failed to publish the command list");
    }

    let mut dispatcher = Dispatcher::builder(bot, create_handler())
        .dependencies(dptree::deps![engine])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd.id);
        })
        .enable_ctrlc_handler()
        .build();

    info!("TradeFlow bot is ready, starting polling...");
    dispatcher.dispatch().await;

    info!("TradeFlow bot has been shut down.");
    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    dptree::entry()
        .branch(Update::filter_message().endpoint(handle_messages))
        .branch(Update::filter_callback_query().endpoint(handle_callbacks))
}

/// Route a text message or command
async fn handle_messages(bot: Bot, msg: Message, engine: Arc<FlowEngine>) -> HandlerResult {
    let Some(event) = telegram::event_from_message(&msg) else {
        return Ok(());
    };

    let dispatch = engine.dispatch(event).await;
    if let Err(e) = telegram::render(&bot, dispatch.messages).await {
        error!(chat_id = msg.chat.id.0, error = %e, "Failed to deliver replies");
        return Err(e.into());
    }

    Ok(())
}

/// Route a button press
async fn handle_callbacks(bot: Bot, query: CallbackQuery, engine: Arc<FlowEngine>) -> HandlerResult {
    telegram::acknowledge(&bot, &query).await;

    let Some(event) = telegram::event_from_callback(&query) else {
        return Ok(());
    };

    let dispatch = engine.dispatch(event).await;
    if let Err(e) = telegram::render(&bot, dispatch.messages).await {
        error!(user_id = query.from.id.0, error = %e, "Failed to deliver replies");
        return Err(e.into());
    }

    Ok(())
}
