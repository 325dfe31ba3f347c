//! Test context for unified test setup
//!
//! Builds the same engine the binary runs, minus the Telegram transport,
//! and offers shortcuts for sending events as a given user.

use std::sync::Arc;

use TradeFlow::config::Settings;
use TradeFlow::handlers::default_registry;
use TradeFlow::middleware::AuthGate;
use TradeFlow::models::{InboundEvent, UserId};
use TradeFlow::services::{PriceLookup, ServiceFactory, StaticLookup};
use TradeFlow::state::{FlowPosition, Session, SessionStore};
use TradeFlow::{Dispatch, FlowEngine};

use super::lookups::bonk_quote;

pub const USER_ID: UserId = UserId(400_001);
pub const OTHER_USER_ID: UserId = UserId(400_002);
pub const ADMIN_ID: UserId = UserId(555_666_777);
pub const WALLET_ADDRESS: &str = "6dyzT3kVsy27bPomXcKuLSPNXzreYqF2KiNM2HopZBXy";

/// Unified test context that manages all test components
pub struct TestContext {
    pub engine: Arc<FlowEngine>,
    pub settings: Settings,
}

impl TestContext {
    /// Create a context whose lookup knows a single token, `bonk`
    pub fn new() -> Self {
        Self::with_lookup(Arc::new(StaticLookup::new().with_quote("bonk", bonk_quote())))
    }

    /// Create a context with a specific price lookup
    pub fn with_lookup(lookup: Arc<dyn PriceLookup>) -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let settings = test_settings();
        let registry = default_registry().expect("default registry must build");
        let auth = AuthGate::from_settings(&settings);
        let services = ServiceFactory::with_lookup(settings.clone(), lookup);
        let engine = FlowEngine::new(registry, SessionStore::new(), auth, services);

        Self {
            engine: Arc::new(engine),
            settings,
        }
    }

    /// Send a message as `user`; `/commands` are recognized
    pub async fn send_text(&self, user: UserId, text: &str) -> Dispatch {
        self.engine
            .dispatch(InboundEvent::from_message_text(user, user.0, text))
            .await
    }

    /// Press an inline button as `user`
    pub async fn press(&self, user: UserId, data: &str) -> Dispatch {
        self.engine
            .dispatch(InboundEvent::callback(user, user.0, data).with_message_id(10))
            .await
    }

    /// Committed session of `user`, or a fresh one
    pub fn session(&self, user: UserId) -> Session {
        self.engine
            .store()
            .peek(user)
            .unwrap_or_else(|| Session::new(user))
    }

    pub fn position(&self, user: UserId) -> Option<FlowPosition> {
        self.session(user).position
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Settings valid for tests
pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.bot.token = "12345:test_token".to_string();
    settings.bot.admin_id = ADMIN_ID.0;
    settings.wallet.address = Some(WALLET_ADDRESS.to_string());
    settings.logging.level = "debug".to_string();
    settings
}

/// Text of every reply in a dispatch
pub fn texts(dispatch: &Dispatch) -> Vec<&str> {
    dispatch.messages.iter().map(|m| m.text.as_str()).collect()
}

/// Whether any reply contains `needle`
pub fn replied(dispatch: &Dispatch, needle: &str) -> bool {
    dispatch.messages.iter().any(|m| m.text.contains(needle))
}
