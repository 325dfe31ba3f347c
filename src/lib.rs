//! TradeFlow Telegram Bot
//!
//! A chat-driven trading front end. Every inbound message or button press
//! is routed through a per-user state machine: multi-step flows, stateless
//! menu actions, an admin gate and a token price lookup.

#![allow(non_snake_case)]

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod router;
pub mod services;
pub mod state;
pub mod transport;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{TradeFlowError, Result};

// Re-export main components for easy access
pub use router::{FlowEngine, Dispatch, RouteOutcome};
pub use services::ServiceFactory;
pub use state::SessionStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
