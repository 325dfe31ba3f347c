//! Middleware module
//!
//! This module contains the authorization gate and dispatch logging

pub mod auth;
pub mod logging;

// Re-export commonly used middleware
pub use auth::{AuthGate, HandlerTag};
pub use logging::EventLogger;
