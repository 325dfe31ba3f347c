//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod event;
pub mod order;
pub mod reply;
pub mod user;
pub mod wallet;

// Re-export commonly used models
pub use event::{InboundEvent, EventKind, EventSignature};
pub use order::LimitOrder;
pub use reply::{Button, Keyboard, Delivery, OutboundMessage, Outbox, button};
pub use user::{UserId, UserProfile};
pub use wallet::{ImportedWallet, WalletBalance, Currency};
