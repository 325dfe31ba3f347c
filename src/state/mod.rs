//! State management module
//!
//! This module handles per-user sessions, the static flow table types,
//! and the in-memory stores.

pub mod balances;
pub mod flows;
pub mod session;
pub mod storage;

// Re-export commonly used state components
pub use balances::BalanceBook;
pub use flows::{FlowId, StepId, FlowDefinition, StepSpec, Trigger, CallbackPattern, InputShape};
pub use session::{Session, FlowPosition};
pub use storage::{SessionStore, StoreStats};
