//! Conversational state router
//!
//! This module contains the handler traits, the action registry and the
//! flow engine that ties them to the session store.

pub mod engine;
pub mod handler;
pub mod registry;

pub use engine::{Dispatch, FlowEngine, RouteOutcome};
pub use handler::{ActionHandler, FallbackHandler, HandlerContext, StepHandler, StepInput, StepOutcome};
pub use registry::{ActionEntry, ActionRegistry, RegistryError, Resolution};
