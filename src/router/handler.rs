//! Handler traits
//!
//! Step, action and fallback handlers are the only code that reads event
//! payloads and produces replies. They receive a [`HandlerContext`] borrowed
//! for the duration of a single event and never keep the session beyond it.

use async_trait::async_trait;

use crate::models::{EventKind, EventSignature, InboundEvent, Outbox, UserId};
use crate::services::ServiceFactory;
use crate::state::flows::{FlowId, StepId};
use crate::state::session::Session;
use crate::utils::errors::Result;

/// Everything a handler may touch while handling one event
pub struct HandlerContext<'a> {
    pub event: &'a InboundEvent,
    /// Working copy of the user's session; committed by the engine
    pub session: &'a mut Session,
    pub services: &'a ServiceFactory,
    pub outbox: &'a mut Outbox,
}

impl<'a> HandlerContext<'a> {
    pub fn new(
        event: &'a InboundEvent,
        session: &'a mut Session,
        services: &'a ServiceFactory,
        outbox: &'a mut Outbox,
    ) -> Self {
        Self {
            event,
            session,
            services,
            outbox,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.event.user_id
    }
}

/// Payload handed to a step handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepInput {
    /// The event that started the flow; carries no data for the step
    Entry(EventSignature),
    Text(String),
    Callback(String),
}

impl StepInput {
    /// Input for an in-flow event. Commands never reach a step.
    pub fn from_kind(kind: &EventKind) -> Option<Self> {
        match kind {
            EventKind::FreeText(text) => Some(StepInput::Text(text.clone())),
            EventKind::Callback(data) => Some(StepInput::Callback(data.clone())),
            EventKind::Command { .. } => None,
        }
    }

    pub fn is_entry(&self) -> bool {
        matches!(self, StepInput::Entry(_))
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            StepInput::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// What a step handler wants the engine to do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Move to another step of the same flow
    Advance(StepId),
    /// Finish the flow
    Complete,
    /// Stay in the current step
    Retry,
}

/// Handler for one step of a flow
#[async_trait]
pub trait StepHandler: Send + Sync {
    async fn handle(&self, cx: &mut HandlerContext<'_>, input: StepInput) -> Result<StepOutcome>;
}

/// Handler for an event that does not touch flow state
#[async_trait]
pub trait ActionHandler: Send + Sync {
    async fn handle(&self, cx: &mut HandlerContext<'_>) -> Result<()>;
}

/// Handler run when a fallback trigger ends a flow.
///
/// The flow is terminated whatever this returns.
#[async_trait]
pub trait FallbackHandler: Send + Sync {
    async fn handle(&self, cx: &mut HandlerContext<'_>, flow: FlowId) -> Result<()>;
}
