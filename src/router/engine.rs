//! Flow engine
//!
//! Routes one inbound event at a time per user: loads the session, decides
//! whether the event belongs to the active flow, runs the matching handler,
//! applies the handler's outcome and commits the session.

use std::sync::Arc;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, error, warn, Instrument};

use crate::middleware::auth::{AuthGate, HandlerTag};
use crate::middleware::logging::EventLogger;
use crate::models::{EventSignature, InboundEvent, OutboundMessage, Outbox, UserId};
use crate::services::ServiceFactory;
use crate::state::flows::{FlowDefinition, FlowId, StepId, StepSpec};
use crate::state::session::Session;
use crate::state::storage::SessionStore;
use crate::utils::errors::{FailureKind, TradeFlowError, Result};
use crate::utils::logging::log_flow_transition;
use super::handler::{HandlerContext, StepInput, StepOutcome};
use super::registry::{ActionRegistry, Resolution};

/// Reply sent when an event arrives while the user's previous one is still in progress
pub const BUSY_MESSAGE: &str = "⏳ Still processing your previous request, please wait.";

/// How an event was routed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// A flow was entered; `step` is where the session now waits
    Started { flow: FlowId, step: StepId },
    Advanced { flow: FlowId, step: StepId },
    /// The step handler rejected the input and kept the step
    Retried { flow: FlowId, step: StepId },
    Completed(FlowId),
    /// A fallback trigger ended the flow
    Cancelled(FlowId),
    ActionHandled,
    /// The event did not fit the current step; its prompt was repeated
    Reprompted { flow: FlowId, step: StepId },
    Unmatched,
    Unauthorized,
    /// Free text outside any flow
    Ignored,
    /// Another event for the same user is still being handled
    Busy,
    /// A handler failed; the session was left untouched
    Failed,
}

impl RouteOutcome {
    /// Whether the working session must be written back
    fn commits(&self) -> bool {
        matches!(
            self,
            RouteOutcome::Started { .. }
                | RouteOutcome::Advanced { .. }
                | RouteOutcome::Retried { .. }
                | RouteOutcome::Completed(_)
                | RouteOutcome::Cancelled(_)
                | RouteOutcome::ActionHandled
        )
    }
}

/// Result of dispatching one event
#[derive(Debug, Clone)]
pub struct Dispatch {
    pub outcome: RouteOutcome,
    pub messages: Vec<OutboundMessage>,
}

/// The conversational state router
pub struct FlowEngine {
    registry: Arc<ActionRegistry>,
    store: SessionStore,
    auth: AuthGate,
    services: ServiceFactory,
    logger: EventLogger,
    in_flight: DashMap<UserId, Arc<Mutex<()>>>,
}

impl FlowEngine {
    pub fn new(registry: ActionRegistry, store: SessionStore, auth: AuthGate, services: ServiceFactory) -> Self {
        Self {
            registry: Arc::new(registry),
            store,
            auth,
            services,
            logger: EventLogger::default(),
            in_flight: DashMap::new(),
        }
    }

    pub fn with_logger(mut self, logger: EventLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    pub fn services(&self) -> &ServiceFactory {
        &self.services
    }

    /// Route one event and return the replies to render.
    ///
    /// Never fails: every failure is turned into a user-facing reply.
    pub async fn dispatch(&self, event: InboundEvent) -> Dispatch {
        let span = self.logger.span(&event);
        self.dispatch_single_flight(event).instrument(span).await
    }

    async fn dispatch_single_flight(&self, event: InboundEvent) -> Dispatch {
        let lock = self
            .in_flight
            .entry(event.user_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let _guard = match lock.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                debug!("Rejecting event while previous one is in progress");
                let mut outbox = Outbox::new(event.chat_id, None);
                outbox.reply(BUSY_MESSAGE);
                return Dispatch {
                    outcome: RouteOutcome::Busy,
                    messages: outbox.into_messages(),
                };
            }
        };

        self.logger.log_event(&event);
        let timer = self.logger.start();

        let mut session = self.store.get(event.user_id);
        let mut outbox = Outbox::new(event.chat_id, event.message_id);

        let outcome = match self.route(&event, &mut session, &mut outbox).await {
            Ok(outcome) => {
                if outcome.commits() {
                    self.store.commit(event.user_id, session);
                }
                outcome
            }
            Err(e) => {
                if e.is_recoverable() {
                    warn!(error = %e, severity = %e.severity(), "Handler failed, session left unchanged");
                } else {
                    error!(error = %e, severity = %e.severity(), "Handler failed, session left unchanged");
                }
                outbox = Outbox::new(event.chat_id, None);
                outbox.reply(FailureKind::from(&e).user_message());
                RouteOutcome::Failed
            }
        };

        self.logger.log_outcome(&outcome, timer);

        Dispatch {
            outcome,
            messages: outbox.into_messages(),
        }
    }

    async fn route(&self, event: &InboundEvent, session: &mut Session, outbox: &mut Outbox) -> Result<RouteOutcome> {
        let signature = event.signature();

        if let Some(position) = session.position {
            let flow = self
                .registry
                .flow(position.flow)
                .ok_or_else(|| TradeFlowError::UnknownFlow(position.flow.to_string()))?;
            return self.route_in_flow(flow, position.step, signature, event, session, outbox).await;
        }

        let Some(signature) = signature else {
            debug!("Ignoring free text outside a flow");
            return Ok(RouteOutcome::Ignored);
        };

        match self.registry.resolve(&signature) {
            Resolution::FlowEntry(flow_id) => {
                let flow = self
                    .registry
                    .flow(flow_id)
                    .ok_or_else(|| TradeFlowError::UnknownFlow(flow_id.to_string()))?;

                if !self.authorize(event.user_id, flow.tag, outbox) {
                    return Ok(RouteOutcome::Unauthorized);
                }

                session.start_flow(flow.id, flow.initial_step);
                log_flow_transition(event.user_id, flow.id, None, Some(flow.initial_step));

                let step = self.step(flow, flow.initial_step)?;
                let outcome = self.run_step(step, StepInput::Entry(signature), event, session, outbox).await?;

                Ok(match self.apply(flow, step, outcome, event.user_id, session)? {
                    RouteOutcome::Advanced { flow, step } | RouteOutcome::Retried { flow, step } => {
                        RouteOutcome::Started { flow, step }
                    }
                    other => other,
                })
            }
            Resolution::StatelessAction(entry) => {
                if !self.authorize(event.user_id, entry.tag, outbox) {
                    return Ok(RouteOutcome::Unauthorized);
                }

                let handler = entry.handler.clone();
                let mut cx = HandlerContext::new(event, session, &self.services, outbox);
                handler.handle(&mut cx).await?;
                Ok(RouteOutcome::ActionHandled)
            }
            Resolution::Unmatched => {
                debug!(signature = %signature, "No registration for signature");
                outbox.reply(FailureKind::UnmatchedAction.user_message());
                Ok(RouteOutcome::Unmatched)
            }
        }
    }

    async fn route_in_flow(
        &self,
        flow: &FlowDefinition,
        step_id: StepId,
        signature: Option<EventSignature>,
        event: &InboundEvent,
        session: &mut Session,
        outbox: &mut Outbox,
    ) -> Result<RouteOutcome> {
        if let Some(fallback) = signature.as_ref().and_then(|s| flow.fallback_for(s)) {
            let handler = fallback.handler.clone();
            let mut cx = HandlerContext::new(event, session, &self.services, outbox);
            if let Err(e) = handler.handle(&mut cx, flow.id).await {
                warn!(flow = %flow.id, error = %e, "Fallback handler failed, ending flow anyway");
            }

            session.finish_flow();
            log_flow_transition(event.user_id, flow.id, Some(step_id), None);
            return Ok(RouteOutcome::Cancelled(flow.id));
        }

        let step = self.step(flow, step_id)?;

        let input = match StepInput::from_kind(&event.kind) {
            Some(input) if step.accepts(&event.kind) => input,
            _ => {
                if let Some(signature) = &signature {
                    if !self.registry.is_known(signature) {
                        debug!(signature = %signature, flow = %flow.id, "Unknown signature inside flow");
                        outbox.reply(FailureKind::UnmatchedAction.user_message());
                        return Ok(RouteOutcome::Unmatched);
                    }
                }

                debug!(flow = %flow.id, step = %step_id, "Event does not fit step, re-prompting");
                outbox.reply(step.prompt.clone());
                return Ok(RouteOutcome::Reprompted { flow: flow.id, step: step_id });
            }
        };

        if !self.authorize(event.user_id, flow.tag, outbox) {
            return Ok(RouteOutcome::Unauthorized);
        }

        let outcome = self.run_step(step, input, event, session, outbox).await?;
        self.apply(flow, step, outcome, event.user_id, session)
    }

    async fn run_step(
        &self,
        step: &StepSpec,
        input: StepInput,
        event: &InboundEvent,
        session: &mut Session,
        outbox: &mut Outbox,
    ) -> Result<StepOutcome> {
        let handler = step.handler.clone();
        let mut cx = HandlerContext::new(event, session, &self.services, outbox);
        handler.handle(&mut cx, input).await
    }

    /// Apply a step handler's outcome, rejecting transitions the table does not declare
    fn apply(
        &self,
        flow: &FlowDefinition,
        step: &StepSpec,
        outcome: StepOutcome,
        user_id: UserId,
        session: &mut Session,
    ) -> Result<RouteOutcome> {
        match outcome {
            StepOutcome::Advance(next) => {
                if !step.next_steps.contains(&next) {
                    return Err(TradeFlowError::InvalidStateTransition {
                        from: format!("{}/{}", flow.id, step.id),
                        to: next.to_string(),
                    });
                }
                session.advance(next)?;
                log_flow_transition(user_id, flow.id, Some(step.id), Some(next));
                Ok(RouteOutcome::Advanced { flow: flow.id, step: next })
            }
            StepOutcome::Complete => {
                if !step.completes {
                    return Err(TradeFlowError::InvalidStateTransition {
                        from: format!("{}/{}", flow.id, step.id),
                        to: "complete".to_string(),
                    });
                }
                session.finish_flow();
                log_flow_transition(user_id, flow.id, Some(step.id), None);
                Ok(RouteOutcome::Completed(flow.id))
            }
            StepOutcome::Retry => Ok(RouteOutcome::Retried { flow: flow.id, step: step.id }),
        }
    }

    fn step<'f>(&self, flow: &'f FlowDefinition, id: StepId) -> Result<&'f StepSpec> {
        flow.get_step(id).ok_or_else(|| TradeFlowError::InvalidStateTransition {
            from: flow.id.to_string(),
            to: id.to_string(),
        })
    }

    fn authorize(&self, user_id: UserId, tag: HandlerTag, outbox: &mut Outbox) -> bool {
        if self.auth.permit(user_id, tag) {
            return true;
        }
        outbox.reply(FailureKind::Unauthorized.user_message());
        false
    }
}
