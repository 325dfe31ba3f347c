//! Action registry
//!
//! Maps event signatures to flow entries and stateless actions. Built once
//! at startup and shared read-only afterwards.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::middleware::auth::HandlerTag;
use crate::models::EventSignature;
use crate::state::flows::{CallbackPattern, FlowDefinition, FlowId, InputShape, Trigger};
use super::handler::ActionHandler;

/// Errors raised while building the registry
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Flow {0} is already registered")]
    DuplicateFlow(FlowId),

    #[error("Trigger {0} is already registered")]
    DuplicateTrigger(String),

    #[error("Flow {flow} is invalid: {reason}")]
    InvalidFlow { flow: FlowId, reason: String },
}

/// A stateless action bound to a trigger
#[derive(Clone)]
pub struct ActionEntry {
    pub trigger: Trigger,
    pub tag: HandlerTag,
    pub handler: Arc<dyn ActionHandler>,
}

impl std::fmt::Debug for ActionEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionEntry")
            .field("trigger", &self.trigger)
            .field("tag", &self.tag)
            .finish_non_exhaustive()
    }
}

/// Result of resolving a signature while no flow is active
#[derive(Debug)]
pub enum Resolution<'a> {
    FlowEntry(FlowId),
    StatelessAction(&'a ActionEntry),
    Unmatched,
}

/// Flow table plus stateless actions
#[derive(Debug, Default)]
pub struct ActionRegistry {
    flows: Vec<FlowDefinition>,
    actions: Vec<ActionEntry>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a flow after validating its table.
    ///
    /// Two flows may not share an entry trigger. A flow may share a trigger
    /// with a stateless action, in which case the flow wins resolution.
    pub fn register_flow(&mut self, flow: FlowDefinition) -> Result<(), RegistryError> {
        flow.validate()?;

        if self.flow(flow.id).is_some() {
            return Err(RegistryError::DuplicateFlow(flow.id));
        }

        for trigger in &flow.entry_triggers {
            if self.flows.iter().any(|f| f.entry_triggers.contains(trigger)) {
                return Err(RegistryError::DuplicateTrigger(trigger.to_string()));
            }
            if self.actions.iter().any(|a| &a.trigger == trigger) {
                debug!(trigger = %trigger, flow = %flow.id, "Flow entry shadows a stateless action");
            }
        }

        info!(flow = %flow.id, steps = flow.steps.len(), "Registered flow");
        self.flows.push(flow);
        Ok(())
    }

    /// Register a stateless action
    pub fn register_action(
        &mut self,
        trigger: Trigger,
        tag: HandlerTag,
        handler: impl ActionHandler + 'static,
    ) -> Result<(), RegistryError> {
        if self.actions.iter().any(|a| a.trigger == trigger) {
            return Err(RegistryError::DuplicateTrigger(trigger.to_string()));
        }

        debug!(trigger = %trigger, tag = %tag, "Registered action");
        self.actions.push(ActionEntry {
            trigger,
            tag,
            handler: Arc::new(handler),
        });
        Ok(())
    }

    /// Resolve a signature. Flow entries are matched before actions, and
    /// among actions an exact callback match beats a prefix match.
    pub fn resolve(&self, signature: &EventSignature) -> Resolution<'_> {
        if let Some(flow) = self.flows.iter().find(|f| f.is_entry(signature)) {
            return Resolution::FlowEntry(flow.id);
        }

        let exact = self
            .actions
            .iter()
            .filter(|a| !matches!(a.trigger, Trigger::Callback(CallbackPattern::Prefix(_))))
            .find(|a| a.trigger.matches(signature));

        let action = exact.or_else(|| self.actions.iter().find(|a| a.trigger.matches(signature)));

        match action {
            Some(entry) => Resolution::StatelessAction(entry),
            None => Resolution::Unmatched,
        }
    }

    /// Whether the signature is registered anywhere: as an entry, an action,
    /// a fallback, or a callback some step accepts
    pub fn is_known(&self, signature: &EventSignature) -> bool {
        if !matches!(self.resolve(signature), Resolution::Unmatched) {
            return true;
        }

        self.flows.iter().any(|flow| {
            flow.fallback_for(signature).is_some()
                || flow.steps.values().any(|step| {
                    step.accepts.iter().any(|shape| match (shape, signature) {
                        (InputShape::Callback(pattern), EventSignature::Callback(data)) => pattern.matches(data),
                        _ => false,
                    })
                })
        })
    }

    pub fn flow(&self, id: FlowId) -> Option<&FlowDefinition> {
        self.flows.iter().find(|f| f.id == id)
    }

    pub fn flows(&self) -> impl Iterator<Item = &FlowDefinition> {
        self.flows.iter()
    }

    pub fn actions(&self) -> impl Iterator<Item = &ActionEntry> {
        self.actions.iter()
    }
}
