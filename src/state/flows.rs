//! Flow definitions
//!
//! A flow is a named multi-step dialogue. Its definition is static: built
//! once at startup, validated, and never mutated afterwards. Flows and steps
//! are identified by enums rather than strings so a typo is a compile error.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;
use serde::{Deserialize, Serialize};

use crate::middleware::auth::HandlerTag;
use crate::models::{EventKind, EventSignature};
use crate::router::handler::{FallbackHandler, StepHandler};
use crate::router::registry::RegistryError;

/// Identifier of a multi-step flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowId {
    WalletImport,
    TokenLookup,
    CopyTrade,
    BuySlippage,
    SellSlippage,
    Sniper,
    LimitOrder,
    WalletLabel,
    AdminBalance,
}

impl FlowId {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowId::WalletImport => "wallet_import",
            FlowId::TokenLookup => "token_lookup",
            FlowId::CopyTrade => "copy_trade",
            FlowId::BuySlippage => "buy_slippage",
            FlowId::SellSlippage => "sell_slippage",
            FlowId::Sniper => "sniper",
            FlowId::LimitOrder => "limit_order",
            FlowId::WalletLabel => "wallet_label",
            FlowId::AdminBalance => "admin_balance",
        }
    }
}

impl fmt::Display for FlowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a step; only meaningful together with its flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepId {
    AwaitingKey,
    AwaitingToken,
    AwaitingAddress,
    AwaitingSlippage,
    AwaitingAction,
    AwaitingDetails,
    AwaitingLabel,
    AwaitingLine,
    AwaitingConfirmation,
}

impl StepId {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepId::AwaitingKey => "awaiting_key",
            StepId::AwaitingToken => "awaiting_token",
            StepId::AwaitingAddress => "awaiting_address",
            StepId::AwaitingSlippage => "awaiting_slippage",
            StepId::AwaitingAction => "awaiting_action",
            StepId::AwaitingDetails => "awaiting_details",
            StepId::AwaitingLabel => "awaiting_label",
            StepId::AwaitingLine => "awaiting_line",
            StepId::AwaitingConfirmation => "awaiting_confirmation",
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pattern over callback data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackPattern {
    Exact(String),
    Prefix(String),
}

impl CallbackPattern {
    pub fn matches(&self, data: &str) -> bool {
        match self {
            CallbackPattern::Exact(expected) => data == expected,
            CallbackPattern::Prefix(prefix) => data.starts_with(prefix.as_str()),
        }
    }
}

impl fmt::Display for CallbackPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackPattern::Exact(data) => write!(f, "{}", data),
            CallbackPattern::Prefix(prefix) => write!(f, "{}*", prefix),
        }
    }
}

/// Event signature pattern that starts or terminates a flow, or selects an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    Command(String),
    Callback(CallbackPattern),
}

impl Trigger {
    pub fn command(name: &str) -> Self {
        Trigger::Command(name.to_lowercase())
    }

    pub fn callback(data: &str) -> Self {
        Trigger::Callback(CallbackPattern::Exact(data.to_string()))
    }

    pub fn callback_prefix(prefix: &str) -> Self {
        Trigger::Callback(CallbackPattern::Prefix(prefix.to_string()))
    }

    pub fn matches(&self, signature: &EventSignature) -> bool {
        match (self, signature) {
            (Trigger::Command(expected), EventSignature::Command(name)) => expected == name,
            (Trigger::Callback(pattern), EventSignature::Callback(data)) => pattern.matches(data),
            _ => false,
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Command(name) => write!(f, "/{}", name),
            Trigger::Callback(pattern) => write!(f, "callback:{}", pattern),
        }
    }
}

/// Shape of input a step accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputShape {
    FreeText,
    Callback(CallbackPattern),
}

impl InputShape {
    pub fn accepts(&self, kind: &EventKind) -> bool {
        match (self, kind) {
            (InputShape::FreeText, EventKind::FreeText(_)) => true,
            (InputShape::Callback(pattern), EventKind::Callback(data)) => pattern.matches(data),
            _ => false,
        }
    }
}

/// One state of a flow: what it accepts and who handles it
#[derive(Clone)]
pub struct StepSpec {
    pub id: StepId,
    pub accepts: Vec<InputShape>,
    /// Shown again when an event does not fit this step
    pub prompt: String,
    /// Steps the handler may advance to
    pub next_steps: Vec<StepId>,
    /// Whether the handler may finish the flow from here
    pub completes: bool,
    pub handler: Arc<dyn StepHandler>,
}

impl StepSpec {
    /// A step waiting for free text
    pub fn text(id: StepId, prompt: &str, handler: impl StepHandler + 'static) -> Self {
        Self {
            id,
            accepts: vec![InputShape::FreeText],
            prompt: prompt.to_string(),
            next_steps: Vec::new(),
            completes: false,
            handler: Arc::new(handler),
        }
    }

    /// Also accept an exact callback
    pub fn or_callback(mut self, data: &str) -> Self {
        self.accepts.push(InputShape::Callback(CallbackPattern::Exact(data.to_string())));
        self
    }

    pub fn then(mut self, next: StepId) -> Self {
        self.next_steps.push(next);
        self
    }

    pub fn completes(mut self) -> Self {
        self.completes = true;
        self
    }

    pub fn accepts(&self, kind: &EventKind) -> bool {
        self.accepts.iter().any(|shape| shape.accepts(kind))
    }
}

impl fmt::Debug for StepSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepSpec")
            .field("id", &self.id)
            .field("accepts", &self.accepts)
            .field("next_steps", &self.next_steps)
            .field("completes", &self.completes)
            .finish_non_exhaustive()
    }
}

/// Trigger that terminates the flow from any step
#[derive(Clone)]
pub struct Fallback {
    pub trigger: Trigger,
    pub handler: Arc<dyn FallbackHandler>,
}

/// Static description of a multi-step flow
#[derive(Clone)]
pub struct FlowDefinition {
    pub id: FlowId,
    pub tag: HandlerTag,
    pub entry_triggers: Vec<Trigger>,
    pub initial_step: StepId,
    pub steps: HashMap<StepId, StepSpec>,
    pub fallbacks: Vec<Fallback>,
}

impl FlowDefinition {
    pub fn new(id: FlowId, initial_step: StepId) -> Self {
        Self {
            id,
            tag: HandlerTag::Public,
            entry_triggers: Vec::new(),
            initial_step,
            steps: HashMap::new(),
            fallbacks: Vec::new(),
        }
    }

    pub fn tagged(mut self, tag: HandlerTag) -> Self {
        self.tag = tag;
        self
    }

    pub fn entry(mut self, trigger: Trigger) -> Self {
        self.entry_triggers.push(trigger);
        self
    }

    pub fn step(mut self, spec: StepSpec) -> Self {
        self.steps.insert(spec.id, spec);
        self
    }

    pub fn fallback(mut self, trigger: Trigger, handler: impl FallbackHandler + 'static) -> Self {
        self.fallbacks.push(Fallback {
            trigger,
            handler: Arc::new(handler),
        });
        self
    }

    pub fn get_step(&self, id: StepId) -> Option<&StepSpec> {
        self.steps.get(&id)
    }

    pub fn is_entry(&self, signature: &EventSignature) -> bool {
        self.entry_triggers.iter().any(|t| t.matches(signature))
    }

    pub fn fallback_for(&self, signature: &EventSignature) -> Option<&Fallback> {
        self.fallbacks.iter().find(|f| f.trigger.matches(signature))
    }

    /// Check the table is internally consistent.
    ///
    /// Every step reachable from the initial step must be able to reach a
    /// terminal return: either a completing step or one of the fallbacks.
    pub fn validate(&self) -> Result<(), RegistryError> {
        let invalid = |reason: String| RegistryError::InvalidFlow { flow: self.id, reason };

        if self.entry_triggers.is_empty() {
            return Err(invalid("flow has no entry triggers".to_string()));
        }

        if !self.steps.contains_key(&self.initial_step) {
            return Err(invalid(format!("initial step {} is not defined", self.initial_step)));
        }

        for step in self.steps.values() {
            for next in &step.next_steps {
                if !self.steps.contains_key(next) {
                    return Err(invalid(format!("step {} advances to undefined step {}", step.id, next)));
                }
            }
        }

        if !self.fallbacks.is_empty() {
            return Ok(());
        }

        for step in self.reachable_steps() {
            if !self.can_terminate_from(step) {
                return Err(invalid(format!("step {} has no path to completion", step)));
            }
        }

        Ok(())
    }

    fn reachable_steps(&self) -> HashSet<StepId> {
        self.walk_from(self.initial_step)
    }

    fn can_terminate_from(&self, start: StepId) -> bool {
        self.walk_from(start)
            .iter()
            .any(|id| self.steps.get(id).map_or(false, |s| s.completes))
    }

    fn walk_from(&self, start: StepId) -> HashSet<StepId> {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([start]);

        while let Some(id) = queue.pop_front() {
            if !seen.insert(id) {
                continue;
            }
            if let Some(step) = self.steps.get(&id) {
                queue.extend(step.next_steps.iter().copied());
            }
        }

        seen
    }
}

impl fmt::Debug for FlowDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowDefinition")
            .field("id", &self.id)
            .field("tag", &self.tag)
            .field("entry_triggers", &self.entry_triggers)
            .field("initial_step", &self.initial_step)
            .field("steps", &self.steps)
            .field("fallbacks", &self.fallbacks.iter().map(|f| &f.trigger).collect::<Vec<_>>())
            .finish()
    }
}
