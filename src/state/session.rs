//! Per-user session
//!
//! A session tracks which flow a user is in, the step within it, scratch
//! values collected along the way, and the profile data that survives
//! between flows.

use std::collections::HashMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{UserId, UserProfile};
use crate::utils::errors::{TradeFlowError, Result};
use super::flows::{FlowId, StepId};

/// Position inside an active flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowPosition {
    pub flow: FlowId,
    pub step: StepId,
}

/// User session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    /// `None` when no flow is active
    pub position: Option<FlowPosition>,
    /// Partial input of the active flow, cleared when the flow ends
    pub scratch: HashMap<String, String>,
    pub profile: UserProfile,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            position: None,
            scratch: HashMap::new(),
            profile: UserProfile::default(),
            updated_at: Utc::now(),
        }
    }

    /// Enter a flow at its initial step with empty scratch
    pub fn start_flow(&mut self, flow: FlowId, initial_step: StepId) {
        self.position = Some(FlowPosition { flow, step: initial_step });
        self.scratch.clear();
        self.touch();
    }

    /// Move to another step of the active flow
    pub fn advance(&mut self, step: StepId) -> Result<()> {
        let position = self.position.as_mut().ok_or_else(|| TradeFlowError::InvalidStateTransition {
            from: "no_flow".to_string(),
            to: step.to_string(),
        })?;

        position.step = step;
        self.touch();
        Ok(())
    }

    /// Leave the active flow and purge its scratch
    pub fn finish_flow(&mut self) {
        self.position = None;
        self.scratch.clear();
        self.touch();
    }

    pub fn current_flow(&self) -> Option<FlowId> {
        self.position.map(|p| p.flow)
    }

    pub fn current_step(&self) -> Option<StepId> {
        self.position.map(|p| p.step)
    }

    pub fn is_idle(&self) -> bool {
        self.position.is_none()
    }

    pub fn is_at(&self, flow: FlowId, step: StepId) -> bool {
        self.position == Some(FlowPosition { flow, step })
    }

    pub fn set_text(&mut self, key: &str, value: impl Into<String>) {
        self.scratch.insert(key.to_string(), value.into());
        self.touch();
    }

    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.scratch.get(key).map(String::as_str)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
