//! Authorization gate
//!
//! Every handler carries a [`HandlerTag`]. Before a handler runs, the gate
//! checks the sender's identity against the rule registered for that tag.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::settings::Settings;
use crate::models::UserId;
use crate::utils::errors::{TradeFlowError, Result};

/// Access class of a handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerTag {
    /// Open to every user
    Public,
    /// Reserved for the configured administrator
    Admin,
}

impl fmt::Display for HandlerTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerTag::Public => f.write_str("public"),
            HandlerTag::Admin => f.write_str("admin"),
        }
    }
}

type Rule = Arc<dyn Fn(UserId) -> bool + Send + Sync>;

/// Identity predicates keyed by handler tag
#[derive(Clone)]
pub struct AuthGate {
    rules: HashMap<HandlerTag, Rule>,
}

impl AuthGate {
    /// Gate that permits public handlers and denies everything else
    pub fn new() -> Self {
        let mut rules: HashMap<HandlerTag, Rule> = HashMap::new();
        rules.insert(HandlerTag::Public, Arc::new(|_| true));
        Self { rules }
    }

    /// Gate with the admin rule bound to a single identity
    pub fn with_admin(admin_id: UserId) -> Self {
        Self::new().with_rule(HandlerTag::Admin, move |identity| identity == admin_id)
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_admin(UserId(settings.bot.admin_id))
    }

    /// Replace the rule for a tag
    pub fn with_rule<F>(mut self, tag: HandlerTag, rule: F) -> Self
    where
        F: Fn(UserId) -> bool + Send + Sync + 'static,
    {
        self.rules.insert(tag, Arc::new(rule));
        self
    }

    /// Whether `identity` may run a handler tagged `tag`. Tags without a rule deny.
    pub fn permit(&self, identity: UserId, tag: HandlerTag) -> bool {
        let allowed = self.rules.get(&tag).map_or(false, |rule| rule(identity));

        if allowed {
            debug!(user_id = %identity, tag = %tag, "Authorization granted");
        } else {
            warn!(user_id = %identity, tag = %tag, "Unauthorized access attempt");
        }

        allowed
    }

    /// Like [`permit`](Self::permit) but as a `Result`
    pub fn check(&self, identity: UserId, tag: HandlerTag) -> Result<()> {
        if self.permit(identity, tag) {
            Ok(())
        } else {
            Err(TradeFlowError::PermissionDenied(format!("{} privileges required", tag)))
        }
    }
}

impl Default for AuthGate {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthGate")
            .field("tags", &self.rules.keys().collect::<Vec<_>>())
            .finish()
    }
}
