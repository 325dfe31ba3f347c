//! Dispatch logging
//!
//! Records what came in, how the flow engine routed it, and how long it
//! took. Secret input (private keys) is never written out: free text is only
//! logged by length.

use std::time::{Duration, Instant};
use tracing::{debug, info, warn, Span};

use crate::models::{EventKind, InboundEvent};
use crate::router::engine::RouteOutcome;

/// Dispatches slower than this are reported
const SLOW_DISPATCH: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone)]
pub struct EventLogger {
    log_events: bool,
    log_performance: bool,
}

impl EventLogger {
    pub fn new(log_events: bool, log_performance: bool) -> Self {
        Self {
            log_events,
            log_performance,
        }
    }

    /// Span wrapping one dispatch; fields are the event's correlation data
    pub fn span(&self, event: &InboundEvent) -> Span {
        tracing::info_span!(
            "dispatch",
            event_id = %event.event_id,
            user_id = %event.user_id,
            chat_id = event.chat_id,
        )
    }

    pub fn log_event(&self, event: &InboundEvent) {
        if !self.log_events {
            return;
        }

        match &event.kind {
            EventKind::Command { name, args } => {
                info!(command = %name, args = args.len(), "Command received");
            }
            EventKind::Callback(data) => {
                info!(callback_data = %data, "Callback query received");
            }
            EventKind::FreeText(text) => {
                debug!(length = text.chars().count(), "Text message received");
            }
        }
    }

    /// Start timing a dispatch
    pub fn start(&self) -> DispatchTimer {
        DispatchTimer {
            start: Instant::now(),
            enabled: self.log_performance,
        }
    }

    pub fn log_outcome(&self, outcome: &RouteOutcome, timer: DispatchTimer) {
        let elapsed = timer.start.elapsed();

        if self.log_events {
            match outcome {
                RouteOutcome::Unauthorized | RouteOutcome::Failed => {
                    warn!(outcome = ?outcome, "Event routed");
                }
                _ => info!(outcome = ?outcome, "Event routed"),
            }
        }

        if timer.enabled {
            let duration_ms = elapsed.as_millis() as u64;
            if elapsed > SLOW_DISPATCH {
                warn!(duration_ms, "Slow dispatch detected");
            } else {
                debug!(duration_ms, "Dispatch completed");
            }
        }
    }
}

impl Default for EventLogger {
    fn default() -> Self {
        Self::new(true, true)
    }
}

/// Elapsed time of one dispatch
pub struct DispatchTimer {
    start: Instant,
    enabled: bool,
}
