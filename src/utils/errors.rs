//! Error handling for TradeFlow
//!
//! This module defines the main error types used throughout the application
//! and the per-event failure taxonomy reported back to users.

use thiserror::Error;
use crate::router::registry::RegistryError;

/// Main error type for TradeFlow application
#[derive(Error, Debug)]
pub enum TradeFlowError {
    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Price lookup error: {0}")]
    Lookup(#[from] LookupError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Unknown flow: {0}")]
    UnknownFlow(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Price lookup specific errors
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Price lookup request failed: {0}")]
    RequestFailed(String),

    #[error("Price lookup timeout")]
    Timeout,

    #[error("Price lookup service unreachable")]
    Connection,

    #[error("Invalid price lookup response: {0}")]
    InvalidResponse(String),
}

/// Result type alias for TradeFlow operations
pub type Result<T> = std::result::Result<T, TradeFlowError>;

/// Result type alias for price lookup operations
pub type LookupResult<T> = std::result::Result<T, LookupError>;

impl TradeFlowError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            TradeFlowError::Telegram(_) => true,
            TradeFlowError::Lookup(_) => true,
            TradeFlowError::Registry(_) => false,
            TradeFlowError::Config(_) => false,
            TradeFlowError::PermissionDenied(_) => false,
            TradeFlowError::InvalidStateTransition { .. } => false,
            TradeFlowError::UnknownFlow(_) => false,
            TradeFlowError::Http(_) => true,
            TradeFlowError::Serialization(_) => false,
            TradeFlowError::Io(_) => true,
            TradeFlowError::UrlParse(_) => false,
            TradeFlowError::InvalidInput(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TradeFlowError::Registry(_) => ErrorSeverity::Critical,
            TradeFlowError::Config(_) => ErrorSeverity::Critical,
            TradeFlowError::PermissionDenied(_) => ErrorSeverity::Warning,
            TradeFlowError::Lookup(_) => ErrorSeverity::Warning,
            TradeFlowError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Kinds of per-event failure surfaced to the user.
///
/// None of these are fatal: the flow engine handles each one for the event
/// that caused it and never lets it propagate further.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Input failed a step validator; the step is re-prompted
    InvalidInput,
    /// The acting identity may not invoke the handler
    Unauthorized,
    /// No registration exists for the event signature
    UnmatchedAction,
    /// An outbound collaborator errored or timed out
    CollaboratorFailure,
}

impl FailureKind {
    /// Text shown to the user for this failure
    pub fn user_message(&self) -> &'static str {
        match self {
            FailureKind::InvalidInput => "❌ Invalid input, please try again.",
            FailureKind::Unauthorized => "❌ Unauthorized access.",
            FailureKind::UnmatchedAction => "❌ Invalid action.",
            FailureKind::CollaboratorFailure => "❌ Something went wrong. Please try again later.",
        }
    }
}

impl From<&TradeFlowError> for FailureKind {
    fn from(error: &TradeFlowError) -> Self {
        match error {
            TradeFlowError::PermissionDenied(_) => FailureKind::Unauthorized,
            TradeFlowError::InvalidInput(_) => FailureKind::InvalidInput,
            _ => FailureKind::CollaboratorFailure,
        }
    }
}
