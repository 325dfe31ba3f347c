//! Bot handlers module
//!
//! This module contains every handler and the canonical registry built
//! from them:
//! - Command actions for `/commands`
//! - Callback actions for menu buttons
//! - Flows for multi-step dialogues

pub mod actions;
pub mod callbacks;
pub mod commands;
pub mod flows;
pub mod menus;

pub use commands::Command;

use crate::router::registry::{ActionRegistry, RegistryError};

/// Build the registry with every flow and action the bot knows
pub fn default_registry() -> Result<ActionRegistry, RegistryError> {
    let mut registry = ActionRegistry::new();
    flows::register(&mut registry)?;
    commands::register(&mut registry)?;
    callbacks::register(&mut registry)?;
    Ok(registry)
}
