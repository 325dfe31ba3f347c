//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{TradeFlowError, Result};
use crate::utils::helpers::is_base58_address;
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(&settings.bot)?;
    validate_lookup_config(&settings.lookup)?;
    validate_wallet_config(&settings.wallet)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate bot configuration
fn validate_bot_config(config: &super::BotConfig) -> Result<()> {
    if config.token.is_empty() {
        return Err(TradeFlowError::Config(
            "Bot token is required".to_string()
        ));
    }

    if config.admin_id == 0 {
        return Err(TradeFlowError::Config(
            "Admin ID must be configured".to_string()
        ));
    }

    Ok(())
}

/// Validate price lookup configuration
fn validate_lookup_config(config: &super::LookupConfig) -> Result<()> {
    if config.api_url.is_empty() {
        return Err(TradeFlowError::Config(
            "Price lookup API URL is required".to_string()
        ));
    }

    url::Url::parse(&config.api_url)?;

    if config.timeout_seconds == 0 {
        return Err(TradeFlowError::Config(
            "Price lookup timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate wallet display configuration
fn validate_wallet_config(config: &super::WalletConfig) -> Result<()> {
    if let Some(address) = &config.address {
        if !is_base58_address(address) {
            return Err(TradeFlowError::Config(
                format!("Wallet address is not a valid base-58 address: {}", address)
            ));
        }
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(TradeFlowError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(TradeFlowError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}
