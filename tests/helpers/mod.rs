//! Test helpers module
//!
//! This module provides utilities for testing the TradeFlow router.
//! It includes a test context wrapping a fully registered engine, price
//! lookup doubles and a mock DexScreener server.

pub mod lookups;
pub mod test_context;

pub use dexscreener_mock::*;
pub use lookups::*;
pub use test_context::*;
