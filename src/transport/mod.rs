//! Chat transport adapters

pub mod telegram;
