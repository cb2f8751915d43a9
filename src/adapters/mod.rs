//! Concrete adapter implementations for ports.

pub mod canned_adapter;
pub mod file_config_adapter;
pub mod gemini_adapter;
#[cfg(feature = "web")]
pub mod web;
