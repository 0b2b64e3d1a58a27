//! Data models: the standardized document, extraction rules, configuration.

pub mod config;
pub mod document;
pub mod rule;
