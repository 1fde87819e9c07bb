//! Configuration module for the telegram-media-downloader.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - CLI argument parsing and merging
//! - Configuration validation
//! - Persisting download state (resume cursor, retry list)

pub mod loader;
pub mod validation;

pub use loader::{AccountConfig, Config, FormatFilters, OptionsConfig, StateConfig, TargetConfig};
pub use validation::{parse_chat_ref, validate_config, ChatRef};
