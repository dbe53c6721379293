//! Shared types for the campaign tool.
//!
//! Nothing in here holds process-wide state: the translator and the app config
//! are plain values constructed by the binary and handed to whoever needs them.

pub mod config;
pub mod i18n;
pub mod types;

pub use config::{AppConfig, ConfigError};
pub use i18n::{Language, Translator};
pub use types::RecordId;
