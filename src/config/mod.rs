//! Configuration module for Folio.
//!
//! Handles the settings file and environment variable expansion.

mod settings;

pub use settings::{
    expand_env_vars, GenerationSettings, LogFormat, LoggingSettings, Settings, SettingsError,
};
