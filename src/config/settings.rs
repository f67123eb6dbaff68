//! TOML-based configuration for Folio.
//!
//! Supports a config file (folio.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [logging]
//! level = "info"       # trace | debug | info | warn | error
//! format = "pretty"    # pretty | json
//!
//! [generation]
//! default_no_data_message = "No data to display."
//! slow_component_ms = 2000
//! catch_panics = true
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub generation: GenerationSettings,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration. `RUST_LOG` overrides `level` when set.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default level (trace, debug, info, warn, error).
    pub level: String,

    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Report generation configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Message given to components that declare none.
    pub default_no_data_message: Option<String>,

    /// Components slower than this are logged as warnings; 0 disables the check.
    pub slow_component_ms: u64,

    /// Turn a panicking generator into an error entry instead of unwinding.
    pub catch_panics: bool,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            default_no_data_message: Some("No data to display.".to_string()),
            slow_component_ms: 2000,
            catch_panics: true,
        }
    }
}

impl Settings {
    /// Parse settings from TOML text, expanding environment variables.
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content)?;
        settings.resolved()
    }

    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `FOLIO_CONFIG`
    /// 2. `./folio.toml`
    /// 3. `~/.config/folio/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("FOLIO_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("folio.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("folio").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// Expand environment variables in string values, then validate.
    fn resolved(mut self) -> Result<Self, SettingsError> {
        self.logging.level = expand_env_vars(&self.logging.level)?.to_lowercase();
        if let Some(message) = &self.generation.default_no_data_message {
            self.generation.default_no_data_message = Some(expand_env_vars(message)?);
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if !LEVELS.contains(&self.logging.level.as_str()) {
            return Err(SettingsError::InvalidConfig(format!(
                "unknown log level '{}', expected one of {}",
                self.logging.level,
                LEVELS.join(", ")
            )));
        }
        Ok(())
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    expand_vars(s, |name| env::var(name).ok())
}

/// Expand `${VAR}` and `$VAR` using `lookup`. A lone `$` is kept as is.
fn expand_vars<F>(s: &str, lookup: F) -> Result<String, SettingsError>
where
    F: Fn(&str) -> Option<String>,
{
    let resolve = |name: String| lookup(&name).ok_or(SettingsError::MissingEnvVar(name));

    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        if chars.next_if_eq(&'{').is_some() {
            let name: String = chars.by_ref().take_while(|&ch| ch != '}').collect();
            result.push_str(&resolve(name)?);
            continue;
        }

        let mut name = String::new();
        while let Some(ch) = chars.next_if(|ch| ch.is_alphanumeric() || *ch == '_') {
            name.push(ch);
        }

        if name.is_empty() {
            result.push('$');
        } else {
            result.push_str(&resolve(name)?);
        }
    }

    Ok(result)
}
