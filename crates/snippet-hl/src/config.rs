#![forbid(unsafe_code)]

//! Highlighter configuration.
//!
//! Defaults are deterministic. Environment variables override individual
//! fields; a rejected value keeps the default and is reported as a
//! [`ConfigError`].

use std::env;
use std::fmt;

use crate::style::Palette;

const ENV_PALETTE: &str = "SNIPPET_HL_PALETTE";
const ENV_PLACEHOLDER: &str = "SNIPPET_HL_PLACEHOLDER";
const ENV_CACHE_ENABLED: &str = "SNIPPET_HL_CACHE_ENABLED";
const ENV_CACHE_CAPACITY: &str = "SNIPPET_HL_CACHE_CAPACITY";

/// Text of the single token rendered for an empty line (no-break space).
pub const DEFAULT_PLACEHOLDER: &str = "\u{a0}";

/// Default number of formatted documents kept by the cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// Highlighter configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HighlightConfig {
    /// Family of default style tables.
    pub palette: Palette,
    /// Text emitted for empty lines so they keep their height when rendered.
    pub placeholder: String,
    pub cache_enabled: bool,
    /// Maximum cached documents; must be positive.
    pub cache_capacity: usize,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            palette: Palette::Dark,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            cache_enabled: true,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// Configuration parse diagnostics (env + validation).
#[derive(Debug, Clone)]
pub struct ConfigParse {
    pub config: HighlightConfig,
    pub errors: Vec<ConfigError>,
}

/// Configuration error with field context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl ConfigError {
    fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl HighlightConfig {
    /// Parse config from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let parsed = Self::from_env_with_diagnostics();
        for err in &parsed.errors {
            tracing::warn!(
                field = err.field,
                value = %err.value,
                message = %err.message,
                "ignoring invalid highlighter config"
            );
        }
        parsed.config
    }

    /// Parse config from environment variables and return diagnostics.
    #[must_use]
    pub fn from_env_with_diagnostics() -> ConfigParse {
        Self::from_env_with(|key| env::var(key).ok())
    }

    /// Parse config through an arbitrary variable lookup.
    pub fn from_env_with<F>(mut get: F) -> ConfigParse
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let mut errors = Vec::new();

        if let Some(value) = get(ENV_PALETTE) {
            match Palette::parse(&value) {
                Some(parsed) => config.palette = parsed,
                None => errors.push(ConfigError::new("palette", value, "expected dark|light")),
            }
        }

        if let Some(value) = get(ENV_PLACEHOLDER) {
            if value.is_empty() {
                errors.push(ConfigError::new(
                    "placeholder",
                    value,
                    "expected a non-empty string",
                ));
            } else {
                config.placeholder = value;
            }
        }

        if let Some(value) = get(ENV_CACHE_ENABLED) {
            match parse_bool(&value) {
                Some(parsed) => config.cache_enabled = parsed,
                None => errors.push(ConfigError::new(
                    "cache_enabled",
                    value,
                    "expected bool (1/0/true/false)",
                )),
            }
        }

        if let Some(value) = get(ENV_CACHE_CAPACITY) {
            match parse_usize(&value).filter(|&n| n > 0) {
                Some(parsed) => config.cache_capacity = parsed,
                None => errors.push(ConfigError::new(
                    "cache_capacity",
                    value,
                    "expected positive integer",
                )),
            }
        }

        if let Err(mut validation) = config.validate() {
            errors.append(&mut validation);
        }

        ConfigParse { config, errors }
    }

    /// Validate config constraints and return all violations.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();
        if self.placeholder.is_empty() {
            errors.push(ConfigError::new(
                "placeholder",
                "",
                "placeholder must be non-empty",
            ));
        }
        if self.cache_capacity == 0 {
            errors.push(ConfigError::new(
                "cache_capacity",
                "0",
                "cache_capacity must be > 0",
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Builder-style palette override.
    #[must_use]
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Builder-style placeholder override.
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Builder-style cache toggle.
    #[must_use]
    pub fn with_cache(mut self, enabled: bool, capacity: usize) -> Self {
        self.cache_enabled = enabled;
        self.cache_capacity = capacity;
        self
    }
}

#[inline]
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[inline]
fn parse_usize(value: &str) -> Option<usize> {
    value.trim().parse::<usize>().ok()
}
