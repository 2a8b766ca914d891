#![forbid(unsafe_code)]

//! Environment-driven configuration.
//!
//! The only tunables are the debounce delay of search inputs and the default
//! lifetime of notifications. Both can be overridden through environment
//! variables; malformed values keep the default and are reported as
//! [`ConfigError`] diagnostics instead of failing startup.
//!
//! | Variable            | Field            | Default |
//! |---------------------|------------------|---------|
//! | `SHELF_DEBOUNCE_MS` | `debounce_delay` | 300     |
//! | `SHELF_TOAST_MS`    | `toast_duration` | 3000    |

use std::env;
use std::fmt;
use std::time::Duration;

/// Environment variable overriding [`ShelfConfig::debounce_delay`] (milliseconds).
pub const ENV_DEBOUNCE_MS: &str = "SHELF_DEBOUNCE_MS";
/// Environment variable overriding [`ShelfConfig::toast_duration`] (milliseconds).
pub const ENV_TOAST_MS: &str = "SHELF_TOAST_MS";

/// Default quiet period before a debounced write settles.
pub const DEFAULT_DEBOUNCE_DELAY: Duration = Duration::from_millis(300);
/// Default lifetime of a notification.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(3000);

/// Runtime configuration shared by the reactive and notification layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShelfConfig {
    /// Quiet period after the last write before a debounced value settles.
    pub debounce_delay: Duration,
    /// Lifetime of a notification added without an explicit duration.
    pub toast_duration: Duration,
}

impl Default for ShelfConfig {
    fn default() -> Self {
        Self {
            debounce_delay: DEFAULT_DEBOUNCE_DELAY,
            toast_duration: DEFAULT_TOAST_DURATION,
        }
    }
}

/// Configuration parse result with diagnostics.
#[derive(Debug, Clone)]
pub struct ConfigParse {
    pub config: ShelfConfig,
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

impl ShelfConfig {
    /// Parse config from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with_diagnostics().config
    }

    /// Parse config from environment variables and return diagnostics.
    #[must_use]
    pub fn from_env_with_diagnostics() -> ConfigParse {
        from_env_with(|key| env::var(key).ok())
    }

    /// Set the debounce delay.
    #[must_use]
    pub fn with_debounce_delay(mut self, delay: Duration) -> Self {
        self.debounce_delay = delay;
        self
    }

    /// Set the default notification lifetime.
    #[must_use]
    pub fn with_toast_duration(mut self, duration: Duration) -> Self {
        self.toast_duration = duration;
        self
    }

    /// Validate config constraints and return all violations.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();
        if self.toast_duration.is_zero() {
            errors.push(ConfigError::new(
                "toast_duration",
                "0",
                "notifications need a positive lifetime",
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

pub(crate) fn from_env_with<F>(mut get: F) -> ConfigParse
where
    F: FnMut(&str) -> Option<String>,
{
    let mut config = ShelfConfig::default();
    let mut errors = Vec::new();

    if let Some(value) = get(ENV_DEBOUNCE_MS) {
        match parse_millis(&value) {
            Some(parsed) => config.debounce_delay = parsed,
            None => errors.push(ConfigError::new(
                "debounce_delay",
                value,
                "expected milliseconds as a non-negative integer",
            )),
        }
    }

    if let Some(value) = get(ENV_TOAST_MS) {
        match parse_millis(&value) {
            Some(parsed) => config.toast_duration = parsed,
            None => errors.push(ConfigError::new(
                "toast_duration",
                value,
                "expected milliseconds as a non-negative integer",
            )),
        }
    }

    ConfigParse { config, errors }
}

fn parse_millis(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_millis)
}
