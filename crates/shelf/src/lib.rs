#![forbid(unsafe_code)]

//! shelf public facade crate.
//!
//! Re-exports the validation engine, the cooperative scheduler and the
//! reactive runtime, and adds the catalogue-specific pieces built on them:
//! the book form schema, the debounced listing search and config loading.

use std::fmt;

pub mod book;
#[cfg(feature = "logging")]
pub mod logging;
pub mod search;

// --- Core re-exports -------------------------------------------------------

pub use shelf_core::{ConfigError, ConfigParse, Scheduler, ShelfConfig, TimerId};

// --- Validation re-exports -------------------------------------------------

pub use shelf_validation::{
    FieldReport, FieldValidator, FormReport, FormSchema, MaxDate, MinLength, NotBlank,
    ValidationError, ValidationResult, Validator,
};

// --- Runtime re-exports ----------------------------------------------------

pub use shelf_runtime::{
    DebouncedValueCell, Notification, NotificationId, NotificationKind, NotificationQueue,
    Observable, Subscription,
};

pub use book::{Book, CreateBook, UpdateBook, book_form_schema};
pub use search::{BookSearch, SearchQuery, parse_total_count};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for shelf apps.
#[derive(Debug)]
pub enum Error {
    /// Configuration could not be parsed or failed validation.
    Config(Vec<ConfigError>),
    /// A tracing subscriber could not be installed.
    Tracing(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(errors) => {
                f.write_str("invalid configuration: ")?;
                for (index, err) in errors.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{err}")?;
                }
                Ok(())
            }
            Self::Tracing(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<Vec<ConfigError>> for Error {
    fn from(errors: Vec<ConfigError>) -> Self {
        Self::Config(errors)
    }
}

/// Standard result type for shelf APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Config ---------------------------------------------------------------

/// Load the configuration from the environment, rejecting bad values.
///
/// Unlike [`ShelfConfig::from_env`], which silently keeps defaults for
/// unparsable variables, this reports every problem at once.
pub fn load_config() -> Result<ShelfConfig> {
    check_config(ShelfConfig::from_env_with_diagnostics())
}

fn check_config(parse: ConfigParse) -> Result<ShelfConfig> {
    if !parse.errors.is_empty() {
        return Err(Error::Config(parse.errors));
    }
    parse.config.validate()?;
    Ok(parse.config)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Book, BookSearch, CreateBook, DebouncedValueCell, Error, FieldValidator, FormReport,
        FormSchema, NotificationKind, NotificationQueue, Result, Scheduler, SearchQuery,
        ShelfConfig, UpdateBook, Validator, book_form_schema,
    };

    pub use crate::{core, runtime, validation};
}

pub use shelf_core as core;
pub use shelf_runtime as runtime;
pub use shelf_validation as validation;
