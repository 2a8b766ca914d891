#![forbid(unsafe_code)]

//! Global tracing subscriber installation.
//!
//! Library code only emits events; the application decides where they go.
//! With the `logging` feature enabled, [`init_tracing`] installs a formatted
//! subscriber filtered by the `SHELF_LOG` environment variable:
//!
//! ```text
//! SHELF_LOG=shelf_runtime=debug,shelf_core=trace
//! ```

use tracing_subscriber::EnvFilter;

use crate::{Error, Result};

/// Environment variable holding the filter directives.
pub const ENV_LOG: &str = "SHELF_LOG";

/// Install the global subscriber.
///
/// Directives come from `SHELF_LOG` when it is set and valid, otherwise from
/// `default_directive`. Fails if a global subscriber already exists.
pub fn init_tracing(default_directive: &str) -> Result<()> {
    let filter = EnvFilter::try_from_env(ENV_LOG)
        .or_else(|_| EnvFilter::try_new(default_directive))
        .map_err(|err| Error::Tracing(format!("invalid log filter: {err}")))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|err| Error::Tracing(err.to_string()))?;

    tracing::debug!(env = ENV_LOG, "tracing installed");
    Ok(())
}
