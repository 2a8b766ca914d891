#![forbid(unsafe_code)]

//! Core: cooperative timer scheduling and environment configuration.

pub mod config;
pub mod timer;

pub use config::{ConfigError, ConfigParse, ShelfConfig};
pub use timer::{Scheduler, TimerId};
