//! Tracing initialization.

pub mod setup;

pub use setup::{init_tracing, log_filter, DEFAULT_DIRECTIVES, LOG_ENV};
