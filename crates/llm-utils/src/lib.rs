//! Shared utilities for llm-contracts
//!
//! This crate provides the ambient pieces used across the workspace:
//! tracing setup, the six-level [`Logger`] capability that library code
//! writes diagnostics through, and JSON configuration loading.

pub mod config;
pub mod error;
pub mod logger;
pub mod logging;

pub use error::{Error, Result};
pub use logger::{
    LIBRARY_TAG, LogHandler, Logger, LoggerCallbacks, NoopLogger, PrefixedLogger, TracingLogger,
    wrap_callbacks, wrap_logger,
};
pub use logging::{init_tracing, init_tracing_with_filter};
