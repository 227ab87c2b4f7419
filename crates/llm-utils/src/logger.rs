//! Leveled logger capability
//!
//! Library code in this workspace never logs through a global directly. It is
//! handed an [`Arc<dyn Logger>`] and writes through that, so embedding
//! applications can route diagnostics wherever they like. The default
//! implementation forwards to `tracing`.
//!
//! Every logger handed to library code is wrapped in a [`PrefixedLogger`],
//! which tags each line as `[llm-contracts][<module>] <message>`.

use crate::{Error, Result};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Fixed tag prepended to every line emitted through a [`PrefixedLogger`]
pub const LIBRARY_TAG: &str = "llm-contracts";

/// A sink with six severity-leveled write operations
///
/// Each operation takes a message plus an open-ended list of structured
/// values that travel alongside it.
pub trait Logger: Send + Sync {
    /// Name of the underlying sink
    fn name(&self) -> &str;

    fn debug(&self, message: &str, meta: &[Value]);
    fn info(&self, message: &str, meta: &[Value]);
    fn warn(&self, message: &str, meta: &[Value]);
    fn error(&self, message: &str, meta: &[Value]);
    fn verbose(&self, message: &str, meta: &[Value]);
    fn silly(&self, message: &str, meta: &[Value]);
}

/// Logger that forwards to `tracing`
///
/// `verbose` maps onto `DEBUG` and `silly` onto `TRACE`; the original level
/// name is kept in the `log_level` field.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    name: String,
}

impl TracingLogger {
    /// Create a tracing-backed logger
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new("tracing")
    }
}

fn render_meta(meta: &[Value]) -> String {
    if meta.is_empty() {
        String::new()
    } else {
        Value::Array(meta.to_vec()).to_string()
    }
}

impl Logger for TracingLogger {
    fn name(&self) -> &str {
        &self.name
    }

    fn debug(&self, message: &str, meta: &[Value]) {
        tracing::debug!(logger = %self.name, log_level = "debug", meta = %render_meta(meta), "{message}");
    }

    fn info(&self, message: &str, meta: &[Value]) {
        tracing::info!(logger = %self.name, log_level = "info", meta = %render_meta(meta), "{message}");
    }

    fn warn(&self, message: &str, meta: &[Value]) {
        tracing::warn!(logger = %self.name, log_level = "warn", meta = %render_meta(meta), "{message}");
    }

    fn error(&self, message: &str, meta: &[Value]) {
        tracing::error!(logger = %self.name, log_level = "error", meta = %render_meta(meta), "{message}");
    }

    fn verbose(&self, message: &str, meta: &[Value]) {
        tracing::debug!(logger = %self.name, log_level = "verbose", meta = %render_meta(meta), "{message}");
    }

    fn silly(&self, message: &str, meta: &[Value]) {
        tracing::trace!(logger = %self.name, log_level = "silly", meta = %render_meta(meta), "{message}");
    }
}

/// Logger that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn name(&self) -> &str {
        "noop"
    }

    fn debug(&self, _message: &str, _meta: &[Value]) {}
    fn info(&self, _message: &str, _meta: &[Value]) {}
    fn warn(&self, _message: &str, _meta: &[Value]) {}
    fn error(&self, _message: &str, _meta: &[Value]) {}
    fn verbose(&self, _message: &str, _meta: &[Value]) {}
    fn silly(&self, _message: &str, _meta: &[Value]) {}
}

/// Logger wrapper that prefixes every message with the library tag and an
/// optional module tag
#[derive(Clone)]
pub struct PrefixedLogger {
    inner: Arc<dyn Logger>,
    prefix: String,
}

impl PrefixedLogger {
    /// The prefix applied to each message, e.g. `[llm-contracts][model-config]`
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn tag(&self, message: &str) -> String {
        format!("{} {message}", self.prefix)
    }
}

impl fmt::Debug for PrefixedLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrefixedLogger")
            .field("inner", &self.inner.name())
            .field("prefix", &self.prefix)
            .finish()
    }
}

impl Logger for PrefixedLogger {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn debug(&self, message: &str, meta: &[Value]) {
        self.inner.debug(&self.tag(message), meta);
    }

    fn info(&self, message: &str, meta: &[Value]) {
        self.inner.info(&self.tag(message), meta);
    }

    fn warn(&self, message: &str, meta: &[Value]) {
        self.inner.warn(&self.tag(message), meta);
    }

    fn error(&self, message: &str, meta: &[Value]) {
        self.inner.error(&self.tag(message), meta);
    }

    fn verbose(&self, message: &str, meta: &[Value]) {
        self.inner.verbose(&self.tag(message), meta);
    }

    fn silly(&self, message: &str, meta: &[Value]) {
        self.inner.silly(&self.tag(message), meta);
    }
}

fn format_prefix(module: Option<&str>) -> String {
    match module {
        Some(module) => format!("[{LIBRARY_TAG}][{module}]"),
        None => format!("[{LIBRARY_TAG}]"),
    }
}

/// Wrap a logger so its lines read `[llm-contracts][<module>] <message>`
///
/// The module segment is omitted when `module` is `None`.
pub fn wrap_logger(inner: Arc<dyn Logger>, module: Option<&str>) -> PrefixedLogger {
    PrefixedLogger {
        inner,
        prefix: format_prefix(module),
    }
}

/// Handler for one log level of a [`LoggerCallbacks`] sink
pub type LogHandler = Arc<dyn Fn(&str, &[Value]) + Send + Sync>;

/// A logger assembled at runtime from per-level handlers
///
/// Useful when bridging a host application's logging facility whose shape is
/// only known at runtime. Every level must be supplied; [`wrap_callbacks`]
/// rejects an incomplete set.
///
/// # Example
///
/// ```
/// use llm_utils::{LoggerCallbacks, wrap_callbacks, Logger};
///
/// let noop = |_: &str, _: &[serde_json::Value]| {};
/// let callbacks = LoggerCallbacks::new("host")
///     .on_debug(noop)
///     .on_info(noop)
///     .on_warn(noop)
///     .on_error(noop)
///     .on_verbose(noop)
///     .on_silly(noop);
///
/// let logger = wrap_callbacks(callbacks, Some("models")).unwrap();
/// assert_eq!(logger.name(), "host");
/// ```
#[derive(Clone, Default)]
pub struct LoggerCallbacks {
    name: String,
    debug: Option<LogHandler>,
    info: Option<LogHandler>,
    warn: Option<LogHandler>,
    error: Option<LogHandler>,
    verbose: Option<LogHandler>,
    silly: Option<LogHandler>,
}

impl LoggerCallbacks {
    /// Start an empty handler set for the named sink
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn on_debug(mut self, f: impl Fn(&str, &[Value]) + Send + Sync + 'static) -> Self {
        self.debug = Some(Arc::new(f));
        self
    }

    pub fn on_info(mut self, f: impl Fn(&str, &[Value]) + Send + Sync + 'static) -> Self {
        self.info = Some(Arc::new(f));
        self
    }

    pub fn on_warn(mut self, f: impl Fn(&str, &[Value]) + Send + Sync + 'static) -> Self {
        self.warn = Some(Arc::new(f));
        self
    }

    pub fn on_error(mut self, f: impl Fn(&str, &[Value]) + Send + Sync + 'static) -> Self {
        self.error = Some(Arc::new(f));
        self
    }

    pub fn on_verbose(mut self, f: impl Fn(&str, &[Value]) + Send + Sync + 'static) -> Self {
        self.verbose = Some(Arc::new(f));
        self
    }

    pub fn on_silly(mut self, f: impl Fn(&str, &[Value]) + Send + Sync + 'static) -> Self {
        self.silly = Some(Arc::new(f));
        self
    }

    fn into_logger(self) -> Result<CallbackLogger> {
        match (
            self.debug,
            self.info,
            self.warn,
            self.error,
            self.verbose,
            self.silly,
        ) {
            (Some(debug), Some(info), Some(warn), Some(error), Some(verbose), Some(silly)) => {
                Ok(CallbackLogger {
                    name: self.name,
                    debug,
                    info,
                    warn,
                    error,
                    verbose,
                    silly,
                })
            }
            (debug, info, warn, error, verbose, silly) => {
                let missing = [
                    ("debug", debug.is_none()),
                    ("info", info.is_none()),
                    ("warn", warn.is_none()),
                    ("error", error.is_none()),
                    ("verbose", verbose.is_none()),
                    ("silly", silly.is_none()),
                ]
                .into_iter()
                .filter_map(|(level, absent)| absent.then_some(level))
                .collect();

                Err(Error::IncompleteLogger {
                    name: self.name,
                    missing,
                })
            }
        }
    }
}

impl fmt::Debug for LoggerCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerCallbacks")
            .field("name", &self.name)
            .field("debug", &self.debug.is_some())
            .field("info", &self.info.is_some())
            .field("warn", &self.warn.is_some())
            .field("error", &self.error.is_some())
            .field("verbose", &self.verbose.is_some())
            .field("silly", &self.silly.is_some())
            .finish()
    }
}

struct CallbackLogger {
    name: String,
    debug: LogHandler,
    info: LogHandler,
    warn: LogHandler,
    error: LogHandler,
    verbose: LogHandler,
    silly: LogHandler,
}

impl Logger for CallbackLogger {
    fn name(&self) -> &str {
        &self.name
    }

    fn debug(&self, message: &str, meta: &[Value]) {
        (self.debug)(message, meta);
    }

    fn info(&self, message: &str, meta: &[Value]) {
        (self.info)(message, meta);
    }

    fn warn(&self, message: &str, meta: &[Value]) {
        (self.warn)(message, meta);
    }

    fn error(&self, message: &str, meta: &[Value]) {
        (self.error)(message, meta);
    }

    fn verbose(&self, message: &str, meta: &[Value]) {
        (self.verbose)(message, meta);
    }

    fn silly(&self, message: &str, meta: &[Value]) {
        (self.silly)(message, meta);
    }
}

/// Wrap a runtime-assembled logger, failing fast if any level is missing
///
/// The completeness check happens here, once; the returned logger never
/// re-validates.
pub fn wrap_callbacks(callbacks: LoggerCallbacks, module: Option<&str>) -> Result<PrefixedLogger> {
    let logger = callbacks.into_logger()?;
    Ok(wrap_logger(Arc::new(logger), module))
}
