#![deny(
    missing_docs,
    unsafe_code,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    unused_doc_comments
)]

//! Tracing events for [`whence`] errors.
//!
//! `whence` itself never logs. This crate turns errors into [`tracing`]
//! events, either automatically as they are created or explicitly where the
//! program decides an error is worth reporting.
//!
//! # Quick Start
//!
//! Log every error as it is created:
//!
//! ```
//! use whence::hooks::Hooks;
//! use whence_tracing::CreationLogger;
//!
//! Hooks::new()
//!     .creation_hook(CreationLogger::new())
//!     .install()
//!     .expect("failed to install hooks");
//! ```
//!
//! Or log the whole chain where it is handled:
//!
//! ```
//! use whence::prelude::*;
//! use whence_tracing::LogExt;
//!
//! fn save() -> whence::Result<()> {
//!     Err(error!("disk full")).wrap("cannot save document")
//! }
//!
//! if let Err(error) = save().log_err() {
//!     // The user only sees the messages; the event has the locations
//!     eprintln!("{error:+}");
//! }
//! ```
//!
//! # Event Fields
//!
//! | Field               | Content                                          |
//! |---------------------|--------------------------------------------------|
//! | message             | the rendered error                               |
//! | `error.location`    | short location of the outermost node             |
//! | `error.function`    | enclosing function, when known                   |
//! | `error.code`        | first error code in the chain, if any            |
//! | `error.retry_in_ms` | milliseconds until the chain may be retried      |
//!
//! # Environment Variables
//!
//! - `WHENCE_TRACING` - Comma-separated options for [`CreationLogger::new`]:
//!   - `roots` - Only log errors that start a chain, not the wraps and
//!     decorators added on top of them

use std::sync::OnceLock;

use tracing::Level;
use whence::{Error, LocationStyle, hooks::CreationHook};

/// Emits an event at a level chosen at runtime.
macro_rules! event_at {
    ($level:expr, $($fields:tt)+) => {
        let level = $level;
        if level == Level::ERROR {
            tracing::event!(target: "whence", Level::ERROR, $($fields)+);
        } else if level == Level::WARN {
            tracing::event!(target: "whence", Level::WARN, $($fields)+);
        } else if level == Level::INFO {
            tracing::event!(target: "whence", Level::INFO, $($fields)+);
        } else if level == Level::DEBUG {
            tracing::event!(target: "whence", Level::DEBUG, $($fields)+);
        } else {
            tracing::event!(target: "whence", Level::TRACE, $($fields)+);
        }
    };
}

/// Emits one event for `error` at `level`, carrying the whole chain
/// rendered with locations on one line (`{:+?}`).
///
/// # Examples
///
/// ```
/// use tracing::Level;
/// use whence::Error;
///
/// let error = Error::wrap(Error::coded(503, "backend busy"), "cannot load profile");
/// whence_tracing::log_error(&error, Level::WARN);
/// ```
pub fn log_error(error: &Error, level: Level) {
    emit(error, level, format_args!("{error:+?}"));
}

fn emit(error: &Error, level: Level, rendered: std::fmt::Arguments<'_>) {
    let location = error.call_site().location(LocationStyle::Short);
    let function = error.call_site().function();
    let function = (!function.is_empty()).then_some(function);
    let code = error.code();
    let retry_in_ms = error
        .retry_wait()
        .map(|wait| u64::try_from(wait.as_millis()).unwrap_or(u64::MAX));

    event_at!(
        level,
        error.location = %location,
        error.function = function,
        error.code = code,
        error.retry_in_ms = retry_in_ms,
        "{rendered}"
    );
}

/// A creation hook that emits one event for every error created.
///
/// The event carries the node's own location and message, not the whole
/// chain, since the causes were logged when they were created.
///
/// # Examples
///
/// Basic usage with default settings:
///
/// ```
/// use whence::hooks::Hooks;
/// use whence_tracing::CreationLogger;
///
/// Hooks::new()
///     .creation_hook(CreationLogger::new())
///     .install()
///     .expect("failed to install hooks");
/// ```
///
/// Custom configuration:
///
/// ```
/// use tracing::Level;
/// use whence::hooks::Hooks;
/// use whence_tracing::CreationLogger;
///
/// let logger = CreationLogger {
///     level: Level::WARN,
///     log_wrapped_errors: false,
/// };
///
/// Hooks::new()
///     .creation_hook(logger)
///     .install()
///     .expect("failed to install hooks");
/// ```
#[derive(Copy, Clone, Debug)]
pub struct CreationLogger {
    /// The level of the emitted events.
    pub level: Level,
    /// Whether to log every node, or only those starting a chain.
    ///
    /// When `false`, wraps and capability decorators are skipped.
    pub log_wrapped_errors: bool,
}

#[derive(Debug)]
struct WhenceTracingEnvOptions {
    roots_only: bool,
}

impl WhenceTracingEnvOptions {
    fn get() -> &'static Self {
        static WHENCE_TRACING_FLAGS: OnceLock<WhenceTracingEnvOptions> = OnceLock::new();

        WHENCE_TRACING_FLAGS.get_or_init(|| {
            let mut roots_only = false;

            if let Some(var) = std::env::var_os("WHENCE_TRACING") {
                for v in var.to_string_lossy().split(',') {
                    if v.trim().eq_ignore_ascii_case("roots") {
                        roots_only = true;
                    }
                }
            }

            WhenceTracingEnvOptions { roots_only }
        })
    }
}

impl CreationLogger {
    /// Creates a logger emitting [`Level::DEBUG`] events.
    ///
    /// Whether wrapped errors are logged is controlled by the
    /// `WHENCE_TRACING` environment variable, see the [crate docs](crate).
    pub fn new() -> Self {
        let env_options = WhenceTracingEnvOptions::get();

        Self {
            level: Level::DEBUG,
            log_wrapped_errors: !env_options.roots_only,
        }
    }
}

impl Default for CreationLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl CreationHook for CreationLogger {
    fn on_creation(&self, error: &Error) {
        if !self.log_wrapped_errors && error.cause().is_some() {
            return;
        }
        emit(error, self.level, format_args!("{error:?}"));
    }
}

/// Extension trait for logging errors where they are handled.
///
/// ```
/// use whence::Error;
/// use whence_tracing::LogExt;
///
/// let result: whence::Result<()> = Err(Error::new("not found"));
/// let result = result.log_err();
/// assert!(result.is_err());
/// ```
pub trait LogExt: Sized {
    /// Logs the error, if any, at [`Level::ERROR`] and returns `self`
    /// unchanged.
    fn log_err(self) -> Self {
        self.log_err_at(Level::ERROR)
    }

    /// Logs the error, if any, at `level` and returns `self` unchanged.
    fn log_err_at(self, level: Level) -> Self;
}

impl LogExt for Error {
    fn log_err_at(self, level: Level) -> Self {
        log_error(&self, level);
        self
    }
}

impl<T> LogExt for Result<T, Error> {
    fn log_err_at(self, level: Level) -> Self {
        if let Err(error) = &self {
            log_error(error, level);
        }
        self
    }
}
