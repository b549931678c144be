//! Wrapping errors that may be absent.
//!
//! Code that receives an `Option` of an error, such as the result of a
//! validation step that found nothing wrong, can wrap it without checking
//! first: wrapping nothing yields nothing.
//!
//! ```rust
//! use whence::{Error, OptionExt};
//!
//! fn check_name(name: &str) -> Option<Error> {
//!     name.is_empty().then(|| Error::new("name is empty"))
//! }
//!
//! assert!(check_name("ada").wrap("invalid request").is_none());
//!
//! let error = check_name("").wrap("invalid request");
//! assert_eq!(
//!     error.map(|e| format!("{e:+}")).as_deref(),
//!     Some("invalid request because name is empty"),
//! );
//! ```

use std::{borrow::Cow, time::Duration};

use crate::{Error, IntoCause};

/// Extension methods on `Option<E>` for wrapping an error that may be
/// absent.
///
/// `None` stays `None`; `Some(cause)` becomes `Some` of the wrapped error.
pub trait OptionExt {
    /// Wraps the error, if any, with `message`.
    fn wrap(self, message: impl Into<Cow<'static, str>>) -> Option<Error>;

    /// Decorates the error, if any, with an error code.
    fn with_code(self, code: i64) -> Option<Error>;

    /// Decorates the error, if any, as retryable once `wait` has passed.
    fn with_retry(self, wait: Duration) -> Option<Error>;
}

impl<E> OptionExt for Option<E>
where
    E: IntoCause,
{
    #[track_caller]
    fn wrap(self, message: impl Into<Cow<'static, str>>) -> Option<Error> {
        // Not `Option::map`: a closure would become the recorded call site.
        match self {
            Some(cause) => Some(Error::wrap(cause, message)),
            None => None,
        }
    }

    #[track_caller]
    fn with_code(self, code: i64) -> Option<Error> {
        match self {
            Some(cause) => Some(Error::with_code(cause, code)),
            None => None,
        }
    }

    #[track_caller]
    fn with_retry(self, wait: Duration) -> Option<Error> {
        match self {
            Some(cause) => Some(Error::with_retry(cause, wait)),
            None => None,
        }
    }
}

/// Wraps `cause` with `message`, or returns `None` if there is no cause.
///
/// ```rust
/// let nothing: Option<std::io::Error> = None;
/// assert!(whence::wrap(nothing, "cannot open").is_none());
/// ```
#[track_caller]
pub fn wrap<E: IntoCause>(cause: Option<E>, message: impl Into<Cow<'static, str>>) -> Option<Error> {
    match cause {
        Some(cause) => Some(Error::wrap(cause, message)),
        None => None,
    }
}

/// Decorates `cause` with an error code, or returns `None` if there is no
/// cause.
#[track_caller]
pub fn with_code<E: IntoCause>(cause: Option<E>, code: i64) -> Option<Error> {
    match cause {
        Some(cause) => Some(Error::with_code(cause, code)),
        None => None,
    }
}

/// Decorates `cause` as retryable once `wait` has passed, or returns `None`
/// if there is no cause.
#[track_caller]
pub fn with_retry<E: IntoCause>(cause: Option<E>, wait: Duration) -> Option<Error> {
    match cause {
        Some(cause) => Some(Error::with_retry(cause, wait)),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_propagates() {
        let none: Option<Error> = None;
        assert!(wrap(none.clone(), "x").is_none());
        assert!(with_code(none.clone(), 1).is_none());
        assert!(with_retry(none.clone(), Duration::from_secs(1)).is_none());
        assert!(none.clone().wrap("x").is_none());
        assert!(none.clone().with_code(1).is_none());
        assert!(none.with_retry(Duration::ZERO).is_none());
    }

    #[test]
    fn test_some_is_wrapped_at_caller() {
        let inner = Error::new("inner");
        let line = line!() + 1;
        let error = wrap(Some(inner.clone()), "outer");
        assert_eq!(error.as_ref().and_then(|e| e.call_site().line()), Some(line));
        assert_eq!(
            error.as_ref().and_then(|e| e.cause()?.as_chain().cloned()),
            Some(inner)
        );
    }

    #[test]
    fn test_some_is_decorated() {
        let error = Some(Error::new("busy"))
            .with_code(429)
            .with_retry(Duration::from_secs(2));
        assert!(error.as_ref().is_some_and(Error::has_code));
        assert!(error.as_ref().is_some_and(Error::is_retryable));
    }
}
