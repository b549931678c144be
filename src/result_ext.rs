use std::{borrow::Cow, time::Duration};

use crate::{Error, IntoCause};

/// Extension methods on [`Result`] for wrapping its error.
///
/// Every method records the caller's location, so calling them directly in
/// the function that propagates the error gives an accurate call site.
///
/// ```rust
/// use whence::prelude::*;
///
/// fn read_config(path: &str) -> whence::Result<String> {
///     let text = std::fs::read_to_string(path).wrap("cannot read configuration")?;
///     Ok(text)
/// }
///
/// let error = read_config("/nonexistent/config.toml").unwrap_err();
/// assert_eq!(error.to_string(), "cannot read configuration");
/// assert!(whence::find::<std::io::Error>(&error).is_some());
/// ```
pub trait ResultExt<T, E> {
    /// Wraps the error with `message`.
    fn wrap(self, message: impl Into<Cow<'static, str>>) -> Result<T, Error>;

    /// Wraps the error with a message computed only when there is an error.
    ///
    /// ```rust
    /// use whence::prelude::*;
    ///
    /// let id = 7;
    /// let result: Result<(), std::io::Error> = Err(std::io::Error::other("timeout"));
    /// let error = result.wrap_with(|| format!("cannot fetch user {id}")).unwrap_err();
    /// assert_eq!(format!("{error:+}"), "cannot fetch user 7 because timeout");
    /// ```
    fn wrap_with<M, F>(self, message: F) -> Result<T, Error>
    where
        M: Into<Cow<'static, str>>,
        F: FnOnce() -> M;

    /// Decorates the error with an error code.
    fn with_code(self, code: i64) -> Result<T, Error>;

    /// Decorates the error as retryable once `wait` has passed.
    fn with_retry(self, wait: Duration) -> Result<T, Error>;
}

impl<T, E> ResultExt<T, E> for Result<T, E>
where
    E: IntoCause,
{
    #[track_caller]
    fn wrap(self, message: impl Into<Cow<'static, str>>) -> Result<T, Error> {
        match self {
            Ok(value) => Ok(value),
            Err(error) => Err(Error::wrap(error, message)),
        }
    }

    #[track_caller]
    fn wrap_with<M, F>(self, message: F) -> Result<T, Error>
    where
        M: Into<Cow<'static, str>>,
        F: FnOnce() -> M,
    {
        match self {
            Ok(value) => Ok(value),
            Err(error) => Err(Error::wrap(error, message())),
        }
    }

    #[track_caller]
    fn with_code(self, code: i64) -> Result<T, Error> {
        match self {
            Ok(value) => Ok(value),
            Err(error) => Err(Error::with_code(error, code)),
        }
    }

    #[track_caller]
    fn with_retry(self, wait: Duration) -> Result<T, Error> {
        match self {
            Ok(value) => Ok(value),
            Err(error) => Err(Error::with_retry(error, wait)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("timed out")]
    struct Timeout;

    #[test]
    fn test_ok_passes_through() {
        let result: Result<u8, Timeout> = Ok(3);
        assert_eq!(result.wrap("unused").ok(), Some(3));
        let result: Result<u8, Timeout> = Ok(3);
        assert_eq!(
            result.wrap_with(|| -> String { unreachable!() }).ok(),
            Some(3)
        );
    }

    #[test]
    fn test_wrap_records_caller() {
        let result: Result<(), Timeout> = Err(Timeout);
        let line = line!() + 1;
        let error = result.wrap("request failed").unwrap_err();
        assert_eq!(error.call_site().line(), Some(line));
        assert_eq!(error.call_site().file_name(), "result_ext.rs");
        assert_eq!(format!("{error:+}"), "request failed because timed out");
    }

    #[test]
    fn test_decorators() {
        let result: Result<(), Error> = Err(Error::new("busy"));
        let error = result
            .with_code(503)
            .with_retry(Duration::from_secs(1))
            .unwrap_err();
        assert_eq!(error.code(), Some(503));
        assert!(error.is_retryable());
        assert_eq!(error.to_string(), "busy");
    }
}
