//! Queryable attributes attached to a chain by decorator nodes.
//!
//! A decorator is created with [`Error::with_code`] or [`Error::with_retry`]
//! (or their macro and extension-trait counterparts). It adds exactly one
//! [`Capability`] and otherwise behaves like the error it wraps.
//!
//! The lookup functions in this module walk an arbitrary chain through
//! [`source`](StdError::source), so a capability is found no matter how many
//! plain wraps, other decorators or foreign errors sit in front of it. The
//! first layer offering the requested capability wins.
//!
//! ```rust
//! use std::time::Duration;
//! use whence::Error;
//!
//! let busy = Error::with_retry(Error::coded(503, "backend busy"), Duration::from_secs(5));
//! let error = Error::wrap(busy, "cannot load profile");
//!
//! assert_eq!(whence::code(&error), Some(503));
//! assert!(whence::is_retryable(&error));
//! assert!(whence::retry_wait(&error).is_some_and(|wait| wait <= Duration::from_secs(5)));
//! ```

use std::{
    error::Error as StdError,
    time::{Duration, SystemTime},
};

use crate::{Error, node::Chain};

/// The attribute a decorator node adds to a chain.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    /// An application-defined error code.
    Code(i64),
    /// The error may be retried, but not before this instant.
    RetryAfter(SystemTime),
}

impl Capability {
    /// The code, if this is a [`Capability::Code`].
    pub fn code(&self) -> Option<i64> {
        match *self {
            Capability::Code(code) => Some(code),
            Capability::RetryAfter(_) => None,
        }
    }

    /// The retry instant, if this is a [`Capability::RetryAfter`].
    pub fn retry_after(&self) -> Option<SystemTime> {
        match *self {
            Capability::Code(_) => None,
            Capability::RetryAfter(at) => Some(at),
        }
    }
}

/// Iterates over the capabilities found in a chain, outermost first.
pub fn capabilities<'a>(
    error: &'a (dyn StdError + 'static),
) -> impl Iterator<Item = &'a Capability> + 'a {
    Chain::new(error)
        .filter_map(|layer| layer.downcast_ref::<Error>())
        .filter_map(Error::capability)
}

/// Returns the first error code in the chain.
pub fn code(error: &(dyn StdError + 'static)) -> Option<i64> {
    capabilities(error).find_map(Capability::code)
}

/// Returns `true` if some layer of the chain carries an error code.
pub fn has_code(error: &(dyn StdError + 'static)) -> bool {
    code(error).is_some()
}

/// Returns the first retry instant in the chain.
pub fn retryable_at(error: &(dyn StdError + 'static)) -> Option<SystemTime> {
    capabilities(error).find_map(Capability::retry_after)
}

/// Returns `true` if some layer of the chain is retryable.
///
/// This does not check whether the retry instant has already passed.
pub fn is_retryable(error: &(dyn StdError + 'static)) -> bool {
    retryable_at(error).is_some()
}

/// Returns how long to wait before retrying, or `None` if the chain is not
/// retryable.
///
/// Once the retry instant has passed this returns [`Duration::ZERO`].
pub fn retry_wait(error: &(dyn StdError + 'static)) -> Option<Duration> {
    let at = retryable_at(error)?;
    Some(
        at.duration_since(SystemTime::now())
            .unwrap_or(Duration::ZERO),
    )
}

const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// `now + wait`, clamped when the sum is not representable.
pub(crate) fn deadline(wait: Duration) -> SystemTime {
    let now = SystemTime::now();
    now.checked_add(wait)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("upstream failed")]
    struct Upstream {
        #[source]
        inner: Error,
    }

    #[test]
    fn test_lookup_on_plain_chain() {
        let error = Error::wrap(Error::new("a"), "b");
        assert!(!has_code(&error));
        assert_eq!(code(&error), None);
        assert!(!is_retryable(&error));
        assert_eq!(retryable_at(&error), None);
        assert_eq!(retry_wait(&error), None);
        assert_eq!(capabilities(&error).count(), 0);
    }

    #[test]
    fn test_lookup_tunnels_through_wraps() {
        let coded = Error::with_code(Error::new("x"), 7);
        let error = Error::wrap(Error::wrap(coded, "y"), "z");
        assert!(has_code(&error));
        assert_eq!(code(&error), Some(7));
    }

    #[test]
    fn test_first_match_wins() {
        let inner = Error::with_code(Error::new("x"), 1);
        let outer = Error::with_code(Error::wrap(inner, "y"), 2);
        assert_eq!(code(&outer), Some(2));
        let codes: Vec<_> = capabilities(&outer).filter_map(Capability::code).collect();
        assert_eq!(codes, [2, 1]);
    }

    #[test]
    fn test_capabilities_compose() {
        let coded = Error::with_code(Error::new("x"), 7);
        let both = Error::with_retry(coded, Duration::from_secs(5));
        assert_eq!(code(&both), Some(7));
        assert!(is_retryable(&both));
        assert_eq!(both.to_string(), "x");
    }

    #[test]
    fn test_lookup_through_foreign_wrapper() {
        let inner = Error::with_code(Error::new("x"), 42);
        let upstream = Upstream { inner };
        let error = Error::wrap(upstream, "request failed");
        assert_eq!(code(&error), Some(42));
    }

    #[test]
    fn test_retry_instant_is_fixed() {
        let before = SystemTime::now();
        let error = Error::with_retry(Error::new("busy"), Duration::from_secs(30));
        let after = SystemTime::now();
        let at = retryable_at(&error);
        assert!(at.is_some_and(|at| at >= before + Duration::from_secs(30)));
        assert!(at.is_some_and(|at| at <= after + Duration::from_secs(30)));
        assert_eq!(retryable_at(&error), at);
    }

    #[test]
    fn test_retry_wait_saturates() {
        let error = Error::with_retry(Error::new("busy"), Duration::ZERO);
        assert_eq!(retry_wait(&error), Some(Duration::ZERO));
    }

    #[test]
    fn test_huge_wait_does_not_panic() {
        let error = Error::with_retry(Error::new("busy"), Duration::MAX);
        assert!(retryable_at(&error).is_some_and(|at| at > SystemTime::now()));
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Capability::Code(3).code(), Some(3));
        assert_eq!(Capability::Code(3).retry_after(), None);
        let now = SystemTime::now();
        assert_eq!(Capability::RetryAfter(now).retry_after(), Some(now));
        assert_eq!(Capability::RetryAfter(now).code(), None);
    }
}
