//! Free functions for walking any error chain.
//!
//! These work on plain `&dyn Error` values, so they accept errors of this
//! crate as well as foreign errors that may contain one.

use std::error::Error as StdError;

use crate::{Error, node::Chain};

/// Returns the error `error` wraps, or `None` at a chain root.
///
/// For an [`Error`] this is its [`cause`](Error::cause). A capability
/// decorator unwraps to the error it decorates.
pub fn unwrap<'a>(error: &'a (dyn StdError + 'static)) -> Option<&'a (dyn StdError + 'static)> {
    error.source()
}

/// Follows the chain to its last error.
///
/// Only links between errors of this crate are followed. Any other error
/// is a root of its own, even if it has a [`source`](StdError::source).
///
/// ```rust
/// use whence::Error;
///
/// let root = Error::new("disk full");
/// let error = Error::wrap(Error::wrap(root.clone(), "cannot save"), "export failed");
///
/// let found = whence::root_cause(&error).downcast_ref::<Error>();
/// assert_eq!(found, Some(&root));
/// ```
pub fn root_cause<'a>(error: &'a (dyn StdError + 'static)) -> &'a (dyn StdError + 'static) {
    match error.downcast_ref::<Error>() {
        Some(error) => error.root_cause(),
        None => error,
    }
}

/// Iterates over `error` and every error reachable through
/// [`source`](StdError::source).
pub fn chain<'a>(error: &'a (dyn StdError + 'static)) -> Chain<'a> {
    Chain::new(error)
}

/// Returns `true` if any layer of the chain is of type `T` and equal to
/// `target`.
///
/// Since [`Error`] compares by identity, this finds a sentinel error only
/// when the very same node was wrapped.
///
/// ```rust
/// use whence::Error;
///
/// let not_found = Error::new("not found");
/// let error = Error::wrap(not_found.clone(), "lookup failed");
///
/// assert!(whence::is(&error, &not_found));
/// assert!(!whence::is(&error, &Error::new("not found")));
/// ```
pub fn is<T>(error: &(dyn StdError + 'static), target: &T) -> bool
where
    T: StdError + PartialEq + 'static,
{
    chain(error)
        .filter_map(|layer| layer.downcast_ref::<T>())
        .any(|layer| layer == target)
}

/// Returns the first layer of the chain that has type `T`.
///
/// ```rust
/// use whence::Error;
///
/// let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "users.json");
/// let error = Error::wrap(io_error, "cannot load users");
///
/// let found = whence::find::<std::io::Error>(&error);
/// assert_eq!(found.map(|e| e.kind()), Some(std::io::ErrorKind::NotFound));
/// ```
pub fn find<'a, T>(error: &'a (dyn StdError + 'static)) -> Option<&'a T>
where
    T: StdError + 'static,
{
    chain(error).find_map(|layer| layer.downcast_ref::<T>())
}
