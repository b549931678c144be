use std::{error::Error as StdError, fmt};

use crate::Error;

/// The error a node wraps: either another [`Error`] of this crate, or any
/// other error value.
///
/// Foreign errors are kept as they are and rendered through their own
/// [`Display`](fmt::Display) implementation. Values are converted through
/// [`IntoCause`](crate::IntoCause), which recognizes an [`Error`] passed in as
/// a generic error and keeps it as a chain link.
pub enum Cause {
    /// A link to another node of the chain.
    Chain(Error),
    /// An error from outside this crate.
    Foreign(Box<dyn StdError + Send + Sync + 'static>),
}

impl Cause {
    /// Returns the cause as a plain error trait object.
    pub fn as_dyn(&self) -> &(dyn StdError + Send + Sync + 'static) {
        match self {
            Cause::Chain(error) => error,
            Cause::Foreign(error) => &**error,
        }
    }

    /// Returns the wrapped node if this cause is part of the chain.
    pub fn as_chain(&self) -> Option<&Error> {
        match self {
            Cause::Chain(error) => Some(error),
            Cause::Foreign(_) => None,
        }
    }

    /// Returns `true` for errors from outside this crate.
    pub fn is_foreign(&self) -> bool {
        matches!(self, Cause::Foreign(_))
    }
}

impl From<Error> for Cause {
    fn from(error: Error) -> Self {
        Cause::Chain(error)
    }
}

impl From<Box<dyn StdError + Send + Sync + 'static>> for Cause {
    fn from(error: Box<dyn StdError + Send + Sync + 'static>) -> Self {
        match error.downcast::<Error>() {
            Ok(error) => Cause::Chain(*error),
            Err(foreign) => Cause::Foreign(foreign),
        }
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::Chain(error) => fmt::Display::fmt(error, f),
            Cause::Foreign(error) => fmt::Display::fmt(error, f),
        }
    }
}

impl fmt::Debug for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::Chain(error) => fmt::Debug::fmt(error, f),
            Cause::Foreign(error) => fmt::Debug::fmt(error, f),
        }
    }
}
