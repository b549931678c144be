use std::error::Error as StdError;

use crate::Cause;

/// Converts error values into a [`Cause`] that a new node can wrap.
///
/// This trait is used for the bounds of every wrapping entry point, such as
/// [`Error::wrap`](crate::Error::wrap), [`ResultExt::wrap`](crate::ResultExt::wrap) and the
/// [`wrap!`](crate::wrap!) macro, so that they accept any error type.
///
/// # Automatic Implementations
///
/// - All types implementing `std::error::Error + Send + Sync + 'static`. An
///   [`Error`](crate::Error) of this crate is recognized and linked into the
///   chain; anything else becomes a [`Cause::Foreign`].
/// - [`Cause`] itself.
///
/// # Examples
///
/// ```rust
/// use whence::{Cause, IntoCause};
///
/// let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml");
/// assert!(io_error.into_cause().is_foreign());
///
/// let error = whence::Error::new("not found");
/// assert!(!error.into_cause().is_foreign());
/// ```
pub trait IntoCause {
    /// Converts `self` into a [`Cause`].
    fn into_cause(self) -> Cause;
}

impl<E> IntoCause for E
where
    E: StdError + Send + Sync + 'static,
{
    fn into_cause(self) -> Cause {
        let boxed: Box<dyn StdError + Send + Sync + 'static> = Box::new(self);
        Cause::from(boxed)
    }
}

impl IntoCause for Cause {
    #[inline(always)]
    fn into_cause(self) -> Cause {
        self
    }
}
