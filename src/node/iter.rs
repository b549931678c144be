//! Iteration over the causes of an error.

use std::{error::Error as StdError, iter::FusedIterator};

/// Iterator over an error and its [`source`](StdError::source) chain.
///
/// Created by [`Error::chain`](crate::Error::chain) and
/// [`whence::chain`](crate::chain). Unlike rendering and
/// [`root_cause`](crate::Error::root_cause), this iterator does follow the
/// sources of foreign errors, so capability lookups find decorators placed
/// behind another library's error type.
#[derive(Clone)]
#[must_use]
pub struct Chain<'a> {
    next: Option<&'a (dyn StdError + 'static)>,
}

impl<'a> Chain<'a> {
    /// Starts iterating at `error`.
    pub fn new(error: &'a (dyn StdError + 'static)) -> Self {
        Self { next: Some(error) }
    }
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn StdError + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.source();
        Some(current)
    }
}

impl FusedIterator for Chain<'_> {}

impl core::fmt::Debug for Chain<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("request failed")]
    struct Request {
        #[source]
        io: std::io::Error,
    }

    #[test]
    fn test_follows_foreign_sources() {
        let error = Request {
            io: std::io::Error::other("reset"),
        };
        let messages: Vec<String> = Chain::new(&error).map(|e| e.to_string()).collect();
        assert_eq!(messages, ["request failed", "reset"]);
    }

    #[test]
    fn test_fused() {
        let error = std::io::Error::other("reset");
        let mut chain = Chain::new(&error);
        assert!(chain.next().is_some());
        assert!(chain.next().is_none());
        assert!(chain.next().is_none());
    }
}
