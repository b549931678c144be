//! The global slot holding the installed hooks.

use spin::RwLock;

/// A slot written a handful of times per process and read on every error
/// construction.
///
/// Reads nest: a hook that creates an error reads the slot again while the
/// outer read is still held. Spin read locks allow this without blocking,
/// and never poison.
pub(crate) struct HookSlot<T: 'static + Send + Sync> {
    value: RwLock<Option<T>>,
}

impl<T: 'static + Send + Sync> HookSlot<T> {
    #[must_use]
    pub(crate) const fn new() -> Self {
        Self {
            value: RwLock::new(None),
        }
    }

    /// Runs `f` on the current value while holding a read lock.
    #[inline]
    pub(crate) fn with<R>(&self, f: impl FnOnce(Option<&T>) -> R) -> R {
        f(self.value.read().as_ref())
    }

    /// Stores `value` if the slot is empty. Otherwise hands `value` and the
    /// occupant to `conflict` and returns what it builds.
    pub(crate) fn fill<E>(&self, value: T, conflict: impl FnOnce(T, &T) -> E) -> Result<(), E> {
        let mut slot = self.value.write();
        match &*slot {
            Some(occupant) => Err(conflict(value, occupant)),
            None => {
                *slot = Some(value);
                Ok(())
            }
        }
    }

    /// Stores `value` and returns the previous occupant.
    pub(crate) fn swap(&self, value: T) -> Option<T> {
        self.value.write().replace(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_only_once() {
        let slot = HookSlot::<u8>::new();
        assert_eq!(slot.fill(1, |new, old| (new, *old)), Ok(()));
        assert_eq!(slot.fill(2, |new, old| (new, *old)), Err((2, 1)));
        assert_eq!(slot.with(|value| value.copied()), Some(1));
    }

    #[test]
    fn test_swap_returns_previous() {
        let slot = HookSlot::new();
        assert_eq!(slot.swap("a"), None);
        assert_eq!(slot.swap("b"), Some("a"));
        assert_eq!(slot.with(|value| value.copied()), Some("b"));
    }

    #[test]
    fn test_reads_nest() {
        let slot = HookSlot::new();
        slot.swap(7_u32);
        let sum = slot.with(|outer| {
            let inner = slot.with(|inner| inner.copied().unwrap_or(0));
            outer.copied().unwrap_or(0) + inner
        });
        assert_eq!(sum, 14);
    }
}
