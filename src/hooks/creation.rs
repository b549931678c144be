//! Hooks that observe every error as it is created.
//!
//! A creation hook sees each node right after construction: new roots,
//! wraps, and capability decorators alike. Typical uses are logging and
//! counting errors.
//!
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! use whence::{Error, hooks::Hooks};
//!
//! static CREATED: AtomicUsize = AtomicUsize::new(0);
//!
//! Hooks::new()
//!     .creation_hook(|_: &Error| {
//!         CREATED.fetch_add(1, Ordering::Relaxed);
//!     })
//!     .install()
//!     .expect("failed to install hooks");
//!
//! let _ = Error::wrap(Error::new("inner"), "outer");
//! assert_eq!(CREATED.load(Ordering::Relaxed), 2);
//! ```
//!
//! Errors created from inside a hook do not run the hooks again.

use core::cell::Cell;

use crate::Error;

/// Observes errors as they are created.
///
/// Implemented for every `Fn(&Error) + Send + Sync + 'static`, so a closure is
/// usually enough.
pub trait CreationHook: 'static + Send + Sync {
    /// Called once for every newly constructed node.
    fn on_creation(&self, error: &Error);
}

impl<F> CreationHook for F
where
    F: Fn(&Error) + Send + Sync + 'static,
{
    fn on_creation(&self, error: &Error) {
        self(error)
    }
}

std::thread_local! {
    static RUNNING: Cell<bool> = const { Cell::new(false) };
}

/// Runs `hooks` on `error`, unless this thread is already inside a hook.
pub(super) fn run(hooks: &[Box<dyn CreationHook>], error: &Error) {
    if hooks.is_empty() || RUNNING.with(Cell::get) {
        return;
    }
    RUNNING.with(|running| running.set(true));
    let _reset = Reset;
    for hook in hooks {
        hook.on_creation(error);
    }
}

struct Reset;

impl Drop for Reset {
    fn drop(&mut self) {
        RUNNING.with(|running| running.set(false));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn recorder(log: &Arc<Mutex<Vec<String>>>, tag: &'static str) -> Box<dyn CreationHook> {
        let log = Arc::clone(log);
        Box::new(move |error: &Error| {
            log.lock().unwrap().push(format!("{tag}:{error}"));
        })
    }

    #[test]
    fn test_hooks_run_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let hooks = [recorder(&log, "first"), recorder(&log, "second")];

        run(&hooks, &Error::new("boom"));
        assert_eq!(*log.lock().unwrap(), ["first:boom", "second:boom"]);
        assert!(!RUNNING.with(Cell::get));
    }

    #[test]
    fn test_nested_run_is_skipped() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let inner: Arc<[Box<dyn CreationHook>]> = Arc::from([recorder(&log, "inner")]);
        let outer: [Box<dyn CreationHook>; 1] = [Box::new(move |error: &Error| {
            run(&inner, error);
        })];

        run(&outer, &Error::new("boom"));
        assert!(log.lock().unwrap().is_empty());
    }
}
