//! Retrying on errors that carry a retry hint.
//!
//! **Run this example:** `cargo run --example retry`
//!
//! A flaky backend reports "try again later" with `retry!`. Callers wrap it
//! with their own context, and the retry loop still finds the hint anywhere
//! in the chain with `whence::retry_wait`. Errors with a code but no retry
//! hint stop the loop immediately.

use std::{cell::Cell, thread, time::Duration};

use whence::prelude::*;

const MAX_ATTEMPTS: u32 = 5;

struct Backend {
    busy_for: Cell<u32>,
    calls: Cell<u32>,
}

impl Backend {
    fn fetch(&self, key: &str) -> whence::Result<String> {
        self.calls.set(self.calls.get() + 1);
        if key.is_empty() {
            return Err(coded!(400, "empty key"));
        }
        if self.busy_for.get() > 0 {
            self.busy_for.set(self.busy_for.get() - 1);
            return Err(retry!(Duration::from_millis(20), "backend is busy"));
        }
        Ok(format!("value of {key}"))
    }
}

fn lookup(backend: &Backend, key: &str) -> whence::Result<String> {
    backend.fetch(key).wrap_with(|| format!("lookup of {key:?} failed"))
}

fn with_retries<T>(mut attempt: impl FnMut() -> whence::Result<T>) -> whence::Result<T> {
    let mut tries = 1;
    loop {
        let error = match attempt() {
            Ok(value) => return Ok(value),
            Err(error) => error,
        };
        if tries >= MAX_ATTEMPTS || !error.is_retryable() {
            return Err(whence::Error::wrap(
                error,
                format!("giving up after {tries} attempt(s)"),
            ));
        }
        // A deadline already in the past gives a zero wait.
        let wait = error.retry_wait().unwrap_or_default();
        println!("  attempt {tries}: {error:+}; waiting {wait:?}");
        thread::sleep(wait);
        tries += 1;
    }
}

fn main() {
    println!("=== Busy backend, recovers ===\n");
    let backend = Backend {
        busy_for: Cell::new(2),
        calls: Cell::new(0),
    };
    match with_retries(|| lookup(&backend, "user:42")) {
        Ok(value) => println!("  got {value:?} after {} calls", backend.calls.get()),
        Err(error) => println!("  {error:+?}"),
    }

    println!("\n=== Busy backend, never recovers ===\n");
    let backend = Backend {
        busy_for: Cell::new(u32::MAX),
        calls: Cell::new(0),
    };
    if let Err(error) = with_retries(|| lookup(&backend, "user:42")) {
        println!("  {error:-?}");
    }

    println!("\n=== Bad request, not retried ===\n");
    let backend = Backend {
        busy_for: Cell::new(0),
        calls: Cell::new(0),
    };
    if let Err(error) = with_retries(|| lookup(&backend, "")) {
        println!("  {error:+}");
        println!("  code {:?}, calls {}", error.code(), backend.calls.get());
    }
}
