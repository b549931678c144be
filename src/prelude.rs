//! Commonly used items for convenient importing.
//!
//! ```rust
//! use whence::prelude::*;
//!
//! fn divide(a: i32, b: i32) -> whence::Result<i32> {
//!     if b == 0 {
//!         bail!("cannot divide {a} by zero");
//!     }
//!     Ok(a / b)
//! }
//!
//! assert_eq!(divide(10, 2).ok(), Some(5));
//! assert_eq!(divide(1, 0).unwrap_err().to_string(), "cannot divide 1 by zero");
//! ```
//!
//! This prelude includes:
//!
//! - **[`Error`]**: the chain node type
//! - **[`ResultExt`]** and **[`OptionExt`]**: wrapping methods on `Result`
//!   and `Option`
//! - **[`error!`]**, **[`wrap!`]**, **[`coded!`]**, **[`retry!`]** and
//!   **[`bail!`]**: macros for creating and returning errors

pub use crate::{Error, OptionExt, ResultExt, bail, coded, error, retry, wrap};
