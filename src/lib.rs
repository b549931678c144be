#![deny(
    missing_docs,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    unused_doc_comments
)]
#![forbid(unsafe_code)]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Error chains that remember where they were raised.
//!
//! ## Overview
//!
//! Every [`Error`] records the [`CallSite`] where it was created: file, line,
//! and the enclosing function. Wrapping an error creates a new node with its
//! own message and call site, linked to the error it wraps. Rendering the
//! chain then tells the whole story, from the outermost context down to the
//! root cause, with a location for every step.
//!
//! ## Quick Example
//!
//! ```
//! use whence::prelude::*;
//!
//! fn load_user(id: u32) -> whence::Result<String> {
//!     let error = std::io::Error::new(std::io::ErrorKind::NotFound, "users.db");
//!     Err(wrap!(error, "cannot load user {id}"))
//! }
//!
//! fn handle_request() -> whence::Result<String> {
//!     load_user(42).wrap("request failed")
//! }
//!
//! let error = handle_request().unwrap_err();
//!
//! // For the user: messages only
//! assert_eq!(
//!     format!("{error:+}"),
//!     "request failed because cannot load user 42 because users.db"
//! );
//!
//! // For the log: every step with its location
//! let trace = format!("{error:+?}");
//! assert!(trace.contains("):request failed because "));
//! assert!(trace.ends_with("):cannot load user 42 because users.db"));
//! ```
//!
//! ## Building Chains
//!
//! - [`Error::new`] and [`error!`] create a root.
//! - [`Error::wrap`], [`wrap!`] and [`ResultExt::wrap`] add a node on top of
//!   any error, including errors from other libraries.
//! - [`whence::wrap`](wrap()) and [`OptionExt`] wrap an error that may be
//!   absent: wrapping nothing gives nothing.
//!
//! Every constructor records the location of its caller, so helper
//! functions layered on top of each other never shift the recorded site.
//!
//! ## Capabilities
//!
//! Two attributes can be attached to a chain by *decorator* nodes, which are
//! otherwise invisible:
//!
//! - an error code: [`Error::with_code`], [`Error::coded`], [`coded!`]
//! - a retry instant: [`Error::with_retry`], [`Error::retryable`], [`retry!`]
//!
//! Lookups such as [`code`] and [`is_retryable`] search the whole chain, so
//! wrapping an error never hides its capabilities. See [`capability`].
//!
//! ## Inspecting
//!
//! [`unwrap`], [`root_cause`], [`chain`], [`is`] and [`find`] walk any
//! `&dyn Error`. [`Error::cause`] gives the typed [`Cause`].
//!
//! ## Rendering
//!
//! | Format    | Output                                      |
//! |-----------|---------------------------------------------|
//! | `{}`      | message                                     |
//! | `{:?}`    | `file.rs(12):message`                       |
//! | `{:#?}`   | `crate::module/file.rs(12):message`         |
//! | `{:+}`    | all messages joined by `" because "`        |
//! | `{:-?}`   | one located node per line                   |
//! | `{:>24?}` | location padded to 24 characters            |
//! | `{:.10?}` | location cut to its last 10 characters      |
//!
//! [`Error::display`] selects the function-name form, and [`render()`] takes
//! a [`Directive`] built in code or parsed from a string such as `"+20V"`.
//! See [`render`](mod@render) for details.
//!
//! ## Configuration
//!
//! [`hooks`] sets how call sites are collected and registers hooks that see
//! every created error. The `backtrace` feature (on by default) allows
//! resolving function names for errors created without the macros.

#[macro_use]
mod macros;

pub mod capability;
pub mod hooks;
pub mod prelude;
pub mod render;

mod inspect;
mod into_cause;
mod node;
mod option_ext;
mod result_ext;

pub use whence_internals::{CallSite, LocationStyle, Padding};

pub use self::{
    capability::{
        Capability, capabilities, code, has_code, is_retryable, retry_wait, retryable_at,
    },
    inspect::{chain, find, is, root_cause, unwrap},
    into_cause::IntoCause,
    node::{Cause, Chain, Error},
    option_ext::{OptionExt, with_code, with_retry, wrap},
    render::{Directive, ParseDirectiveError, Recurse, Rendered, Verb, render},
    result_ext::ResultExt,
};

/// A [`Result`](core::result::Result) type alias where the error is
/// [`Error`].
///
/// ```
/// fn might_fail() -> whence::Result<String> {
///     Ok("success".to_string())
/// }
/// # assert!(might_fail().is_ok());
/// ```
pub type Result<T, E = Error> = core::result::Result<T, E>;

// Not public API. Referenced by macro-generated code.
#[doc(hidden)]
pub mod __private {
    use std::{borrow::Cow, fmt, time::Duration};

    #[doc(hidden)]
    pub use core::{format_args, result::Result::Err};

    #[doc(hidden)]
    pub use whence_internals::function_path;

    use crate::{Capability, Cause, Error, IntoCause, capability, hooks};

    fn message(args: fmt::Arguments<'_>) -> Cow<'static, str> {
        match args.as_str() {
            Some(message) => Cow::Borrowed(message),
            None => Cow::Owned(fmt::format(args)),
        }
    }

    #[doc(hidden)]
    #[cold]
    #[must_use]
    #[track_caller]
    pub fn new_error(args: fmt::Arguments<'_>, function: &'static str) -> Error {
        Error::from_message(message(args), None, hooks::collect_call_site(Some(function)))
    }

    #[doc(hidden)]
    #[cold]
    #[must_use]
    #[track_caller]
    pub fn wrap_error(
        cause: impl IntoCause,
        args: fmt::Arguments<'_>,
        function: &'static str,
    ) -> Error {
        Error::from_message(
            message(args),
            Some(cause.into_cause()),
            hooks::collect_call_site(Some(function)),
        )
    }

    #[doc(hidden)]
    #[cold]
    #[must_use]
    #[track_caller]
    pub fn coded_error(code: i64, args: fmt::Arguments<'_>, function: &'static str) -> Error {
        decorated_root(Capability::Code(code), args, function)
    }

    #[doc(hidden)]
    #[cold]
    #[must_use]
    #[track_caller]
    pub fn retry_error(wait: Duration, args: fmt::Arguments<'_>, function: &'static str) -> Error {
        decorated_root(
            Capability::RetryAfter(capability::deadline(wait)),
            args,
            function,
        )
    }

    #[track_caller]
    fn decorated_root(
        capability: Capability,
        args: fmt::Arguments<'_>,
        function: &'static str,
    ) -> Error {
        let call_site = hooks::collect_call_site(Some(function));
        let root = Error::from_message(message(args), None, call_site.clone());
        Error::decorate(capability, Cause::Chain(root), call_site)
    }
}
