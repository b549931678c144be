#![forbid(
    missing_docs,
    unsafe_code,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    unused_doc_comments
)]
//! Internal call-site capture crate for [`whence`].
//!
//! # Overview
//!
//! This crate contains the leaf layer of the [`whence`] error chain library:
//! recording *where* an error was created or wrapped. It has no knowledge of
//! error chains at all.
//!
//! **This crate is an implementation detail.** No semantic versioning
//! guarantees are provided. Users should depend on the [`whence`] crate, which
//! re-exports everything needed from here.
//!
//! # Architecture
//!
//! - **[`call_site`]**: The immutable [`CallSite`] value and the different ways
//!   of producing one:
//!   - [`CallSite::from_location`]: file and line from `#[track_caller]`
//!   - [`CallSite::with_function`]: the same, plus a function path known at
//!     compile time (see [`function_path!`])
//!   - [`CallSite::symbolize`]: the same, with the function path resolved
//!     from the stack (requires the `backtrace` feature)
//!   - [`CallSite::capture`]: positional frame capture (requires the
//!     `backtrace` feature, degrades to [`CallSite::unknown`] otherwise)
//! - **[`padding`]**: width / precision handling shared by every place that
//!   renders a location.
//!
//! Capture is best-effort. Nothing in this crate panics or returns an error;
//! missing information is represented by empty strings and a missing line.
//!
//! [`whence`]: https://docs.rs/whence

pub mod call_site;
pub mod padding;

#[cfg(feature = "backtrace")]
mod stack;

pub use self::{
    call_site::{CallSite, LocationStyle},
    padding::Padding,
};

/// Expands to the fully qualified path of the enclosing function, as a
/// `&'static str`.
///
/// The path is derived from [`core::any::type_name_of_val`] of a marker
/// function declared inside the caller, so it costs nothing at runtime and
/// works without debug information.
///
/// ```
/// fn lookup() -> &'static str {
///     whence_internals::function_path!()
/// }
///
/// assert!(lookup().ends_with("::lookup"));
/// ```
#[macro_export]
macro_rules! function_path {
    () => {{
        fn __whence_marker() {}
        $crate::call_site::trim_marker(::core::any::type_name_of_val(&__whence_marker))
    }};
}
