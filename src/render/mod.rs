//! Turning chains into text.
//!
//! A chain is rendered node by node. For each node, decorators are looked
//! through to the underlying message node; its location is written if the
//! [`Verb`] asks for one, followed by [`LOCATION_SEPARATOR`] and the message.
//! If the [`Directive`] recurses and the node has a cause, the
//! [`connector`](Recurse::connector) is written and the cause rendered with
//! the same directive. Errors from outside this crate have no location and
//! are written through their own `Display`; rendering stops there.
//!
//! The same rules drive the standard formatting traits of
//! [`Error`](crate::Error):
//!
//! ```rust
//! use whence::{Directive, Error, Recurse, Verb};
//!
//! let error = Error::wrap(Error::new("disk full"), "cannot save");
//!
//! assert_eq!(format!("{error:+}"), "cannot save because disk full");
//! assert_eq!(
//!     whence::render(&error, &Directive::new(Verb::Message).with_recurse(Recurse::MultiLine)),
//!     "cannot save\ndisk full",
//! );
//! ```

mod directive;

use std::{error::Error as StdError, fmt};

use whence_internals::{CallSite, LocationStyle, Padding};

pub use self::directive::{Directive, ParseDirectiveError, Recurse, Verb};
use crate::{Cause, Error};

/// Written between a location and its message.
pub const LOCATION_SEPARATOR: &str = ":";

/// Renders `error` into a new string.
///
/// `error` may be any error. Only errors of this crate carry a location;
/// any other error is written through its `Display` implementation.
pub fn render(error: &(dyn StdError + 'static), directive: &Directive) -> String {
    let mut out = String::new();
    // Writing into a String only fails if a foreign Display impl fails.
    let _ = write_error(&mut out, error, directive);
    out
}

/// Renders `error` into `out`.
pub fn write_error(
    out: &mut dyn fmt::Write,
    error: &(dyn StdError + 'static),
    directive: &Directive,
) -> fmt::Result {
    match error.downcast_ref::<Error>() {
        Some(error) => write_frame(out, error, directive, true),
        None => write!(out, "{error}"),
    }
}

fn write_frame(
    out: &mut dyn fmt::Write,
    error: &Error,
    directive: &Directive,
    is_top_frame: bool,
) -> fmt::Result {
    if !is_top_frame {
        out.write_str(directive.recurse.connector())?;
    }

    let frame = error.frame();
    if let Some(style) = directive.verb.location_style() {
        write_location(out, frame.call_site, style, &directive.padding)?;
        out.write_str(LOCATION_SEPARATOR)?;
    }
    write!(out, "{}", frame.message)?;

    if directive.recurse == Recurse::Off {
        return Ok(());
    }
    match frame.cause {
        None => Ok(()),
        Some(Cause::Chain(cause)) => write_frame(out, cause, directive, false),
        Some(Cause::Foreign(cause)) => {
            out.write_str(directive.recurse.connector())?;
            write!(out, "{cause}")
        }
    }
}

fn write_location(
    out: &mut dyn fmt::Write,
    call_site: &CallSite,
    style: LocationStyle,
    padding: &Padding,
) -> fmt::Result {
    if padding.is_none() {
        call_site.write_location(out, style)
    } else {
        padding.write(out, &call_site.location(style))
    }
}

/// Displays an [`Error`] with a fixed [`Verb`], taking recursion and padding
/// from the format string.
///
/// Created by [`Error::display`].
#[derive(Copy, Clone)]
#[must_use]
pub struct Rendered<'a> {
    error: &'a Error,
    verb: Verb,
}

impl<'a> Rendered<'a> {
    pub(crate) fn new(error: &'a Error, verb: Verb) -> Self {
        Self { error, verb }
    }
}

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let directive = Directive::from_formatter(self.verb, f);
        write_frame(f, self.error, &directive, true)
    }
}

impl fmt::Debug for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("connection refused")]
    struct Refused;

    #[test]
    fn test_message_verb() {
        let error = Error::wrap(Error::new("b"), "a");
        let directive = Directive::new(Verb::Message);
        assert_eq!(render(&error, &directive), "a");
        assert_eq!(
            render(&error, &directive.with_recurse(Recurse::OneLine)),
            "a because b"
        );
        assert_eq!(
            render(&error, &directive.with_recurse(Recurse::MultiLine)),
            "a\nb"
        );
    }

    #[test]
    fn test_short_verb() {
        let line = line!() + 1;
        let error = Error::new("boom");
        assert_eq!(
            render(&error, &Directive::DEFAULT),
            format!("mod.rs({line}):boom")
        );
    }

    #[test]
    fn test_module_verb() {
        let error = crate::error!("boom");
        let rendered = render(&error, &Directive::new(Verb::Module));
        assert!(
            rendered.starts_with("whence::render::tests/mod.rs("),
            "{rendered}"
        );
        assert!(rendered.ends_with("):boom"), "{rendered}");
    }

    #[test]
    fn test_function_verb() {
        let error = crate::error!("boom");
        let rendered = render(&error, &Directive::new(Verb::Function));
        assert!(rendered.starts_with("test_function_verb("), "{rendered}");
    }

    #[test]
    fn test_foreign_leaf() {
        let error = Error::wrap(Refused, "dial failed");
        let directive = Directive::new(Verb::Short).with_recurse(Recurse::OneLine);
        let rendered = render(&error, &directive);
        assert!(rendered.ends_with(":dial failed because connection refused"), "{rendered}");
        assert_eq!(render(&Refused, &directive), "connection refused");
    }

    #[test]
    fn test_padding_applies_to_location_only() {
        let line = line!() + 1;
        let error = Error::new("message that is long");
        let location = format!("mod.rs({line})");

        let padded = render(&error, &Directive::DEFAULT.with_width(40));
        assert_eq!(
            padded,
            format!("{location:>40}:message that is long")
        );

        let left = render(
            &error,
            &Directive::DEFAULT
                .with_width(20)
                .with_align(fmt::Alignment::Left)
                .with_fill('.'),
        );
        assert_eq!(left, format!("{location:.<20}:message that is long"));

        let truncated = render(&error, &Directive::DEFAULT.with_precision(4));
        let tail = &location[location.len() - 4..];
        assert_eq!(truncated, format!("{tail}:message that is long"));
    }

    #[test]
    fn test_rendered_adaptor() {
        let error = Error::wrap(Error::new("b"), "a");
        assert_eq!(format!("{:+}", error.display(Verb::Message)), "a because b");
        assert_eq!(format!("{}", error.display(Verb::Message)), "a");
    }
}
