//! Integration tests for building, unwrapping and rendering error chains.
//!
//! ## Construction
//! - `test_new_has_no_cause`: roots have no cause and unwrap to nothing
//! - `test_wrap_none_is_none`: wrapping an absent error stays absent
//! - `test_root_cause_round_trip`: the root of a chain is the original node
//! - `test_helpers_keep_caller_location`: layered constructors record the
//!   outermost caller
//!
//! ## Rendering
//! - `test_one_line_recursion`: `{:+}` joins messages with " because "
//! - `test_located_scenario`: `{:+?}` gives every node with its location
//! - `test_no_recursion_shows_top_only`: no flag, no causes
//! - `test_multi_line_recursion`: `{:-?}` gives one node per line
//! - `test_rendering_is_deterministic`: rendering twice gives the same text

use std::io;

use whence::{Directive, Error, OptionExt, Recurse, ResultExt, Verb, prelude::*};

#[derive(Debug, thiserror::Error)]
#[error("record {id} is locked")]
struct Locked {
    id: u32,
}

#[test]
fn test_new_has_no_cause() {
    for message in ["", "not found", "multi\nline", "ünïcödé"] {
        let error = Error::new(message);
        assert!(error.cause().is_none());
        assert!(whence::unwrap(&error).is_none());
        assert_eq!(error.message(), message);
        assert_eq!(error.to_string(), message);
    }
}

#[test]
fn test_wrap_none_is_none() {
    let nothing: Option<Error> = None;
    assert!(whence::wrap(nothing.clone(), "anything").is_none());
    assert!(whence::wrap(nothing.clone(), "").is_none());
    assert!(nothing.wrap("anything").is_none());

    let nothing: Option<io::Error> = None;
    assert!(whence::with_code(nothing, 1).is_none());
}

#[test]
fn test_root_cause_round_trip() {
    let a = Error::new("a");
    let c = Error::wrap(Error::wrap(a.clone(), "b"), "c");

    let root = whence::root_cause(&c).downcast_ref::<Error>();
    assert_eq!(root, Some(&a));
    let root = root.unwrap();
    assert_eq!(root.message(), "a");
    assert_eq!(root.call_site(), a.call_site());
    assert_eq!(c.root_cause().downcast_ref::<Error>(), Some(&a));
}

#[test]
fn test_one_line_recursion() {
    for (m1, m2) in [("a", "b"), ("not found", "lookup failed"), ("", "")] {
        let error = Error::wrap(Error::new(m1), m2);
        assert_eq!(format!("{error:+}"), format!("{m2} because {m1}"));
        assert_eq!(
            whence::render(
                &error,
                &Directive::new(Verb::Message).with_recurse(Recurse::OneLine)
            ),
            format!("{m2} because {m1}")
        );
    }
}

#[test]
fn test_located_scenario() {
    let l = line!() + 1;
    let e = Error::new("not found");
    let l2 = line!() + 1;
    let w = Error::wrap(e, "lookup failed");

    assert_eq!(
        format!("{w:+?}"),
        format!("chain.rs({l2}):lookup failed because chain.rs({l}):not found")
    );
    assert_eq!(
        w.render(&"+v".parse().unwrap()),
        format!("chain.rs({l2}):lookup failed because chain.rs({l}):not found")
    );
    assert_eq!(format!("{w}"), "lookup failed");
    assert_eq!(w.render(&Directive::new(Verb::Message)), "lookup failed");
}

#[test]
fn test_no_recursion_shows_top_only() {
    let error = Error::wrap(Error::wrap(Error::new("a"), "b"), "c");
    let line = error.call_site().line().unwrap();
    assert_eq!(format!("{error}"), "c");
    assert_eq!(format!("{error:?}"), format!("chain.rs({line}):c"));
    assert_eq!(error.describe(), format!("chain.rs({line}):c"));
}

#[test]
fn test_multi_line_recursion() {
    let error = wrap!(Locked { id: 7 }, "cannot update user {}", 42);
    let line = error.call_site().line().unwrap();

    assert_eq!(
        format!("{error:-?}"),
        format!("chain.rs({line}):cannot update user 42\nrecord 7 is locked")
    );
    assert_eq!(format!("{error:-}"), "cannot update user 42\nrecord 7 is locked");
}

#[test]
fn test_module_and_function_forms() {
    let error = error!("bad input");
    let line = error.call_site().line().unwrap();

    assert_eq!(format!("{error:#?}"), format!("chain/chain.rs({line}):bad input"));
    assert_eq!(
        format!("{}", error.display(Verb::Function)),
        format!("test_module_and_function_forms({line}):bad input")
    );
}

#[test]
fn test_rendering_is_deterministic() {
    let error = Error::with_retry(
        Error::wrap(Error::coded(7, "x"), "y"),
        std::time::Duration::from_secs(3600),
    );
    for directive in ["s", "+v", "-V", "+>30.12n"] {
        let directive: Directive = directive.parse().unwrap();
        assert_eq!(error.render(&directive), error.render(&directive));
    }
}

fn read_settings() -> whence::Result<String> {
    Err(io::Error::new(io::ErrorKind::NotFound, "settings.toml")).wrap("cannot read settings")
}

fn start() -> whence::Result<String> {
    read_settings().wrap_with(|| format!("cannot start {}", "server"))
}

#[test]
fn test_helpers_keep_caller_location() {
    let error = start().unwrap_err();
    let messages: Vec<String> = whence::chain(&error).map(|e| e.to_string()).collect();
    assert_eq!(
        messages,
        ["cannot start server", "cannot read settings", "settings.toml"]
    );

    let inner = error.cause().and_then(whence::Cause::as_chain).unwrap();
    assert_ne!(error.call_site().line(), inner.call_site().line());
    assert!(whence::find::<io::Error>(&error).is_some());
}
