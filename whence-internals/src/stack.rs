//! Stack walking on top of the `backtrace` crate.
//!
//! Every resolved symbol counts as one frame, so functions that were inlined
//! into a physical frame still show up individually when the debug
//! information describes them.

use std::{borrow::Cow, path::Path};

use crate::CallSite;

struct Symbol {
    name: String,
    file: Option<String>,
    line: Option<u32>,
}

impl Symbol {
    fn into_call_site(self) -> CallSite {
        CallSite::new(
            self.file.map_or(Cow::Borrowed(""), Cow::Owned),
            self.line.unwrap_or(0),
            self.name,
        )
    }
}

/// Visits resolved symbols from the innermost frame outwards until `visit`
/// returns `false`.
fn walk(mut visit: impl FnMut(Symbol) -> bool) {
    let mut keep_going = true;
    backtrace::trace(|frame| {
        backtrace::resolve_frame(frame, |symbol| {
            if !keep_going {
                return;
            }
            keep_going = visit(Symbol {
                name: symbol.name().map(|name| format!("{name:#}")).unwrap_or_default(),
                file: symbol
                    .filename()
                    .map(|path| path.to_string_lossy().into_owned()),
                line: symbol.lineno(),
            });
        });
        keep_going
    });
}

/// Returns the frame `skip` levels above the innermost symbol whose name ends
/// with `anchor`.
pub(crate) fn nth_frame(anchor: &str, skip: usize) -> Option<CallSite> {
    let mut remaining: Option<usize> = None;
    let mut found = None;
    walk(|symbol| {
        let left = match remaining {
            Some(left) => left,
            None if symbol.name.ends_with(anchor) => skip,
            None => return true,
        };
        if left == 0 {
            found = Some(symbol);
            return false;
        }
        remaining = Some(left - 1);
        true
    });
    found.map(Symbol::into_call_site)
}

/// Returns the name of the innermost function at `file:line`.
///
/// `file` is matched as a path suffix, since `#[track_caller]` locations are
/// usually relative to the package while debug information holds absolute
/// paths.
pub(crate) fn function_at(file: &str, line: u32) -> Option<String> {
    let wanted = Path::new(file);
    let mut found = None;
    walk(|symbol| {
        let matches = symbol.line == Some(line)
            && !symbol.name.is_empty()
            && symbol
                .file
                .as_deref()
                .is_some_and(|path| Path::new(path).ends_with(wanted));
        if matches {
            found = Some(symbol.name);
        }
        !matches
    });
    found
}
