//! The [`CallSite`] value and its capture strategies.

use std::{borrow::Cow, fmt, panic::Location};

use crate::padding::Padding;

const MARKER_SUFFIX: &str = "::__whence_marker";
const CLOSURE_SEGMENT: &str = "::{{closure}}";
const UNKNOWN_FILE: &str = "<unknown>";

/// The location where an error node was created, or where an existing error
/// was wrapped.
///
/// A call site is immutable once created. The function path is stored in its
/// fully qualified form (`my_crate::module::function`); the shorter views are
/// derived on demand by [`module_path`](Self::module_path) and
/// [`function_name`](Self::function_name).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CallSite {
    file: Cow<'static, str>,
    line: Option<u32>,
    function: Cow<'static, str>,
}

/// How much of a [`CallSite`] to show when rendering it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum LocationStyle {
    /// `file_name(line)`, e.g. `lookup.rs(42)`.
    #[default]
    Short,
    /// `module_path/file_name(line)`, e.g. `app::store/lookup.rs(42)`.
    ///
    /// Falls back to the full file path when the module is not known.
    Module,
    /// `function_name(line)`, e.g. `find_user(42)`.
    ///
    /// Falls back to [`Short`](Self::Short) when the function is not known.
    Function,
}

impl CallSite {
    /// A call site carrying no information.
    ///
    /// This is what capture degrades to when the stack cannot be inspected.
    pub const fn unknown() -> Self {
        Self {
            file: Cow::Borrowed(""),
            line: None,
            function: Cow::Borrowed(""),
        }
    }

    /// Creates a call site from its parts. A line of `0` means unknown.
    pub fn new(
        file: impl Into<Cow<'static, str>>,
        line: u32,
        function: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            file: file.into(),
            line: (line != 0).then_some(line),
            function: function.into(),
        }
    }

    /// Creates a call site from a `#[track_caller]` location.
    ///
    /// The function path is left empty.
    pub fn from_location(location: &'static Location<'static>) -> Self {
        Self {
            file: Cow::Borrowed(location.file()),
            line: Some(location.line()),
            function: Cow::Borrowed(""),
        }
    }

    /// Creates a call site from a location and a function path that is
    /// already known, typically from [`function_path!`](crate::function_path).
    pub fn with_function(location: &'static Location<'static>, function: &'static str) -> Self {
        Self {
            function: Cow::Borrowed(function),
            ..Self::from_location(location)
        }
    }

    /// Creates a call site from a location and resolves the enclosing function
    /// by walking the stack for the frame at that file and line.
    ///
    /// Without the `backtrace` feature, or when no matching frame has symbol
    /// information, the function path is left empty.
    pub fn symbolize(location: &'static Location<'static>) -> Self {
        #[cfg(feature = "backtrace")]
        if let Some(function) = crate::stack::function_at(location.file(), location.line()) {
            return Self {
                function: Cow::Owned(function),
                ..Self::from_location(location)
            };
        }
        Self::from_location(location)
    }

    /// Captures the frame `skip_frames` levels up the stack.
    ///
    /// Frame `0` is this function itself, frame `1` its caller, and so on.
    /// Inlined functions count as frames of their own when the debug
    /// information describes them.
    ///
    /// Returns [`CallSite::unknown`] when the stack is shallower than
    /// requested, when symbols cannot be resolved, or when the `backtrace`
    /// feature is disabled.
    #[inline(never)]
    pub fn capture(skip_frames: usize) -> Self {
        #[cfg(feature = "backtrace")]
        {
            crate::stack::nth_frame("CallSite::capture", skip_frames).unwrap_or_else(Self::unknown)
        }
        #[cfg(not(feature = "backtrace"))]
        {
            let _ = skip_frames;
            Self::unknown()
        }
    }

    /// Returns `true` if nothing is known about this call site.
    pub fn is_unknown(&self) -> bool {
        self.file.is_empty() && self.line.is_none() && self.function.is_empty()
    }

    /// The source file path as recorded at capture time.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// The line number, if known.
    pub fn line(&self) -> Option<u32> {
        self.line
    }

    /// The fully qualified function path, or an empty string.
    pub fn function(&self) -> &str {
        &self.function
    }

    /// The last component of [`file`](Self::file).
    pub fn file_name(&self) -> &str {
        self.file
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default()
    }

    /// The function path without its final segment.
    ///
    /// Closure segments are attributed to their enclosing function, so a
    /// closure inside `app::store::find` has the module path `app::store`.
    pub fn module_path(&self) -> &str {
        split_last_segment(strip_closures(&self.function)).0
    }

    /// The final segment of the function path.
    pub fn function_name(&self) -> &str {
        split_last_segment(strip_closures(&self.function)).1
    }

    /// Writes the location in the requested style, without padding.
    pub fn write_location(&self, out: &mut dyn fmt::Write, style: LocationStyle) -> fmt::Result {
        match style {
            LocationStyle::Module if !self.module_path().is_empty() => {
                write!(out, "{}/{}", self.module_path(), self.file_name())?;
            }
            LocationStyle::Module => out.write_str(or_unknown(&self.file))?,
            LocationStyle::Function if !self.function_name().is_empty() => {
                out.write_str(self.function_name())?;
            }
            LocationStyle::Short | LocationStyle::Function => {
                out.write_str(or_unknown(self.file_name()))?;
            }
        }
        match self.line {
            Some(line) => write!(out, "({line})"),
            None => out.write_str("(?)"),
        }
    }

    /// Renders the location in the requested style, without padding.
    pub fn location(&self, style: LocationStyle) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_location(&mut out, style);
        out
    }
}

impl Default for CallSite {
    fn default() -> Self {
        Self::unknown()
    }
}

/// `{}` renders [`LocationStyle::Short`], `{:#}` renders
/// [`LocationStyle::Module`]. Width, precision, fill and alignment apply as
/// described on [`Padding`].
impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let style = if f.alternate() {
            LocationStyle::Module
        } else {
            LocationStyle::Short
        };
        Padding::from_formatter(f).write(f, &self.location(style))
    }
}

fn or_unknown(s: &str) -> &str {
    if s.is_empty() { UNKNOWN_FILE } else { s }
}

/// Strips the marker function that [`function_path!`](crate::function_path)
/// declares from the end of its type name.
#[doc(hidden)]
pub fn trim_marker(name: &'static str) -> &'static str {
    name.strip_suffix(MARKER_SUFFIX).unwrap_or(name)
}

fn strip_closures(mut path: &str) -> &str {
    while let Some(stripped) = path.strip_suffix(CLOSURE_SEGMENT) {
        path = stripped;
    }
    path
}

/// Splits `a::b::<T as c::D>::f` into `("a::b::<T as c::D>", "f")`, ignoring
/// separators nested inside generic arguments or braces.
fn split_last_segment(path: &str) -> (&str, &str) {
    let bytes = path.as_bytes();
    let mut depth = 0usize;
    let mut split = None;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' | b'{' | b'(' | b'[' => depth += 1,
            // `->` inside a fn pointer type is not a closing bracket
            b'>' if i > 0 && bytes[i - 1] == b'-' => {}
            b'>' | b'}' | b')' | b']' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                split = Some(i);
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }
    match split {
        Some(at) => (&path[..at], &path[at + 2..]),
        None => ("", path),
    }
}
