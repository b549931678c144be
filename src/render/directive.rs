use core::{
    fmt::{self, Alignment},
    str::FromStr,
};

use whence_internals::{LocationStyle, Padding};

/// What to write for each node.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Verb {
    /// The message only. Written as `s`.
    Message,
    /// `file.rs(12):message`. Written as `v`.
    #[default]
    Short,
    /// `crate::module/file.rs(12):message`, or `path/to/file.rs(12):message`
    /// when the module is unknown. Written as `V`.
    Module,
    /// `function(12):message`, or the short form when the function is
    /// unknown. Written as `n`.
    Function,
}

impl Verb {
    /// The location style this verb writes, or `None` for [`Verb::Message`].
    pub fn location_style(self) -> Option<LocationStyle> {
        match self {
            Verb::Message => None,
            Verb::Short => Some(LocationStyle::Short),
            Verb::Module => Some(LocationStyle::Module),
            Verb::Function => Some(LocationStyle::Function),
        }
    }

    /// The directive character for this verb.
    pub fn as_char(self) -> char {
        match self {
            Verb::Message => 's',
            Verb::Short => 'v',
            Verb::Module => 'V',
            Verb::Function => 'n',
        }
    }

    /// Parses a directive character.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            's' => Some(Verb::Message),
            'v' => Some(Verb::Short),
            'V' => Some(Verb::Module),
            'n' => Some(Verb::Function),
            _ => None,
        }
    }
}

/// Whether and how causes are written after a node.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Recurse {
    /// Only the node itself.
    #[default]
    Off,
    /// All causes on one line, joined by `" because "`. Flag `+`.
    OneLine,
    /// One cause per line. Flag `-`.
    MultiLine,
}

impl Recurse {
    /// The text written between a node and its cause.
    pub fn connector(self) -> &'static str {
        match self {
            Recurse::Off => "",
            Recurse::OneLine => " because ",
            Recurse::MultiLine => "\n",
        }
    }
}

/// A complete rendering instruction: verb, recursion, width and precision.
///
/// Width and precision apply to the location of every node written, never to
/// the message. Precision keeps the end of the location, so `.13` turns
/// `crate::net/socket.rs(88)` into `socket.rs(88)`.
///
/// Directives are built in code, read from a [`Formatter`](fmt::Formatter),
/// or parsed from a string of the form `[%][flags][width][.precision]verb`:
///
/// | Part      | Meaning                                                 |
/// |-----------|---------------------------------------------------------|
/// | `+`       | recurse on one line                                     |
/// | `-`       | recurse over multiple lines                             |
/// | `<` `^` `>` | align the location left, centered or right (default)  |
/// | width     | minimum location width                                  |
/// | precision | maximum location width, keeping the tail                |
/// | verb      | `s`, `v`, `V` or `n`, see [`Verb`]                      |
///
/// ```rust
/// use whence::{Directive, Recurse, Verb};
///
/// let directive: Directive = "+20.12V".parse()?;
/// assert_eq!(directive.verb, Verb::Module);
/// assert_eq!(directive.recurse, Recurse::OneLine);
/// assert_eq!(directive.padding.width, Some(20));
/// assert_eq!(directive.to_string(), "+20.12V");
/// # Ok::<(), whence::ParseDirectiveError>(())
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Directive {
    /// What to write for each node.
    pub verb: Verb,
    /// Whether to follow the causes.
    pub recurse: Recurse,
    /// Width and precision of each location.
    pub padding: Padding,
}

impl Directive {
    /// `v`: short location and message, no causes.
    pub const DEFAULT: Self = Self::new(Verb::Short);

    /// A directive for `verb` with no recursion and no padding.
    pub const fn new(verb: Verb) -> Self {
        Self {
            verb,
            recurse: Recurse::Off,
            padding: Padding::NONE,
        }
    }

    /// Reads recursion and padding from the formatter flags: `+` and `-`
    /// select [`Recurse::OneLine`] and [`Recurse::MultiLine`].
    pub fn from_formatter(verb: Verb, f: &fmt::Formatter<'_>) -> Self {
        let recurse = if f.sign_plus() {
            Recurse::OneLine
        } else if f.sign_minus() {
            Recurse::MultiLine
        } else {
            Recurse::Off
        };
        Self {
            verb,
            recurse,
            padding: Padding::from_formatter(f),
        }
    }

    /// Parses `s`, falling back to [`Directive::DEFAULT`] when it is not a
    /// valid directive.
    pub fn parse_or_default(s: &str) -> Self {
        s.parse().unwrap_or(Self::DEFAULT)
    }

    /// Sets the recursion mode.
    #[must_use]
    pub const fn with_recurse(mut self, recurse: Recurse) -> Self {
        self.recurse = recurse;
        self
    }

    /// Sets the minimum location width.
    #[must_use]
    pub const fn with_width(mut self, width: usize) -> Self {
        self.padding.width = Some(width);
        self
    }

    /// Sets the maximum location width.
    #[must_use]
    pub const fn with_precision(mut self, precision: usize) -> Self {
        self.padding.precision = Some(precision);
        self
    }

    /// Sets the location alignment within its width.
    #[must_use]
    pub const fn with_align(mut self, align: Alignment) -> Self {
        self.padding.align = Some(align);
        self
    }

    /// Sets the fill character used to reach the width.
    #[must_use]
    pub const fn with_fill(mut self, fill: char) -> Self {
        self.padding.fill = fill;
        self
    }
}

impl Default for Directive {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.recurse {
            Recurse::Off => {}
            Recurse::OneLine => f.write_str("+")?,
            Recurse::MultiLine => f.write_str("-")?,
        }
        match self.padding.align {
            None => {}
            Some(Alignment::Left) => f.write_str("<")?,
            Some(Alignment::Center) => f.write_str("^")?,
            Some(Alignment::Right) => f.write_str(">")?,
        }
        if let Some(width) = self.padding.width {
            write!(f, "{width}")?;
        }
        if let Some(precision) = self.padding.precision {
            write!(f, ".{precision}")?;
        }
        write!(f, "{}", self.verb.as_char())
    }
}

impl FromStr for Directive {
    type Err = ParseDirectiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rest = s.strip_prefix('%').unwrap_or(s);
        let mut directive = Directive::DEFAULT;

        while let Some(c) = rest.chars().next() {
            match c {
                '+' | '-' => {
                    let recurse = if c == '+' {
                        Recurse::OneLine
                    } else {
                        Recurse::MultiLine
                    };
                    if directive.recurse != Recurse::Off && directive.recurse != recurse {
                        return Err(ParseDirectiveError(ErrorKind::ConflictingRecursion));
                    }
                    directive.recurse = recurse;
                }
                '<' => directive.padding.align = Some(Alignment::Left),
                '^' => directive.padding.align = Some(Alignment::Center),
                '>' => directive.padding.align = Some(Alignment::Right),
                _ => break,
            }
            rest = &rest[c.len_utf8()..];
        }

        let (width, after_width) = take_number(rest)?;
        directive.padding.width = width;
        rest = after_width;

        if let Some(after_dot) = rest.strip_prefix('.') {
            let (precision, after_precision) = take_number(after_dot)?;
            directive.padding.precision =
                Some(precision.ok_or(ParseDirectiveError(ErrorKind::MissingPrecision))?);
            rest = after_precision;
        }

        let mut chars = rest.chars();
        let verb = match chars.next() {
            None => return Err(ParseDirectiveError(ErrorKind::MissingVerb)),
            Some(c) => Verb::from_char(c).ok_or(ParseDirectiveError(ErrorKind::UnknownVerb(c)))?,
        };
        if chars.next().is_some() {
            return Err(ParseDirectiveError(ErrorKind::TrailingInput));
        }
        directive.verb = verb;
        Ok(directive)
    }
}

fn take_number(s: &str) -> Result<(Option<usize>, &str), ParseDirectiveError> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if end == 0 {
        return Ok((None, s));
    }
    let value = s[..end]
        .parse()
        .map_err(|_| ParseDirectiveError(ErrorKind::NumberTooLarge))?;
    Ok((Some(value), &s[end..]))
}

/// Error returned when parsing a [`Directive`] from a string fails.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ParseDirectiveError(ErrorKind);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ErrorKind {
    MissingVerb,
    UnknownVerb(char),
    ConflictingRecursion,
    MissingPrecision,
    NumberTooLarge,
    TrailingInput,
}

impl fmt::Display for ParseDirectiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            ErrorKind::MissingVerb => f.write_str("directive has no verb"),
            ErrorKind::UnknownVerb(c) => write!(f, "unknown verb {c:?}, expected one of s, v, V, n"),
            ErrorKind::ConflictingRecursion => f.write_str("flags + and - cannot be combined"),
            ErrorKind::MissingPrecision => f.write_str("expected digits after '.'"),
            ErrorKind::NumberTooLarge => f.write_str("width or precision is too large"),
            ErrorKind::TrailingInput => f.write_str("unexpected characters after the verb"),
        }
    }
}

impl core::error::Error for ParseDirectiveError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_verbs() {
        for (input, verb) in [
            ("s", Verb::Message),
            ("v", Verb::Short),
            ("V", Verb::Module),
            ("n", Verb::Function),
            ("%v", Verb::Short),
        ] {
            assert_eq!(input.parse::<Directive>(), Ok(Directive::new(verb)), "{input}");
        }
    }

    #[test]
    fn test_parse_full() {
        let directive: Directive = "%-<30.10n".parse().unwrap();
        assert_eq!(
            directive,
            Directive::new(Verb::Function)
                .with_recurse(Recurse::MultiLine)
                .with_align(Alignment::Left)
                .with_width(30)
                .with_precision(10)
        );
        assert_eq!(directive.to_string(), "-<30.10n");
    }

    #[test]
    fn test_repeated_flag_is_accepted() {
        let directive: Directive = "++s".parse().unwrap();
        assert_eq!(directive.recurse, Recurse::OneLine);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "".parse::<Directive>(),
            Err(ParseDirectiveError(ErrorKind::MissingVerb))
        );
        assert_eq!(
            "12".parse::<Directive>(),
            Err(ParseDirectiveError(ErrorKind::MissingVerb))
        );
        assert_eq!(
            "d".parse::<Directive>(),
            Err(ParseDirectiveError(ErrorKind::UnknownVerb('d')))
        );
        assert_eq!(
            "+-v".parse::<Directive>(),
            Err(ParseDirectiveError(ErrorKind::ConflictingRecursion))
        );
        assert_eq!(
            "5.v".parse::<Directive>(),
            Err(ParseDirectiveError(ErrorKind::MissingPrecision))
        );
        assert_eq!(
            "vv".parse::<Directive>(),
            Err(ParseDirectiveError(ErrorKind::TrailingInput))
        );
        assert_eq!(
            "99999999999999999999999v".parse::<Directive>(),
            Err(ParseDirectiveError(ErrorKind::NumberTooLarge))
        );
    }

    #[test]
    fn test_error_messages() {
        let error = "+-v".parse::<Directive>().unwrap_err();
        assert_eq!(error.to_string(), "flags + and - cannot be combined");
        let error = "q".parse::<Directive>().unwrap_err();
        assert_eq!(error.to_string(), "unknown verb 'q', expected one of s, v, V, n");
    }

    #[test]
    fn test_parse_or_default() {
        assert_eq!(Directive::parse_or_default("bogus"), Directive::DEFAULT);
        assert_eq!(Directive::parse_or_default("+s").recurse, Recurse::OneLine);
    }

    #[test]
    fn test_connectors() {
        assert_eq!(Recurse::Off.connector(), "");
        assert_eq!(Recurse::OneLine.connector(), " because ");
        assert_eq!(Recurse::MultiLine.connector(), "\n");
    }

    #[test]
    fn test_verb_chars() {
        for verb in [Verb::Message, Verb::Short, Verb::Module, Verb::Function] {
            assert_eq!(Verb::from_char(verb.as_char()), Some(verb));
        }
        assert_eq!(Verb::Message.location_style(), None);
        assert_eq!(Verb::Module.location_style(), Some(LocationStyle::Module));
    }
}
