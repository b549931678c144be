//! Width and precision handling for rendered locations.
//!
//! Locations are padded and truncated differently from the standard library's
//! [`Formatter::pad`](core::fmt::Formatter::pad): precision keeps the *tail*
//! of the string, since the end of a location (file name and line) is the
//! part worth keeping.

use core::fmt::{self, Alignment};

/// Width, precision and alignment constraints for a location string.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Padding {
    /// Minimum width in characters. Shorter strings are filled up.
    pub width: Option<usize>,
    /// Maximum width in characters. Longer strings lose their leading
    /// characters.
    pub precision: Option<usize>,
    /// Where the text sits inside `width`. `None` aligns right.
    pub align: Option<Alignment>,
    /// Character used to fill up to `width`.
    pub fill: char,
}

impl Padding {
    /// No constraints.
    pub const NONE: Self = Self {
        width: None,
        precision: None,
        align: None,
        fill: ' ',
    };

    /// Reads the constraints from a formatter's flags.
    pub fn from_formatter(f: &fmt::Formatter<'_>) -> Self {
        Self {
            width: f.width(),
            precision: f.precision(),
            align: f.align(),
            fill: f.fill(),
        }
    }

    /// Returns `true` if writing through this padding changes nothing.
    pub fn is_none(&self) -> bool {
        self.width.is_none() && self.precision.is_none()
    }

    /// Writes `text` truncated to `precision` and padded to `width`.
    pub fn write(&self, out: &mut dyn fmt::Write, text: &str) -> fmt::Result {
        let text = match self.precision {
            Some(precision) => keep_tail(text, precision),
            None => text,
        };
        let len = text.chars().count();
        let missing = self.width.map_or(0, |width| width.saturating_sub(len));
        if missing == 0 {
            return out.write_str(text);
        }

        let (before, after) = match self.align {
            Some(Alignment::Left) => (0, missing),
            Some(Alignment::Center) => (missing / 2, missing - missing / 2),
            Some(Alignment::Right) | None => (missing, 0),
        };
        for _ in 0..before {
            out.write_char(self.fill)?;
        }
        out.write_str(text)?;
        for _ in 0..after {
            out.write_char(self.fill)?;
        }
        Ok(())
    }
}

impl Default for Padding {
    fn default() -> Self {
        Self::NONE
    }
}

fn keep_tail(text: &str, max_chars: usize) -> &str {
    let len = text.chars().count();
    if len <= max_chars {
        return text;
    }
    let start = text
        .char_indices()
        .nth(len - max_chars)
        .map_or(text.len(), |(index, _)| index);
    &text[start..]
}
