//! Matching-mode flags passed through to the regex engine.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use regex::RegexBuilder;
use tracing::debug;

/// Bitmask of matching modes.
///
/// Bit values follow the conventional regex flag numbering so masks
/// stored as integers stay portable.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Flags(u32);

impl Flags {
    pub const EMPTY: Flags = Flags(0);
    /// Case-insensitive matching.
    pub const IGNORECASE: Flags = Flags(2);
    /// Locale dependent classes. Not supported by the engine, accepted and ignored.
    pub const LOCALE: Flags = Flags(4);
    /// `^` and `$` also match at line boundaries.
    pub const MULTILINE: Flags = Flags(8);
    /// `.` matches newlines.
    pub const DOTALL: Flags = Flags(16);
    /// Unicode classes. Always on.
    pub const UNICODE: Flags = Flags(32);
    /// Whitespace and `#` comments in the pattern are ignored.
    pub const VERBOSE: Flags = Flags(64);

    pub const I: Flags = Flags::IGNORECASE;
    pub const L: Flags = Flags::LOCALE;
    pub const M: Flags = Flags::MULTILINE;
    pub const S: Flags = Flags::DOTALL;
    pub const U: Flags = Flags::UNICODE;
    pub const X: Flags = Flags::VERBOSE;

    const ALL: u32 = 2 | 4 | 8 | 16 | 32 | 64;

    /// Build from raw bits. Unknown bits are dropped.
    pub const fn from_bits(bits: u32) -> Flags {
        Flags(bits & Self::ALL)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub(crate) fn apply(self, builder: &mut RegexBuilder) {
        if self.contains(Flags::LOCALE) {
            debug!("Locale flag has no effect and is ignored");
        }
        builder
            .case_insensitive(self.contains(Flags::IGNORECASE))
            .multi_line(self.contains(Flags::MULTILINE))
            .dot_matches_new_line(self.contains(Flags::DOTALL))
            .ignore_whitespace(self.contains(Flags::VERBOSE))
            .unicode(true);
    }
}

impl BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

impl BitOrAssign for Flags {
    fn bitor_assign(&mut self, rhs: Flags) {
        self.0 |= rhs.0;
    }
}

impl From<u32> for Flags {
    fn from(bits: u32) -> Self {
        Flags::from_bits(bits)
    }
}

impl fmt::Debug for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(Flags, &str); 6] = [
            (Flags::IGNORECASE, "IGNORECASE"),
            (Flags::LOCALE, "LOCALE"),
            (Flags::MULTILINE, "MULTILINE"),
            (Flags::DOTALL, "DOTALL"),
            (Flags::UNICODE, "UNICODE"),
            (Flags::VERBOSE, "VERBOSE"),
        ];

        let names: Vec<&str> = NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();

        if names.is_empty() {
            f.write_str("Flags(EMPTY)")
        } else {
            write!(f, "Flags({})", names.join(" | "))
        }
    }
}
