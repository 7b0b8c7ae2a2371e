//! 32-bit ARGB colors and their user-facing meanings.

use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// A 32-bit ARGB color value (alpha in the high byte).
///
/// Persisted as a signed 64-bit integer carrying the bit pattern, so it
/// survives transport through numeric types without an unsigned 32-bit range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Argb(pub u32);

impl Argb {
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Widen to the signed 64-bit storage encoding.
    pub const fn to_storage(self) -> i64 {
        self.0 as i64
    }

    /// Recover the ARGB bit pattern from the storage encoding.
    ///
    /// Truncates to the low 32 bits, so both the canonical non-negative
    /// encoding and a sign-extended 32-bit transport decode to the same color.
    pub const fn from_storage(value: i64) -> Self {
        Argb(value as u32)
    }
}

impl fmt::Display for Argb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

impl FromStr for Argb {
    type Err = ValidationError;

    /// Parses `#AARRGGBB` or `#RRGGBB` (alpha defaults to FF). The leading
    /// `#` is optional.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        let parsed = match hex.len() {
            8 => u32::from_str_radix(hex, 16).ok(),
            6 => u32::from_str_radix(hex, 16).ok().map(|v| 0xFF00_0000 | v),
            _ => None,
        };
        parsed.map(Argb).ok_or_else(|| {
            ValidationError::invalid("color", "expected #AARRGGBB or #RRGGBB hex")
        })
    }
}

/// A color paired with a human-readable label (e.g. "Good Day").
///
/// Neither colors nor meanings are required to be unique within a palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorMeaning {
    pub color: Argb,
    pub meaning: String,
}

impl ColorMeaning {
    pub fn new(color: Argb, meaning: impl Into<String>) -> Self {
        Self {
            color,
            meaning: meaning.into(),
        }
    }
}
