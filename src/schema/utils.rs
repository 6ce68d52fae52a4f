// Utility functions for the schema module
//
// Length handling for text-like attributes: symbolic size classes are
// resolved to the column-size ceilings of the matching database tiers.

use serde::Deserialize;

/// Ceiling of a `tiny` text column
pub const TINY_TEXT_LENGTH: u64 = 255;
/// Ceiling of a `medium` text column
pub const MEDIUM_TEXT_LENGTH: u64 = 16_777_215;
/// Ceiling of a `long` text column
pub const LONG_TEXT_LENGTH: u64 = 4_294_967_295;

/// Symbolic text size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeAlias {
    Tiny,
    Medium,
    Long,
}

impl SizeAlias {
    /// Returns the fixed maximum length of this size class
    pub fn max_length(&self) -> u64 {
        match self {
            SizeAlias::Tiny => TINY_TEXT_LENGTH,
            SizeAlias::Medium => MEDIUM_TEXT_LENGTH,
            SizeAlias::Long => LONG_TEXT_LENGTH,
        }
    }
}

/// Declared length of a text-like attribute: a character count or a size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Length {
    Chars(u64),
    Alias(SizeAlias),
}

/// Resolves a declared length to a `maxLength` value
///
/// Aliases map to their ceiling and numeric lengths pass through unchanged.
/// An absent or zero length yields `None`, meaning no `maxLength` constraint.
pub fn resolve_length(raw: Option<&Length>) -> Option<u64> {
    match raw? {
        Length::Chars(0) => None,
        Length::Chars(n) => Some(*n),
        Length::Alias(alias) => Some(alias.max_length()),
    }
}
