//! Lexical categories and the style-emission boundary.
//!
//! The tokenizer never returns tokens; it pushes closed, contiguous style
//! runs into a [`StyleSink`]. A sink keeps one pending span open at a time:
//! [`StyleSink::colour_to`] closes the pending span at an inclusive end
//! position with a category, and the next pending span implicitly starts at
//! the following byte. Spans therefore cover the scanned range exactly once,
//! with no gaps and no overlaps.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lexical category assigned to a run of bytes.
///
/// The discriminant order is stable and doubles as the numeric style ID a
/// host editor uses to address styles, so variants must not be reordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum TokenClass {
    #[default]
    Default = 0,
    Section,
    Comment,
    Keyword,
    DeprecatedKeyword,
    #[serde(rename = "equals-sign")]
    Equals,
    #[serde(rename = "valid-option-value")]
    ValidValue,
    #[serde(rename = "deprecated-valid-option-value")]
    DeprecatedValidValue,
    #[serde(rename = "invalid-option-value")]
    InvalidValue,
    #[serde(rename = "bang-command")]
    Bang,
    #[serde(rename = "deprecated-bang-command")]
    DeprecatedBang,
    InternalVariable,
    ExternalVariable,
}

/// All categories, in style-ID order.
pub const TOKEN_CLASSES: &[TokenClass] = &[
    TokenClass::Default,
    TokenClass::Section,
    TokenClass::Comment,
    TokenClass::Keyword,
    TokenClass::DeprecatedKeyword,
    TokenClass::Equals,
    TokenClass::ValidValue,
    TokenClass::DeprecatedValidValue,
    TokenClass::InvalidValue,
    TokenClass::Bang,
    TokenClass::DeprecatedBang,
    TokenClass::InternalVariable,
    TokenClass::ExternalVariable,
];

impl TokenClass {
    /// Numeric style ID for hosts that address styles by number.
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Inverse of [`TokenClass::id`]. Returns `None` for out-of-range IDs.
    pub fn from_id(id: u8) -> Option<TokenClass> {
        TOKEN_CLASSES.get(id as usize).copied()
    }

    /// Human-readable style name, matching the serialized form.
    pub fn name(self) -> &'static str {
        match self {
            TokenClass::Default => "default",
            TokenClass::Section => "section",
            TokenClass::Comment => "comment",
            TokenClass::Keyword => "keyword",
            TokenClass::DeprecatedKeyword => "deprecated-keyword",
            TokenClass::Equals => "equals-sign",
            TokenClass::ValidValue => "valid-option-value",
            TokenClass::DeprecatedValidValue => "deprecated-valid-option-value",
            TokenClass::InvalidValue => "invalid-option-value",
            TokenClass::Bang => "bang-command",
            TokenClass::DeprecatedBang => "deprecated-bang-command",
            TokenClass::InternalVariable => "internal-variable",
            TokenClass::ExternalVariable => "external-variable",
        }
    }
}

impl fmt::Display for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A closed style run: `[start, end]` inclusive, one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub class: TokenClass,
}

impl Span {
    pub fn new(start: usize, end: usize, class: TokenClass) -> Self {
        Span { start, end, class }
    }

    /// Number of bytes covered by the span. Committed spans are closed
    /// ranges, so this is always at least 1.
    pub fn byte_len(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Receives style runs from the tokenizer.
///
/// The contract mirrors a host editor's styling accessor: `start_segment`
/// opens the pending span, `colour_to` closes it (inclusive) and implicitly
/// reopens at the next byte, and `flush` finalizes at end of scan. A
/// `colour_to` whose end precedes the pending start is a no-op, never an
/// error; the tokenizer relies on that to issue zero-length closes freely.
pub trait StyleSink {
    /// Open the pending span at `pos`.
    fn start_segment(&mut self, pos: usize);

    /// Close the pending span at `pos` (inclusive) with `class`.
    fn colour_to(&mut self, pos: usize, class: TokenClass);

    /// Finalize any pending span at end of scan.
    fn flush(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_ids_round_trip() {
        for (id, class) in TOKEN_CLASSES.iter().enumerate() {
            assert_eq!(class.id() as usize, id);
            assert_eq!(TokenClass::from_id(id as u8), Some(*class));
        }
        assert_eq!(TokenClass::from_id(TOKEN_CLASSES.len() as u8), None);
    }

    #[test]
    fn serialized_names_match_name() {
        for class in TOKEN_CLASSES {
            let json = serde_json::to_string(class).unwrap();
            assert_eq!(json, format!("\"{}\"", class.name()));
        }
    }
}
