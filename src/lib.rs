//! # rainlex
//!
//! A single-pass tokenizer and line folder for Rainmeter-style skin files.
//!
//! The tokenizer classifies every byte of a skin document into a small set
//! of lexical categories (section, keyword, option value, variable, bang,
//! ...) for syntax highlighting. The folder runs a second, independent pass
//! over the committed styles to assign per-line fold levels, collapsing a
//! section header and its body into one foldable block.
//!
//! See the [rain] module for the library surface.

pub mod rain;

pub use rain::document::StyledDocument;
pub use rain::folding::fold;
pub use rain::style::{Span, TokenClass};
pub use rain::tokenizer::Tokenizer;
pub use rain::words::{WordListKind, WordListSet};
