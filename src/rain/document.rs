//! Document access boundary: character reads, style readback, fold levels.
//!
//! The tokenizer and folder never own the text they scan. They work against
//! small traits modeled on a host editor's accessor, so the core stays
//! testable with synthetic buffers and embeddable behind a real editor.
//! [`StyledDocument`] is the in-memory implementation used by the CLI and
//! the test suite.

use crate::rain::folding::FOLD_BASE;
use crate::rain::style::{Span, StyleSink, TokenClass};

/// Random-access byte reads over the scanned range.
///
/// `char_at` must be total: out-of-range offsets return the fallback byte
/// instead of failing. The tokenizer reads one byte past the nominal end
/// for lookahead and relies on the sentinel there.
pub trait CharSource {
    /// Byte at `pos`, or `fallback` when `pos` is out of range.
    fn char_at(&self, pos: usize, fallback: u8) -> u8;

    /// Zero-based line number containing byte offset `pos`.
    fn line_of(&self, pos: usize) -> usize;
}

/// Readback of styles committed by a previous tokenize pass.
///
/// The folder inspects these to find section header lines; it never writes
/// styles itself.
pub trait StyleSource {
    /// Category committed at `pos`, or `TokenClass::Default` out of range.
    fn style_at(&self, pos: usize) -> TokenClass;
}

/// Per-line fold level storage.
pub trait FoldSink {
    /// Current fold level recorded for `line`.
    fn level_at(&self, line: usize) -> u32;

    /// Record a fold level for `line`.
    fn set_level(&mut self, line: usize, level: u32);
}

/// An in-memory document: source bytes plus per-byte styles, per-line fold
/// levels, and the committed span stream.
///
/// Holds everything both passes need, so one `StyledDocument` can be handed
/// to [`Tokenizer::tokenize`](crate::rain::tokenizer::Tokenizer::tokenize)
/// and then to [`fold`](crate::rain::folding::fold).
#[derive(Debug, Clone)]
pub struct StyledDocument {
    text: Vec<u8>,
    styles: Vec<TokenClass>,
    levels: Vec<u32>,
    spans: Vec<Span>,
    line_starts: Vec<usize>,
    segment_start: usize,
}

impl StyledDocument {
    pub fn new(text: impl Into<Vec<u8>>) -> Self {
        let text = text.into();
        let mut line_starts = vec![0];
        for (i, &b) in text.iter().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        let line_count = line_starts.len();
        StyledDocument {
            styles: vec![TokenClass::Default; text.len()],
            levels: vec![FOLD_BASE; line_count],
            spans: Vec::new(),
            line_starts,
            segment_start: 0,
            text,
        }
    }

    pub fn text(&self) -> &[u8] {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Committed style runs, in scan order.
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Per-line fold levels.
    pub fn levels(&self) -> &[u32] {
        &self.levels
    }

    /// Clear styles, spans and the pending segment for a fresh tokenize pass.
    pub fn reset_styles(&mut self) {
        self.styles.fill(TokenClass::Default);
        self.spans.clear();
        self.segment_start = 0;
    }
}

impl CharSource for StyledDocument {
    fn char_at(&self, pos: usize, fallback: u8) -> u8 {
        self.text.get(pos).copied().unwrap_or(fallback)
    }

    fn line_of(&self, pos: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= pos) - 1
    }
}

impl StyleSink for StyledDocument {
    fn start_segment(&mut self, pos: usize) {
        self.segment_start = pos;
    }

    fn colour_to(&mut self, pos: usize, class: TokenClass) {
        if self.text.is_empty() {
            return;
        }
        // The tokenizer may ask for one past the end after an EOF lookahead.
        let end = pos.min(self.text.len() - 1);
        if end < self.segment_start {
            return; // zero-length close
        }
        for style in &mut self.styles[self.segment_start..=end] {
            *style = class;
        }
        // Adjacent commits with the same category coalesce into one span.
        match self.spans.last_mut() {
            Some(last) if last.class == class && last.end + 1 == self.segment_start => {
                last.end = end;
            }
            _ => self.spans.push(Span::new(self.segment_start, end, class)),
        }
        self.segment_start = end + 1;
    }

    fn flush(&mut self) {}
}

impl StyleSource for StyledDocument {
    fn style_at(&self, pos: usize) -> TokenClass {
        self.styles.get(pos).copied().unwrap_or(TokenClass::Default)
    }
}

impl FoldSink for StyledDocument {
    fn level_at(&self, line: usize) -> u32 {
        self.levels.get(line).copied().unwrap_or(FOLD_BASE)
    }

    fn set_level(&mut self, line: usize, level: u32) {
        if let Some(slot) = self.levels.get_mut(line) {
            *slot = level;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_at_returns_fallback_out_of_range() {
        let doc = StyledDocument::new(*b"ab");
        assert_eq!(doc.char_at(0, 0), b'a');
        assert_eq!(doc.char_at(2, 0), 0);
        assert_eq!(doc.char_at(100, b'?'), b'?');
    }

    #[test]
    fn line_of_maps_offsets_to_lines() {
        let doc = StyledDocument::new(*b"ab\ncd\r\nef");
        assert_eq!(doc.line_count(), 3);
        assert_eq!(doc.line_of(0), 0);
        assert_eq!(doc.line_of(2), 0); // the newline belongs to its line
        assert_eq!(doc.line_of(3), 1);
        assert_eq!(doc.line_of(6), 1);
        assert_eq!(doc.line_of(7), 2);
        assert_eq!(doc.line_of(8), 2);
    }

    #[test]
    fn colour_to_commits_contiguous_spans() {
        let mut doc = StyledDocument::new(*b"abcdef");
        doc.start_segment(0);
        doc.colour_to(2, TokenClass::Section);
        doc.colour_to(1, TokenClass::Comment); // behind the segment: no-op
        doc.colour_to(5, TokenClass::Default);
        assert_eq!(
            doc.spans(),
            &[
                Span::new(0, 2, TokenClass::Section),
                Span::new(3, 5, TokenClass::Default),
            ]
        );
        assert_eq!(doc.style_at(2), TokenClass::Section);
        assert_eq!(doc.style_at(3), TokenClass::Default);
    }

    #[test]
    fn colour_to_clamps_past_the_end() {
        let mut doc = StyledDocument::new(*b"ab");
        doc.start_segment(0);
        doc.colour_to(10, TokenClass::Comment);
        assert_eq!(doc.spans(), &[Span::new(0, 1, TokenClass::Comment)]);
    }
}
