//! Line folding: one foldable region per section.
//!
//! An independent single pass over styles a previous tokenize pass already
//! committed. A line whose style two bytes before its terminator is
//! `Section` opens a foldable header; every other line nests one level
//! under the last open section. Probing two back (not one) steps over the
//! `\r` of a Windows terminator and lands on section body text either way.

use crate::rain::document::{CharSource, FoldSink, StyleSource};
use crate::rain::style::TokenClass;

/// Base fold level for top-level lines, matching the numbering convention
/// of Scintilla-style hosts.
pub const FOLD_BASE: u32 = 0x400;

/// Flag marking a line that opens a collapsible region.
pub const FOLD_HEADER: u32 = 0x2000;

/// Fold level of a section header line.
pub const FOLD_SECTION_HEADER: u32 = FOLD_BASE | FOLD_HEADER;

/// Fold level of a section body line.
pub const FOLD_SECTION_BODY: u32 = FOLD_BASE + 1;

/// Assign fold levels over `length` bytes starting at `start`.
///
/// Requires the range to have been tokenized first; levels are derived
/// purely from committed styles. A level is written only when it differs
/// from the line's recorded one, so re-folding an unchanged document is
/// write-free.
pub fn fold<D: CharSource + StyleSource + FoldSink>(doc: &mut D, start: usize, length: usize) {
    if length == 0 {
        return;
    }
    let end = start + length;
    let mut line = doc.line_of(start);

    for pos in start..end {
        if doc.char_at(pos, 0) == b'\n' || pos == end - 1 {
            let is_header = pos
                .checked_sub(2)
                .map(|probe| doc.style_at(probe) == TokenClass::Section)
                .unwrap_or(false);
            let level = if is_header {
                FOLD_SECTION_HEADER
            } else {
                FOLD_SECTION_BODY
            };

            if doc.level_at(line) != level {
                doc.set_level(line, level);
            }
            line += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rain::document::StyledDocument;
    use crate::rain::tokenizer::Tokenizer;
    use crate::rain::words::WordListSet;

    fn folded(source: &str) -> Vec<u32> {
        let mut doc = StyledDocument::new(source.as_bytes().to_vec());
        let len = doc.len();
        Tokenizer::new(WordListSet::default_set()).tokenize(&mut doc, 0, len);
        fold(&mut doc, 0, len);
        doc.levels().to_vec()
    }

    #[test]
    fn section_lines_become_headers() {
        let levels = folded("[MeasureCPU]\nMeasure=CPU\nUpdateDivider=5\n");
        assert_eq!(levels[0], FOLD_SECTION_HEADER);
        assert_eq!(levels[1], FOLD_SECTION_BODY);
        assert_eq!(levels[2], FOLD_SECTION_BODY);
    }

    #[test]
    fn crlf_sections_fold_identically() {
        let levels = folded("[MeterText]\r\nText=Hello\r\n");
        assert_eq!(levels[0], FOLD_SECTION_HEADER);
        assert_eq!(levels[1], FOLD_SECTION_BODY);
    }

    #[test]
    fn body_runs_until_the_next_header() {
        let levels = folded("[A]\nx=1\n[B]\ny=2\n");
        assert_eq!(
            &levels[..4],
            &[
                FOLD_SECTION_HEADER,
                FOLD_SECTION_BODY,
                FOLD_SECTION_HEADER,
                FOLD_SECTION_BODY,
            ]
        );
    }
}
