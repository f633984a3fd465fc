//! Integration tests for fold-level assignment.

use rainlex::rain::document::{CharSource, FoldSink, StyleSource, StyledDocument};
use rainlex::rain::folding::{fold, FOLD_SECTION_BODY, FOLD_SECTION_HEADER};
use rainlex::rain::style::TokenClass;
use rainlex::rain::tokenizer::Tokenizer;
use std::fs;

fn tokenized(source: &[u8]) -> StyledDocument {
    let mut doc = StyledDocument::new(source.to_vec());
    let len = doc.len();
    Tokenizer::with_defaults().tokenize(&mut doc, 0, len);
    doc
}

#[test]
fn sample_skin_folds_one_region_per_section() {
    let source = fs::read("tests/samples/cpu.ini").expect("Failed to read sample document");
    let mut doc = tokenized(&source);
    let len = doc.len();
    fold(&mut doc, 0, len);

    for (line, text) in source.split(|&b| b == b'\n').enumerate() {
        if text.first() == Some(&b'[') {
            assert_eq!(
                doc.levels()[line],
                FOLD_SECTION_HEADER,
                "line {} should be a fold header",
                line
            );
        } else if !text.is_empty() || line + 1 < doc.line_count() {
            assert_eq!(
                doc.levels()[line],
                FOLD_SECTION_BODY,
                "line {} should be a body line",
                line
            );
        }
    }
}

/// Wrapper that counts fold-level writes, to check the folder skips
/// redundant updates.
struct CountingDoc {
    inner: StyledDocument,
    writes: usize,
}

impl CharSource for CountingDoc {
    fn char_at(&self, pos: usize, fallback: u8) -> u8 {
        self.inner.char_at(pos, fallback)
    }

    fn line_of(&self, pos: usize) -> usize {
        self.inner.line_of(pos)
    }
}

impl StyleSource for CountingDoc {
    fn style_at(&self, pos: usize) -> TokenClass {
        self.inner.style_at(pos)
    }
}

impl FoldSink for CountingDoc {
    fn level_at(&self, line: usize) -> u32 {
        self.inner.level_at(line)
    }

    fn set_level(&mut self, line: usize, level: u32) {
        self.writes += 1;
        self.inner.set_level(line, level);
    }
}

#[test]
fn refolding_an_unchanged_document_writes_nothing() {
    let inner = tokenized(b"[A]\nx=1\ny=2\n[B]\nz=3\n");
    let len = inner.len();
    let mut doc = CountingDoc { inner, writes: 0 };

    fold(&mut doc, 0, len);
    let first_writes = doc.writes;
    assert!(first_writes > 0);

    fold(&mut doc, 0, len);
    assert_eq!(doc.writes, first_writes, "second fold pass must be write-free");
}

#[test]
fn folding_without_styles_yields_no_headers() {
    // Folding is defined over committed styles; an untokenized document
    // has none, so every line is a body line.
    let mut doc = StyledDocument::new(b"[A]\nx=1\n".to_vec());
    let len = doc.len();
    fold(&mut doc, 0, len);
    assert!(doc.levels()[..2].iter().all(|&l| l == FOLD_SECTION_BODY));
}
