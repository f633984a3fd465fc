//! Integration tests for the tokenizer over whole skin documents.
//!
//! Small documents are pinned with inline snapshots of the span stream;
//! the sample skins under `tests/samples/` are checked structurally so the
//! tests stay robust to vocabulary additions in the embedded defaults.

use rainlex::rain::document::StyledDocument;
use rainlex::rain::style::TokenClass;
use rainlex::rain::tokenizer::Tokenizer;
use std::fs;

fn tokenize(source: &[u8]) -> StyledDocument {
    let mut doc = StyledDocument::new(source.to_vec());
    let len = doc.len();
    Tokenizer::with_defaults().tokenize(&mut doc, 0, len);
    doc
}

/// Compact rendering of the committed span stream, one run per line.
fn render(doc: &StyledDocument) -> String {
    doc.spans()
        .iter()
        .map(|s| format!("{}..={} {}", s.start, s.end, s.class))
        .collect::<Vec<_>>()
        .join("\n")
}

fn read_sample_document(path: &str) -> Vec<u8> {
    fs::read(path).expect("Failed to read sample document")
}

#[test]
fn section_and_update_line() {
    let doc = tokenize(b"[Rainmeter]\nUpdate=1000\n");
    insta::assert_snapshot!(render(&doc), @r"
    0..=10 section
    11..=11 default
    12..=17 keyword
    18..=18 equals-sign
    19..=23 default
    ");
}

#[test]
fn option_line() {
    let doc = tokenize(b"StringAlign=Left\n");
    insta::assert_snapshot!(render(&doc), @r"
    0..=10 keyword
    11..=11 equals-sign
    12..=15 valid-option-value
    16..=16 default
    ");
}

#[test]
fn action_line_with_bang_and_variable() {
    let doc = tokenize(b"OnRefreshAction=!Refresh #CURRENTCONFIG#\n");
    insta::assert_snapshot!(render(&doc), @r"
    0..=14 keyword
    15..=15 equals-sign
    16..=23 bang-command
    24..=24 default
    25..=39 internal-variable
    40..=40 default
    ");
}

fn assert_covers(doc: &StyledDocument) {
    let spans = doc.spans();
    assert_eq!(spans.first().unwrap().start, 0);
    for pair in spans.windows(2) {
        assert_eq!(pair[1].start, pair[0].end + 1, "gap or overlap in spans");
    }
    assert_eq!(spans.last().unwrap().end, doc.len() - 1);
}

fn assert_line_starts(doc: &StyledDocument, source: &[u8]) {
    let mut offset = 0;
    for line in source.split(|&b| b == b'\n') {
        match line.first() {
            Some(b'[') => assert_eq!(
                doc.spans()
                    .iter()
                    .find(|s| s.start <= offset && offset <= s.end)
                    .unwrap()
                    .class,
                TokenClass::Section,
                "line at offset {} should open a section",
                offset
            ),
            Some(b';') => assert_eq!(
                doc.spans()
                    .iter()
                    .find(|s| s.start <= offset && offset <= s.end)
                    .unwrap()
                    .class,
                TokenClass::Comment,
                "line at offset {} should be a comment",
                offset
            ),
            _ => {}
        }
        offset += line.len() + 1;
    }
}

#[test]
fn cpu_sample_tokenizes_cleanly() {
    let source = read_sample_document("tests/samples/cpu.ini");
    let doc = tokenize(&source);
    assert_covers(&doc);
    assert_line_starts(&doc, &source);

    // Retokenizing the unchanged document yields identical assignments.
    let again = tokenize(&source);
    assert_eq!(doc.spans(), again.spans());
}

#[test]
fn clock_sample_tokenizes_cleanly() {
    let source = read_sample_document("tests/samples/clock.ini");
    let doc = tokenize(&source);
    assert_covers(&doc);
    assert_line_starts(&doc, &source);
}

#[test]
fn clock_sample_flags_deprecated_identifiers() {
    let source = read_sample_document("tests/samples/clock.ini");
    let doc = tokenize(&source);
    let classes: Vec<TokenClass> = doc.spans().iter().map(|s| s.class).collect();
    // UseD2D=1 is a deprecated keyword in the default vocabulary.
    assert!(classes.contains(&TokenClass::DeprecatedKeyword));
    // !Execute is a deprecated bang.
    assert!(classes.contains(&TokenClass::DeprecatedBang));
}

#[test]
fn reset_and_retokenize_is_idempotent() {
    let source = read_sample_document("tests/samples/cpu.ini");
    let mut doc = StyledDocument::new(source);
    let len = doc.len();
    Tokenizer::with_defaults().tokenize(&mut doc, 0, len);
    let first = doc.spans().to_vec();

    doc.reset_styles();
    Tokenizer::with_defaults().tokenize(&mut doc, 0, len);
    assert_eq!(doc.spans(), first.as_slice());
}
