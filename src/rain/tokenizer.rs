//! The single-pass tokenizer: a hand-written finite-state machine that
//! classifies every byte of a skin file into a [`TokenClass`].
//!
//! Structure:
//!     One scan loop advances a cursor over the character source. Each
//!     iteration dispatches on the current state to a per-state handler
//!     that inspects the current byte, emits style runs through the sink,
//!     and returns the next state. A few handlers adjust the cursor
//!     themselves: backing up one byte to re-read it, skipping blanks
//!     after a recognized option keyword, or rewinding to a saved index
//!     when a nested `[#Var#]` reference closes.
//!
//! Lexeme accumulation:
//!     Candidate tokens (keywords, option values, bang names, variable
//!     names) are case-folded into a fixed 128-byte buffer. A token longer
//!     than the buffer aborts accumulation: the keyword and option paths
//!     fall into a sink state that discards the rest of the line with
//!     default colouring, the bang and variable paths drop back to plain
//!     value scanning. Either way output stays deterministic.
//!
//! End of line and end of file:
//!     The final byte of the scanned range is processed as a NUL so every
//!     state closes out; states that still need the true final byte
//!     (option, bang, variable closers) read it back through the source's
//!     sentinel-guarded lookahead. Classified runs that end at a line
//!     terminator exclude the terminator bytes: two for `\r\n`, one for a
//!     bare `\n`, none at end of file.

use crate::rain::style::{StyleSink, TokenClass};
use crate::rain::words::{WordListKind, WordListSet};
use crate::rain::document::CharSource;

/// Capacity of the lexeme buffer. Tokens longer than this are never
/// classified; see the module docs for the overflow policy.
pub const LEXEME_CAPACITY: usize = 128;

pub(crate) fn fold_case(b: u8) -> u8 {
    b.to_ascii_lowercase()
}

pub(crate) fn is_blank(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

/// Fixed-capacity accumulator for the current candidate token.
///
/// Holds a case-folded copy of the lexeme. `push` reports whether the byte
/// fit; a `false` return is the caller's cue to bail into its overflow
/// state.
#[derive(Debug)]
pub(crate) struct LexemeBuffer {
    bytes: [u8; LEXEME_CAPACITY],
    len: usize,
}

impl LexemeBuffer {
    pub(crate) fn new() -> Self {
        LexemeBuffer {
            bytes: [0; LEXEME_CAPACITY],
            len: 0,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.len = 0;
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append a byte. Returns `false` (and appends nothing) when full.
    pub(crate) fn push(&mut self, b: u8) -> bool {
        if self.len < LEXEME_CAPACITY {
            self.bytes[self.len] = b;
            self.len += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        if len < self.len {
            self.len = len;
        }
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// The accumulated bytes from `begin` onward (an option's value part).
    pub(crate) fn bytes_from(&self, begin: usize) -> &[u8] {
        &self.bytes[begin.min(self.len)..self.len]
    }

    pub(crate) fn trim_trailing_blanks(&mut self) {
        while self.len > 0 && is_blank(self.bytes[self.len - 1]) {
            self.len -= 1;
        }
    }

    /// Length of the run of ASCII digits at the end of the buffer.
    pub(crate) fn trailing_digit_run(&self) -> usize {
        self.as_bytes()
            .iter()
            .rev()
            .take_while(|b| b.is_ascii_digit())
            .count()
    }

    /// `*...*` wrapping marks an intentionally escaped token.
    pub(crate) fn is_star_escaped(&self) -> bool {
        self.len >= 2 && self.bytes[0] == b'*' && self.bytes[self.len - 1] == b'*'
    }
}

/// Lexical context of the scan cursor. Exactly one is live per position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Line start / between tokens.
    Default,
    /// After `;` until end of line.
    Comment,
    /// Inside `[...]` until `]` or end of line.
    Section,
    /// Accumulating an identifier before `=`.
    Keyword,
    /// Accumulating the value of an option-accepting keyword.
    Option,
    /// Generic value text after `=`.
    Value,
    /// Accumulating a `!Command` name.
    Bang,
    /// Accumulating a `#Name#` or `[#Name#]` reference.
    Variable,
    /// Overflow/recovery sink: discard to end of line.
    LineEnd,
}

/// The tokenizer. Borrows the word lists for the duration of its calls; all
/// scan state is local to one [`Tokenizer::tokenize`] invocation, so a
/// tokenizer is freely reusable across documents.
pub struct Tokenizer<'w> {
    words: &'w WordListSet,
}

impl<'w> Tokenizer<'w> {
    pub fn new(words: &'w WordListSet) -> Self {
        Tokenizer { words }
    }

    /// A tokenizer over the embedded default Rainmeter vocabulary.
    pub fn with_defaults() -> Tokenizer<'static> {
        Tokenizer::new(WordListSet::default_set())
    }

    /// Scan `length` bytes starting at `start`, committing style runs into
    /// the sink. Idempotent for identical input and word lists; tolerates
    /// arbitrary bytes and always terminates in linear time.
    pub fn tokenize<D: CharSource + StyleSink>(&self, doc: &mut D, start: usize, length: usize) {
        if length == 0 {
            return;
        }
        doc.start_segment(start);

        let mut scan = Scan {
            words: self.words,
            doc,
            pos: start,
            end: start + length,
            buf: LexemeBuffer::new(),
            digits: 0,
            begin_value: 0,
            is_nested: false,
            state_idx: start,
        };

        let mut state = State::Default;
        while scan.pos < scan.end {
            let is_eof = scan.pos == scan.end - 1;
            // The final byte is processed as NUL so every state closes out;
            // handlers that need it read it back through `char_at`.
            let ch = if is_eof { 0 } else { scan.doc.char_at(scan.pos, 0) };

            state = match state {
                State::Default => scan.scan_default(ch),
                State::Comment => scan.scan_comment(ch),
                State::Section => scan.scan_section(ch),
                State::Keyword => scan.scan_keyword(ch),
                State::Option => scan.scan_option(ch, is_eof),
                State::Value => scan.scan_value(ch),
                State::Bang => scan.scan_bang(ch, is_eof),
                State::Variable => scan.scan_variable(ch, is_eof),
                State::LineEnd => scan.scan_line_end(ch),
            };
            scan.pos += 1;
        }

        // Close any run the final iteration left pending (an empty variable
        // reference closing exactly at EOF commits nothing), so committed
        // spans always cover the range exactly.
        scan.doc.colour_to(scan.end - 1, TokenClass::Default);
        scan.doc.flush();
    }
}

/// Working state of one tokenize call.
struct Scan<'w, 'd, D> {
    words: &'w WordListSet,
    doc: &'d mut D,
    /// Scan cursor: absolute offset into the source.
    pos: usize,
    /// One past the last offset in range.
    end: usize,
    buf: LexemeBuffer,
    /// Digit bytes seen while accumulating the current keyword.
    digits: usize,
    /// Buffer offset where an option's value part begins.
    begin_value: usize,
    /// Inside a variable reference opened via `[#`.
    is_nested: bool,
    /// Saved cursor position of the `[` opener, for nested-close rewinds.
    state_idx: usize,
}

impl<D: CharSource + StyleSink> Scan<'_, '_, D> {
    /// Terminator width behind the cursor: 2 for `\r\n`, 1 for a bare `\n`
    /// or any mid-line delimiter, 0 at end of file. Classified runs end
    /// `eol_width` bytes before the cursor so terminators keep default
    /// colouring.
    fn eol_width(&self, is_eof: bool) -> usize {
        let cur = self.doc.char_at(self.pos, 0);
        if cur == b'\n' {
            if self.pos > 0 && self.doc.char_at(self.pos - 1, 0) == b'\r' {
                2
            } else {
                1
            }
        } else if is_eof {
            0
        } else {
            1
        }
    }

    /// At the forced-NUL final iteration, pull the true final byte into the
    /// lexeme so tokens flush against a file that ends without a newline.
    /// Terminator and sentinel bytes are never appended; the lookahead goes
    /// through the sentinel-guarded source, so it cannot overrun.
    fn consume_final_byte(&mut self, is_eof: bool, ch: u8) {
        if is_eof && ch == 0 {
            let last = self.doc.char_at(self.pos, 0);
            if !matches!(last, 0 | b'\r' | b'\n') {
                self.buf.push(fold_case(last));
                self.pos += 1;
            }
        }
    }

    fn scan_default(&mut self, ch: u8) -> State {
        match ch {
            0 | b'\r' | b'\n' => {
                self.doc.colour_to(self.pos, TokenClass::Default);
                State::Default
            }
            b'[' => {
                self.doc.colour_to(self.pos, TokenClass::Section);
                State::Section
            }
            b';' => {
                self.doc.colour_to(self.pos, TokenClass::Comment);
                State::Comment
            }
            b'\t' | b' ' => State::Default,
            _ if ch.is_ascii_alphabetic() || ch == b'@' => {
                self.buf.clear();
                self.digits = 0;
                self.buf.push(fold_case(ch));
                State::Keyword
            }
            _ => State::Value,
        }
    }

    fn scan_comment(&mut self, ch: u8) -> State {
        match ch {
            b'\r' | b'\n' => {
                self.doc.colour_to(self.pos, TokenClass::Default);
                State::Default
            }
            _ => {
                self.doc.colour_to(self.pos, TokenClass::Comment);
                State::Comment
            }
        }
    }

    fn scan_section(&mut self, ch: u8) -> State {
        match ch {
            b'\r' | b'\n' => {
                self.doc.colour_to(self.pos, TokenClass::Default);
                State::Default
            }
            b']' => {
                // The closer is still part of the section; anything after
                // it on the line is discarded as default.
                self.doc.colour_to(self.pos, TokenClass::Section);
                State::LineEnd
            }
            _ => {
                self.doc.colour_to(self.pos, TokenClass::Section);
                State::Section
            }
        }
    }

    fn scan_keyword(&mut self, ch: u8) -> State {
        match ch {
            0 | b'\r' | b'\n' => {
                // No `=` on this line: not a key/value line after all.
                self.doc.colour_to(self.pos, TokenClass::Default);
                State::Default
            }
            b'=' => self.classify_keyword(),
            _ => {
                if self.buf.push(fold_case(ch)) {
                    if ch.is_ascii_digit() {
                        self.digits += 1;
                    }
                    State::Keyword
                } else {
                    State::LineEnd
                }
            }
        }
    }

    /// Classification at the `=` delimiter, in priority order: plain
    /// keywords (including the `@include` family), option-accepting
    /// keywords, numeric-suffixed variants, deprecated identifiers.
    /// Deprecation wins over current membership wherever both apply.
    fn classify_keyword(&mut self) -> State {
        let words = self.words;
        self.buf.trim_trailing_blanks();

        if words.contains(WordListKind::Keywords, self.buf.as_bytes())
            || self.buf.as_bytes().starts_with(b"@include")
        {
            // Deprecation wins when an identifier is in both sets.
            let class = if words.contains(WordListKind::DeprecatedKeywords, self.buf.as_bytes()) {
                TokenClass::DeprecatedKeyword
            } else {
                TokenClass::Keyword
            };
            self.doc.colour_to(self.pos - 1, class);
            self.doc.colour_to(self.pos, TokenClass::Equals);
            return State::Value;
        }

        if words.contains(WordListKind::OptionKeywords, self.buf.as_bytes()) {
            let class = if words.contains(WordListKind::DeprecatedKeywords, self.buf.as_bytes()) {
                TokenClass::DeprecatedKeyword
            } else {
                TokenClass::Keyword
            };
            self.doc.colour_to(self.pos - 1, class);
            self.doc.colour_to(self.pos, TokenClass::Equals);

            // Delimit "keyword so far" from "value so far" in the buffer.
            self.buf.push(b'=');
            self.begin_value = self.buf.len();

            // Swallow leading blanks so value accumulation starts at the
            // first non-blank byte.
            while is_blank(self.doc.char_at(self.pos + 1, 0)) {
                self.pos += 1;
            }
            return State::Option;
        }

        if self.digits > 0 {
            // Digits elsewhere in the identifier: the full form may itself
            // be a deprecated keyword (UseD2D).
            if words.contains(WordListKind::DeprecatedKeywords, self.buf.as_bytes()) {
                self.doc.colour_to(self.pos - 1, TokenClass::DeprecatedKeyword);
                self.doc.colour_to(self.pos, TokenClass::Equals);
                return State::Value;
            }

            // Strip the trailing digit run and retest for words like ScaleN.
            let stripped_len = self.buf.len() - self.buf.trailing_digit_run();
            self.buf.truncate(stripped_len);
            self.digits = 0;

            // Enumerated Command1, Command2, ... options are exempt from
            // matching the deprecated bare Command keyword.
            if words.contains(WordListKind::DeprecatedKeywords, self.buf.as_bytes())
                && !self.buf.as_bytes().starts_with(b"command")
            {
                self.doc.colour_to(self.pos - 1, TokenClass::DeprecatedKeyword);
            } else if words.contains(WordListKind::NumericKeywords, self.buf.as_bytes()) {
                self.doc.colour_to(self.pos - 1, TokenClass::Keyword);
            } else {
                return State::Value;
            }
            self.doc.colour_to(self.pos, TokenClass::Equals);
            return State::Value;
        }

        if words.contains(WordListKind::DeprecatedKeywords, self.buf.as_bytes()) {
            self.doc.colour_to(self.pos - 1, TokenClass::DeprecatedKeyword);
            self.doc.colour_to(self.pos, TokenClass::Equals);
        }
        State::Value
    }

    fn scan_option(&mut self, ch: u8, is_eof: bool) -> State {
        match ch {
            b'#' => {
                self.buf.clear();
                self.is_nested = false;
                self.doc.colour_to(self.pos - 1, TokenClass::Default);
                State::Variable
            }
            b'[' if self.doc.char_at(self.pos + 1, 0) == b'#' => {
                self.is_nested = true;
                self.buf.clear();
                self.doc.colour_to(self.pos - 1, TokenClass::Default);
                self.state_idx = self.pos;
                self.pos += 1; // consume the confirmed `#`
                State::Variable
            }
            0 | b'\r' | b'\n' => {
                self.consume_final_byte(is_eof, ch);
                self.classify_option(is_eof)
            }
            _ => {
                if self.buf.push(fold_case(ch)) {
                    State::Option
                } else {
                    State::LineEnd
                }
            }
        }
    }

    /// Classification of an option's value at end of line: valid,
    /// deprecated-valid, a bracketed indirection left neutral, or invalid.
    fn classify_option(&mut self, is_eof: bool) -> State {
        let words = self.words;
        self.buf.trim_trailing_blanks();

        let value = self.buf.bytes_from(self.begin_value);
        let class = if words.contains(WordListKind::OptionValues, value) {
            TokenClass::ValidValue
        } else if words.contains(WordListKind::DeprecatedOptionValues, value) {
            TokenClass::DeprecatedValidValue
        } else if value.first() == Some(&b'[') && value.last() == Some(&b']') && value.len() >= 2 {
            // An indirect reference like `[ParentMeasure]`: not validated.
            TokenClass::Default
        } else {
            TokenClass::InvalidValue
        };

        let width = self.eol_width(is_eof);
        self.doc.colour_to(self.pos.saturating_sub(width), class);
        self.doc.colour_to(self.pos, TokenClass::Default);

        self.begin_value = 0;
        self.buf.clear();
        State::Default
    }

    fn scan_value(&mut self, ch: u8) -> State {
        self.is_nested = false;
        match ch {
            b'#' => {
                self.buf.clear();
                self.doc.colour_to(self.pos - 1, TokenClass::Default);
                State::Variable
            }
            b'[' => {
                if self.doc.char_at(self.pos + 1, 0) == b'#' {
                    self.is_nested = true;
                    self.buf.clear();
                    self.doc.colour_to(self.pos - 1, TokenClass::Default);
                    self.state_idx = self.pos;
                    self.pos += 1;
                    State::Variable
                } else {
                    State::Value
                }
            }
            b'!' => {
                self.buf.clear();
                self.doc.colour_to(self.pos - 1, TokenClass::Default);
                State::Bang
            }
            0 | b'\r' | b'\n' => {
                self.doc.colour_to(self.pos, TokenClass::Default);
                State::Default
            }
            _ => {
                self.doc.colour_to(self.pos, TokenClass::Default);
                State::Value
            }
        }
    }

    fn scan_bang(&mut self, ch: u8, is_eof: bool) -> State {
        match ch {
            0 | b'\n' | b' ' | b'[' | b']' => {
                self.consume_final_byte(is_eof, ch);

                let words = self.words;
                // `!RainmeterRefresh` and `!Refresh` classify identically.
                let name = self.buf.as_bytes();
                let name = name.strip_prefix(b"rainmeter" as &[u8]).unwrap_or(name);

                let width = self.eol_width(is_eof);
                if words.contains(WordListKind::Bangs, name) {
                    self.doc
                        .colour_to(self.pos.saturating_sub(width), TokenClass::Bang);
                } else if words.contains(WordListKind::DeprecatedBangs, name) {
                    self.doc
                        .colour_to(self.pos.saturating_sub(width), TokenClass::DeprecatedBang);
                }
                self.doc.colour_to(self.pos, TokenClass::Default);
                self.buf.clear();

                if ch == b'\n' {
                    State::Default
                } else {
                    State::Value
                }
            }
            b'\r' => State::Bang,
            b'#' => {
                self.buf.clear();
                self.is_nested = false;
                self.doc.colour_to(self.pos - 1, TokenClass::Default);
                State::Variable
            }
            _ => {
                if self.buf.push(fold_case(ch)) {
                    State::Bang
                } else {
                    State::Value
                }
            }
        }
    }

    fn scan_variable(&mut self, ch: u8, is_eof: bool) -> State {
        let mut ch = ch;
        if is_eof {
            // A closer as the true final byte still closes the reference.
            let last = self.doc.char_at(self.pos, 0);
            if last == b'#' || last == b']' {
                ch = last;
                self.pos += 1;
            }
        }

        match ch {
            0 | b'\r' | b'\n' => {
                self.doc.colour_to(self.pos, TokenClass::Default);
                State::Default
            }
            b'#' if self.is_nested => {
                // Closing a `[#...#` run: if the closer abuts the opener,
                // re-read just the opener; otherwise rewind to it and
                // reprocess the bracket region as a plain reference.
                if self.doc.char_at(self.pos - 1, 0) == b'[' {
                    self.pos -= 1;
                } else {
                    self.pos = self.state_idx;
                }
                State::Value
            }
            b'#' | b']' => {
                if !self.is_nested && ch == b']' {
                    return State::Value;
                }
                if !self.buf.is_empty() {
                    let words = self.words;
                    let class = if words.contains(WordListKind::Variables, self.buf.as_bytes()) {
                        TokenClass::InternalVariable
                    } else if self.buf.is_star_escaped() {
                        // Escaped variable, don't highlight.
                        TokenClass::Default
                    } else {
                        TokenClass::ExternalVariable
                    };
                    self.doc.colour_to(self.pos, class);
                    self.buf.clear();
                }
                if is_eof {
                    State::Default
                } else {
                    State::Value
                }
            }
            b'[' => {
                self.pos -= 1; // re-read the bracket as value text
                State::Value
            }
            b' ' => State::Value,
            _ => {
                if self.buf.push(fold_case(ch)) {
                    State::Variable
                } else {
                    State::Value
                }
            }
        }
    }

    fn scan_line_end(&mut self, ch: u8) -> State {
        self.doc.colour_to(self.pos, TokenClass::Default);
        match ch {
            0 | b'\r' | b'\n' => State::Default,
            _ => State::LineEnd,
        }
    }
}
