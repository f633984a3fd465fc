//! Word lists: the nine keyword dictionaries the tokenizer classifies against.
//!
//! Membership is case-insensitive exact match. Lists are a pure external
//! capability: the tokenizer only ever asks "is this case-folded lexeme in
//! list N", so hosts (and tests) can swap in synthetic vocabularies freely.
//! A built-in default set covering the stock Rainmeter vocabulary is
//! embedded into the binary, one word per line, `;`-prefixed comments.

use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// The nine independently configurable lists, in the stable index order the
/// host uses to address them numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum WordListKind {
    /// Plain keywords (`Update`, `FontSize`, ...).
    Keywords = 0,
    /// Keywords valid with a numeric suffix (`Scale` for `Scale2`).
    NumericKeywords,
    /// Keywords whose value must come from a closed set (`StringAlign`).
    OptionKeywords,
    /// Valid values for option-accepting keywords (`Right`, `Bold`, ...).
    OptionValues,
    /// Recognized `!Bang` command names, without the `!`.
    Bangs,
    /// Built-in `#Variable#` names the host always provides.
    Variables,
    /// Keywords retained for backward compatibility.
    DeprecatedKeywords,
    /// Option values retained for backward compatibility.
    DeprecatedOptionValues,
    /// Bang names retained for backward compatibility.
    DeprecatedBangs,
}

/// Number of word lists.
pub const WORD_LIST_COUNT: usize = 9;

/// All list kinds, in index order.
pub const WORD_LIST_KINDS: &[WordListKind] = &[
    WordListKind::Keywords,
    WordListKind::NumericKeywords,
    WordListKind::OptionKeywords,
    WordListKind::OptionValues,
    WordListKind::Bangs,
    WordListKind::Variables,
    WordListKind::DeprecatedKeywords,
    WordListKind::DeprecatedOptionValues,
    WordListKind::DeprecatedBangs,
];

impl WordListKind {
    pub fn index(self) -> usize {
        self as usize
    }

    /// Stable name used by the CLI to address a list (`--words bangs=...`).
    pub fn name(self) -> &'static str {
        match self {
            WordListKind::Keywords => "keywords",
            WordListKind::NumericKeywords => "numeric-keywords",
            WordListKind::OptionKeywords => "option-keywords",
            WordListKind::OptionValues => "option-values",
            WordListKind::Bangs => "bangs",
            WordListKind::Variables => "variables",
            WordListKind::DeprecatedKeywords => "deprecated-keywords",
            WordListKind::DeprecatedOptionValues => "deprecated-option-values",
            WordListKind::DeprecatedBangs => "deprecated-bangs",
        }
    }

    pub fn from_name(name: &str) -> Option<WordListKind> {
        WORD_LIST_KINDS.iter().copied().find(|k| k.name() == name)
    }
}

impl fmt::Display for WordListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors from loading word lists at the CLI boundary.
#[derive(Debug)]
pub enum WordListError {
    Io(std::io::Error),
    UnknownKind(String),
}

impl fmt::Display for WordListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WordListError::Io(e) => write!(f, "Word list I/O error: {}", e),
            WordListError::UnknownKind(name) => {
                write!(f, "Unknown word list kind: {}", name)
            }
        }
    }
}

impl std::error::Error for WordListError {}

impl From<std::io::Error> for WordListError {
    fn from(err: std::io::Error) -> Self {
        WordListError::Io(err)
    }
}

/// One case-insensitive set of words.
///
/// Words are stored case-folded; membership queries fold their argument, so
/// `contains` is insensitive on both sides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordList {
    words: HashSet<String>,
}

impl WordList {
    pub fn new() -> Self {
        WordList::default()
    }

    /// Parse a list from text: words separated by whitespace or newlines,
    /// lines starting with `;` ignored as comments.
    pub fn from_text(text: &str) -> Self {
        let words = text
            .lines()
            .filter(|line| !line.trim_start().starts_with(';'))
            .flat_map(str::split_whitespace)
            .map(str::to_ascii_lowercase)
            .collect();
        WordList { words }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Case-insensitive membership test over raw lexeme bytes.
    ///
    /// Lexemes that are not valid UTF-8 cannot match anything and return
    /// `false` rather than failing; the tokenizer must tolerate arbitrary
    /// byte input.
    pub fn contains(&self, word: &[u8]) -> bool {
        let word = match std::str::from_utf8(word) {
            Ok(w) => w,
            Err(_) => return false,
        };
        if word.bytes().any(|b| b.is_ascii_uppercase()) {
            self.words.contains(&word.to_ascii_lowercase())
        } else {
            self.words.contains(word)
        }
    }
}

/// The full set of nine lists, indexed by [`WordListKind`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordListSet {
    lists: [WordList; WORD_LIST_COUNT],
}

impl WordListSet {
    /// An empty set. Nothing classifies as recognized against it.
    pub fn new() -> Self {
        WordListSet::default()
    }

    /// The embedded default Rainmeter vocabulary.
    pub fn default_set() -> &'static WordListSet {
        static DEFAULTS: Lazy<WordListSet> = Lazy::new(|| {
            let mut set = WordListSet::new();
            set.set(WordListKind::Keywords, include_str!("../../defaults/keywords.txt"));
            set.set(
                WordListKind::NumericKeywords,
                include_str!("../../defaults/numeric-keywords.txt"),
            );
            set.set(
                WordListKind::OptionKeywords,
                include_str!("../../defaults/option-keywords.txt"),
            );
            set.set(
                WordListKind::OptionValues,
                include_str!("../../defaults/option-values.txt"),
            );
            set.set(WordListKind::Bangs, include_str!("../../defaults/bangs.txt"));
            set.set(WordListKind::Variables, include_str!("../../defaults/variables.txt"));
            set.set(
                WordListKind::DeprecatedKeywords,
                include_str!("../../defaults/deprecated-keywords.txt"),
            );
            set.set(
                WordListKind::DeprecatedOptionValues,
                include_str!("../../defaults/deprecated-option-values.txt"),
            );
            set.set(
                WordListKind::DeprecatedBangs,
                include_str!("../../defaults/deprecated-bangs.txt"),
            );
            set
        });
        &DEFAULTS
    }

    pub fn get(&self, kind: WordListKind) -> &WordList {
        &self.lists[kind.index()]
    }

    /// Replace one list from text. Returns `true` if the incoming list
    /// differed from the current contents and was swapped in, `false` for a
    /// no-op update, so hosts can skip an invalidating re-lex.
    pub fn set(&mut self, kind: WordListKind, text: &str) -> bool {
        let incoming = WordList::from_text(text);
        if self.lists[kind.index()] == incoming {
            return false;
        }
        self.lists[kind.index()] = incoming;
        true
    }

    /// Replace one list from a file on disk.
    pub fn set_from_file(&mut self, kind: WordListKind, path: &Path) -> Result<bool, WordListError> {
        let text = std::fs::read_to_string(path)?;
        Ok(self.set(kind, &text))
    }

    /// Membership test against one list.
    pub fn contains(&self, kind: WordListKind, word: &[u8]) -> bool {
        self.lists[kind.index()].contains(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_is_case_insensitive() {
        let list = WordList::from_text("StringAlign\nFontSize");
        assert!(list.contains(b"stringalign"));
        assert!(list.contains(b"STRINGALIGN"));
        assert!(list.contains(b"FontSize"));
        assert!(!list.contains(b"fontface"));
    }

    #[test]
    fn comment_lines_are_skipped() {
        let list = WordList::from_text("; measure keywords\nupdate\n  ; indented comment\nauthor");
        assert_eq!(list.len(), 2);
        assert!(list.contains(b"update"));
        assert!(!list.contains(b";"));
    }

    #[test]
    fn invalid_utf8_never_matches() {
        let list = WordList::from_text("update");
        assert!(!list.contains(&[0xff, 0xfe]));
    }

    #[test]
    fn set_reports_change() {
        let mut set = WordListSet::new();
        assert!(set.set(WordListKind::Bangs, "refresh redraw"));
        // Same contents in different case and order: no-op.
        assert!(!set.set(WordListKind::Bangs, "Redraw\nREFRESH"));
        assert!(set.set(WordListKind::Bangs, "refresh"));
    }

    #[test]
    fn default_set_is_populated() {
        let set = WordListSet::default_set();
        for kind in WORD_LIST_KINDS {
            assert!(!set.get(*kind).is_empty(), "default list {} is empty", kind);
        }
        assert!(set.contains(WordListKind::Bangs, b"refresh"));
        assert!(set.contains(WordListKind::Variables, b"currentconfig"));
    }
}
