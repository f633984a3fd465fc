//! Command-line interface for rainlex
//! This binary tokenizes Rainmeter skin files for inspection: ANSI-coloured
//! terminal rendering, serialized span streams, and per-line fold levels.
//!
//! Usage:
//!   rainlex highlight `<path>`                      - Render the skin with ANSI colours
//!   rainlex spans `<path>` [--format `<format>`]      - Emit the committed style spans
//!   rainlex folds `<path>` [--format `<format>`]      - Emit per-line fold levels

use clap::{Arg, ArgAction, Command};
use crossterm::style::{Color, Stylize};
use serde::Serialize;
use std::path::Path;

use rainlex::rain::document::StyledDocument;
use rainlex::rain::folding::{fold, FOLD_HEADER};
use rainlex::rain::style::TokenClass;
use rainlex::rain::tokenizer::Tokenizer;
use rainlex::rain::words::{WordListKind, WordListSet};

fn main() {
    let words_arg = Arg::new("words")
        .long("words")
        .value_name("KIND=PATH")
        .help("Override one word list from a file (e.g. bangs=my-bangs.txt)")
        .action(ArgAction::Append);
    let format_arg = Arg::new("format")
        .long("format")
        .short('f')
        .help("Output format ('json' or 'yaml')")
        .default_value("json");

    let matches = Command::new("rainlex")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting Rainmeter skin files")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("highlight")
                .about("Render a skin file with ANSI colours")
                .arg(
                    Arg::new("path")
                        .help("Path to the skin file")
                        .required(true)
                        .index(1),
                )
                .arg(words_arg.clone()),
        )
        .subcommand(
            Command::new("spans")
                .about("Emit the committed style spans")
                .arg(
                    Arg::new("path")
                        .help("Path to the skin file")
                        .required(true)
                        .index(1),
                )
                .arg(format_arg.clone())
                .arg(words_arg.clone()),
        )
        .subcommand(
            Command::new("folds")
                .about("Emit per-line fold levels")
                .arg(
                    Arg::new("path")
                        .help("Path to the skin file")
                        .required(true)
                        .index(1),
                )
                .arg(format_arg)
                .arg(words_arg),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("highlight", sub)) => {
            let path = sub.get_one::<String>("path").unwrap();
            let words = load_words(sub.get_many::<String>("words"));
            handle_highlight_command(path, &words);
        }
        Some(("spans", sub)) => {
            let path = sub.get_one::<String>("path").unwrap();
            let format = sub.get_one::<String>("format").unwrap();
            let words = load_words(sub.get_many::<String>("words"));
            handle_spans_command(path, format, &words);
        }
        Some(("folds", sub)) => {
            let path = sub.get_one::<String>("path").unwrap();
            let format = sub.get_one::<String>("format").unwrap();
            let words = load_words(sub.get_many::<String>("words"));
            handle_folds_command(path, format, &words);
        }
        _ => unreachable!(),
    }
}

/// Build the word list set: embedded defaults plus any `kind=path` overrides.
fn load_words(overrides: Option<clap::parser::ValuesRef<'_, String>>) -> WordListSet {
    let mut words = WordListSet::default_set().clone();
    for spec in overrides.into_iter().flatten() {
        let (kind_name, path) = match spec.split_once('=') {
            Some(pair) => pair,
            None => {
                eprintln!("Error: expected KIND=PATH, got '{}'", spec);
                std::process::exit(1);
            }
        };
        let kind = match WordListKind::from_name(kind_name) {
            Some(kind) => kind,
            None => {
                eprintln!("Error: unknown word list kind '{}'", kind_name);
                std::process::exit(1);
            }
        };
        if let Err(e) = words.set_from_file(kind, Path::new(path)) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
    words
}

/// Tokenize a file into a styled document.
fn tokenize_file(path: &str, words: &WordListSet) -> StyledDocument {
    let bytes = std::fs::read(path).unwrap_or_else(|e| {
        eprintln!("Error reading file: {}", e);
        std::process::exit(1);
    });
    let mut doc = StyledDocument::new(bytes);
    let len = doc.len();
    Tokenizer::new(words).tokenize(&mut doc, 0, len);
    doc
}

fn handle_highlight_command(path: &str, words: &WordListSet) {
    let doc = tokenize_file(path, words);
    for span in doc.spans() {
        let text = String::from_utf8_lossy(&doc.text()[span.start..=span.end]).into_owned();
        match colour_of(span.class) {
            Some(colour) => print!("{}", text.with(colour)),
            None => print!("{}", text),
        }
    }
}

fn handle_spans_command(path: &str, format: &str, words: &WordListSet) {
    let doc = tokenize_file(path, words);
    print_serialized(doc.spans(), format);
}

/// One line's fold assignment, flattened for serialization.
#[derive(Debug, Serialize)]
struct FoldEntry {
    line: usize,
    level: u32,
    header: bool,
}

fn handle_folds_command(path: &str, format: &str, words: &WordListSet) {
    let mut doc = tokenize_file(path, words);
    let len = doc.len();
    fold(&mut doc, 0, len);
    let entries: Vec<FoldEntry> = doc
        .levels()
        .iter()
        .enumerate()
        .map(|(line, &level)| FoldEntry {
            line,
            level,
            header: level & FOLD_HEADER != 0,
        })
        .collect();
    print_serialized(&entries, format);
}

fn print_serialized<T: Serialize + ?Sized>(value: &T, format: &str) {
    let output = match format {
        "json" => serde_json::to_string_pretty(value).map_err(|e| e.to_string()),
        "yaml" => serde_yaml::to_string(value).map_err(|e| e.to_string()),
        other => Err(format!("unknown format '{}'", other)),
    };
    match output {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Terminal colour per category; `None` renders unstyled.
fn colour_of(class: TokenClass) -> Option<Color> {
    match class {
        TokenClass::Default => None,
        TokenClass::Section => Some(Color::Yellow),
        TokenClass::Comment => Some(Color::DarkGrey),
        TokenClass::Keyword => Some(Color::Cyan),
        TokenClass::DeprecatedKeyword => Some(Color::DarkYellow),
        TokenClass::Equals => Some(Color::White),
        TokenClass::ValidValue => Some(Color::Green),
        TokenClass::DeprecatedValidValue => Some(Color::DarkGreen),
        TokenClass::InvalidValue => Some(Color::Red),
        TokenClass::Bang => Some(Color::Magenta),
        TokenClass::DeprecatedBang => Some(Color::DarkMagenta),
        TokenClass::InternalVariable => Some(Color::Blue),
        TokenClass::ExternalVariable => Some(Color::DarkBlue),
    }
}
