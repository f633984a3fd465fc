//! Main module for rainlex library functionality

pub mod document;
pub mod folding;
pub mod style;
pub mod tokenizer;
pub mod words;
