//! One name per line (`ls -1ap`); a trailing `/` marks a directory.

use super::tokens::{is_mode, tokenize};
use super::{leaf_name, LineEntry};
use crate::config::ParserConfig;

/// A long-listing row has at least this many columns after the mode.
const LONG_ROW_TOKENS: usize = 5;

pub(crate) fn parse_line(line: &str, config: &ParserConfig) -> Option<LineEntry> {
    let line = line.trim();
    if looks_like_long_row(line) {
        return None;
    }

    let (raw, is_directory) = match line.strip_suffix('/') {
        Some(stripped) => (stripped, true),
        None => (line, false),
    };

    Some(LineEntry {
        name: leaf_name(raw, config)?,
        is_directory,
        size: None,
        modified: None,
    })
}

/// Rows of a long listing must not be mistaken for bare names.
fn looks_like_long_row(line: &str) -> bool {
    let tokens = tokenize(line);
    tokens.len() >= LONG_ROW_TOKENS && is_mode(tokens[0].text)
}
