//! Full-time listings with a separate zone token.
//!
//! ```text
//! drwxrwx--x 4 u0_a317 media_rw 3452 2025-06-18 21:15:08.027999994 +0900 Alarms
//! ```
//!
//! Columns 5-7 are date, time and zone; the name is everything after the
//! zone column.

use super::tokens::{is_date, is_timezone, mode_is_directory, parse_size, rest_after, tokenize};
use super::{leaf_name, LineEntry};
use crate::config::ParserConfig;

const MIN_TOKENS: usize = 9;
const SIZE: usize = 4;
const DATE: usize = 5;
const TIME: usize = 6;
const ZONE: usize = 7;

pub(crate) fn parse_line(line: &str, config: &ParserConfig) -> Option<LineEntry> {
    let tokens = tokenize(line);
    if tokens.len() < MIN_TOKENS {
        return None;
    }
    if !is_date(tokens[DATE].text) || !is_timezone(tokens[ZONE].text) {
        return None;
    }

    let name = leaf_name(rest_after(line, &tokens, ZONE)?, config)?;
    let modified = format!(
        "{} {} {}",
        tokens[DATE].text, tokens[TIME].text, tokens[ZONE].text
    );

    Some(LineEntry {
        name,
        is_directory: mode_is_directory(tokens[0].text),
        size: parse_size(tokens[SIZE].text),
        modified: Some(modified),
    })
}
