//! Long listings whose date sits at no fixed column.
//!
//! Covers toybox `ls -la` (link count present) and the older toolbox `ls -l`
//! (no link count, no size for directories):
//!
//! ```text
//! drwxrwx--x 4 system sdcard_rw 4096 2025-06-18 21:15 Alarms
//! -rw-rw---- root sdcard_r 1234 2014-01-01 12:00 notes.txt
//! ```
//!
//! A `±HHMM` zone right after the time belongs to the timestamp. Full-time
//! rows land here when device columns (`1, 3`) shift the date.

use super::tokens::{
    is_date, is_time, is_timezone, mode_is_directory, rest_after, size_before, tokenize,
};
use super::{leaf_name, LineEntry};
use crate::config::ParserConfig;

/// How far back from the date the size column may sit.
const SIZE_SCAN: usize = 6;

pub(crate) fn parse_line(line: &str, config: &ParserConfig) -> Option<LineEntry> {
    let tokens = tokenize(line);
    let date = tokens.iter().skip(1).position(|t| is_date(t.text))? + 1;
    let time = tokens.get(date + 1)?;
    if !is_time(time.text) {
        return None;
    }

    let mut modified = format!("{} {}", tokens[date].text, time.text);
    let mut last = date + 1;
    if let Some(zone) = tokens.get(last + 1).filter(|t| is_timezone(t.text)) {
        modified.push(' ');
        modified.push_str(zone.text);
        last += 1;
    }

    let name = leaf_name(rest_after(line, &tokens, last)?, config)?;

    Some(LineEntry {
        name,
        is_directory: mode_is_directory(tokens[0].text),
        size: size_before(&tokens, date, SIZE_SCAN),
        modified: Some(modified),
    })
}
