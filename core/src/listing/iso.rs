//! Listings that print the modification time as one ISO-8601 token, as
//! produced by `ls --time-style=+%Y-%m-%dT%H:%M:%S` and some busybox builds.

use super::tokens::{is_iso_timestamp, mode_is_directory, rest_after, size_before, tokenize};
use super::{leaf_name, LineEntry};
use crate::config::ParserConfig;

const SIZE_SCAN: usize = 6;

pub(crate) fn parse_line(line: &str, config: &ParserConfig) -> Option<LineEntry> {
    let tokens = tokenize(line);
    let stamp = tokens.iter().skip(1).position(|t| is_iso_timestamp(t.text))? + 1;
    let name = leaf_name(rest_after(line, &tokens, stamp)?, config)?;

    Some(LineEntry {
        name,
        is_directory: mode_is_directory(tokens[0].text),
        size: size_before(&tokens, stamp, SIZE_SCAN),
        modified: Some(tokens[stamp].text.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Option<LineEntry> {
        parse_line(line, &ParserConfig::default())
    }

    #[test]
    fn iso_timestamp_line() {
        let entry =
            parse("-rw-rw---- 1 u0_a317 media_rw 88 2025-06-18T21:15:08 notes.txt").unwrap();
        assert_eq!(entry.name, "notes.txt");
        assert!(!entry.is_directory);
        assert_eq!(entry.size, Some(88));
        assert_eq!(entry.modified.as_deref(), Some("2025-06-18T21:15:08"));
    }

    #[test]
    fn directory_with_zone_suffix() {
        let entry = parse("drwxr-xr-x 3 root root 4096 2025-06-18T21:15:08+09:00 Music").unwrap();
        assert!(entry.is_directory);
        assert_eq!(entry.modified.as_deref(), Some("2025-06-18T21:15:08+09:00"));
    }

    #[test]
    fn rejects_split_date_and_time() {
        assert!(parse("drwxr-xr-x 3 root root 4096 2025-06-18 21:15 Music").is_none());
        assert!(parse("drwxr-xr-x 3 root root 4096 2025-06-18T21:15:08").is_none());
    }
}
