//! Whitespace tokenizer and token-shape checks shared by every stage.

use std::sync::LazyLock;

use regex::Regex;

/// `ls` mode column: type character, nine permission characters and an
/// optional ACL / SELinux marker.
static MODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-dlcbpsD?][-rwxsStTlL]{9}[.@+]?$").unwrap());

static TIME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{1,2}:\d{2}(:\d{2}(\.\d+)?)?$").unwrap());

static ISO_TIMESTAMP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}(:\d{2}(\.\d+)?)?(Z|[+-]\d{2}:?\d{2})?$").unwrap()
});

/// One whitespace-delimited token and the byte offset where it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    pub text: &'a str,
    pub start: usize,
}

impl Token<'_> {
    #[cfg(test)]
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }
}

/// Split a line on whitespace, remembering offsets so a name with
/// embedded runs of spaces can be recovered verbatim.
pub(crate) fn tokenize(line: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = None;
    for (idx, ch) in line.char_indices() {
        match (ch.is_whitespace(), start) {
            (true, Some(s)) => {
                tokens.push(Token {
                    text: &line[s..idx],
                    start: s,
                });
                start = None;
            }
            (false, None) => start = Some(idx),
            _ => {}
        }
    }
    if let Some(s) = start {
        tokens.push(Token {
            text: &line[s..],
            start: s,
        });
    }
    tokens
}

/// Text of `line` after the token at `index`, with the separating
/// whitespace removed. Internal spacing of the remainder is preserved.
pub(crate) fn rest_after<'a>(line: &'a str, tokens: &[Token<'a>], index: usize) -> Option<&'a str> {
    let next = tokens.get(index + 1)?;
    let rest = line[next.start..].trim_end();
    if rest.is_empty() {
        None
    } else {
        Some(rest)
    }
}

/// `true` for the aggregate summary header, e.g. `total 24`.
pub(crate) fn is_summary_line(trimmed: &str, summary_token: &str) -> bool {
    trimmed
        .strip_prefix(summary_token)
        .and_then(|rest| rest.chars().next())
        .is_some_and(char::is_whitespace)
}

/// Drop a symlink target: keep only the text before the first marker.
pub(crate) fn strip_symlink_target<'a>(name: &'a str, marker: &str) -> &'a str {
    match name.find(marker) {
        Some(pos) => &name[..pos],
        None => name,
    }
}

/// `YYYY-MM-DD`: exactly 10 characters with `-` at offsets 4 and 7.
pub(crate) fn is_date(token: &str) -> bool {
    let bytes = token.as_bytes();
    bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit())
}

/// `±HHMM`: exactly 5 characters starting with a sign.
pub(crate) fn is_timezone(token: &str) -> bool {
    let bytes = token.as_bytes();
    bytes.len() == 5
        && (bytes[0] == b'+' || bytes[0] == b'-')
        && bytes[1..].iter().all(u8::is_ascii_digit)
}

/// `H:MM`, `HH:MM:SS` or `HH:MM:SS.fraction`.
pub(crate) fn is_time(token: &str) -> bool {
    TIME_PATTERN.is_match(token)
}

pub(crate) fn is_iso_timestamp(token: &str) -> bool {
    ISO_TIMESTAMP_PATTERN.is_match(token)
}

pub(crate) fn is_mode(token: &str) -> bool {
    MODE_PATTERN.is_match(token)
}

/// Directory flag from the first character of a mode token.
pub(crate) fn mode_is_directory(token: &str) -> bool {
    token.starts_with('d')
}

/// Parse a byte count. Anything but plain ASCII digits yields `None`.
pub(crate) fn parse_size(token: &str) -> Option<u64> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// Scan backward from just before `index`, at most `limit` tokens and never
/// reaching the mode token at index 0, for the first numeric token.
///
/// Device rows carry `major, minor` instead of a size; any token with a
/// comma ends the scan with no size.
pub(crate) fn size_before(tokens: &[Token<'_>], index: usize, limit: usize) -> Option<u64> {
    let lowest = index.saturating_sub(limit).max(1);
    for i in (lowest..index).rev() {
        let text = tokens[i].text;
        if text.contains(',') {
            return None;
        }
        if let Some(size) = parse_size(text) {
            if tokens[i - 1].text.ends_with(',') {
                return None;
            }
            return Some(size);
        }
    }
    None
}
