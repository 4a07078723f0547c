//! Parsing of captured `ls` output into [`DirEntry`] lists.
//!
//! Device shells disagree on column layout and timestamp format, so parsing
//! is a chain of stages ([`ListingFormat::CHAIN`]), richest format first.
//! Every stage is a pure function of `(capture, base path)`. A stage either
//! recognizes enough of the capture to be trusted or cedes to the next one;
//! results are never merged across stages.
//!
//! Lines a stage does not recognize are skipped, never reported as errors.
//! Whether a stage is trusted is decided by its coverage: recognized lines
//! over candidate lines (non-blank, non-summary), compared against
//! [`ParserConfig::min_coverage`].

pub mod capture;
mod embedded_date;
mod iso;
mod names;
mod timezone;
mod tokens;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::ParserConfig;
use crate::errors::ListingError;
use crate::files::{sort_entries, BasePath, DirEntry};

/// One listing dialect, i.e. one stage of the parser chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListingFormat {
    /// `ls -la --full-time`: date, time and `±HHMM` zone as three columns.
    TimezoneToken,
    /// `ls -la` / `ls -l`: a `YYYY-MM-DD` date at any column, then the time.
    EmbeddedDate,
    /// A single ISO-8601 timestamp column.
    IsoTimestamp,
    /// `ls -1ap`: bare names, directories marked with a trailing `/`.
    NamesOnly,
}

type LineParser = fn(&str, &ParserConfig) -> Option<LineEntry>;

impl ListingFormat {
    /// Every stage, richest format first.
    pub const CHAIN: [ListingFormat; 4] = [
        ListingFormat::TimezoneToken,
        ListingFormat::EmbeddedDate,
        ListingFormat::IsoTimestamp,
        ListingFormat::NamesOnly,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ListingFormat::TimezoneToken => "timezone-token",
            ListingFormat::EmbeddedDate => "embedded-date",
            ListingFormat::IsoTimestamp => "iso-timestamp",
            ListingFormat::NamesOnly => "names-only",
        }
    }

    fn line_parser(self) -> LineParser {
        match self {
            ListingFormat::TimezoneToken => timezone::parse_line,
            ListingFormat::EmbeddedDate => embedded_date::parse_line,
            ListingFormat::IsoTimestamp => iso::parse_line,
            ListingFormat::NamesOnly => names::parse_line,
        }
    }

    /// Run this stage over a whole capture.
    ///
    /// The returned [`Listing`] is already sorted and carries the line
    /// counts needed to judge coverage; it may hold zero entries.
    pub fn parse(self, raw: &str, base: &BasePath, config: &ParserConfig) -> Listing {
        let parse_line = self.line_parser();
        let mut listing = Listing::new(self);

        for line in raw.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || tokens::is_summary_line(trimmed, &config.summary_token) {
                continue;
            }
            listing.candidate_lines += 1;

            let Some(parsed) = parse_line(trimmed, config) else {
                trace!(format = %self, line = trimmed, "Skipping unrecognized line");
                continue;
            };
            listing.recognized_lines += 1;

            if config.skip_dot_entries && (parsed.name == "." || parsed.name == "..") {
                continue;
            }
            listing.entries.push(DirEntry::new(
                base,
                parsed.name,
                parsed.is_directory,
                parsed.size,
                parsed.modified,
            ));
        }

        sort_entries(&mut listing.entries);
        debug!(
            format = %self,
            candidates = listing.candidate_lines,
            recognized = listing.recognized_lines,
            entries = listing.entries.len(),
            "Listing stage finished"
        );
        listing
    }
}

impl fmt::Display for ListingFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingFormat {
    type Err = ListingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ListingFormat::CHAIN
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| ListingError::UnknownFormat(s.to_string()))
    }
}

/// Fields recovered from one line, before the path is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LineEntry {
    pub name: String,
    pub is_directory: bool,
    pub size: Option<u64>,
    pub modified: Option<String>,
}

/// Turn a raw name column into a leaf name.
///
/// Drops a symlink target and rejects names that are empty or still contain
/// a path separator.
pub(crate) fn leaf_name(raw: &str, config: &ParserConfig) -> Option<String> {
    let name = tokens::strip_symlink_target(raw, &config.symlink_marker).trim_end();
    if name.is_empty() || name.contains('/') {
        return None;
    }
    Some(name.to_string())
}

/// The result of running one stage over one capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub format: ListingFormat,
    /// Directories first, then case-insensitive name order.
    pub entries: Vec<DirEntry>,
    /// Non-blank lines other than the summary header.
    pub candidate_lines: usize,
    /// Candidate lines the stage understood, including `.` and `..`.
    pub recognized_lines: usize,
}

impl Listing {
    fn new(format: ListingFormat) -> Self {
        Self {
            format,
            entries: Vec::new(),
            candidate_lines: 0,
            recognized_lines: 0,
        }
    }

    /// Fraction of candidate lines the stage recognized; `1.0` when the
    /// capture had no candidate lines at all.
    pub fn coverage(&self) -> f64 {
        if self.candidate_lines == 0 {
            1.0
        } else {
            self.recognized_lines as f64 / self.candidate_lines as f64
        }
    }

    /// Whether the stage understood enough of a non-empty capture to be
    /// trusted, even if every recognized row was `.` or `..`.
    pub fn is_confident(&self, min_coverage: f64) -> bool {
        self.recognized_lines > 0 && self.coverage() >= min_coverage
    }

    /// Judge this stage result against the coverage threshold.
    pub fn into_outcome(self, min_coverage: f64) -> ParseOutcome {
        if self.candidate_lines == 0 {
            return ParseOutcome::Empty;
        }
        if !self.is_confident(min_coverage) {
            return ParseOutcome::Unparsed;
        }
        if self.entries.is_empty() {
            return ParseOutcome::Empty;
        }
        ParseOutcome::Parsed(self)
    }
}

/// What a capture yielded.
///
/// `Empty` and `Unparsed` both carry no entries. `Empty` means the capture
/// looked like an empty directory; `Unparsed` means nothing could be trusted.
/// Either way the caller should try the next, more permissive capture before
/// concluding the directory is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum ParseOutcome {
    Parsed(Listing),
    Empty,
    Unparsed,
}

impl ParseOutcome {
    pub fn is_parsed(&self) -> bool {
        matches!(self, ParseOutcome::Parsed(_))
    }

    /// The stage that produced the entries, if any did.
    pub fn format(&self) -> Option<ListingFormat> {
        match self {
            ParseOutcome::Parsed(listing) => Some(listing.format),
            _ => None,
        }
    }

    pub fn entries(&self) -> &[DirEntry] {
        match self {
            ParseOutcome::Parsed(listing) => &listing.entries,
            _ => &[],
        }
    }

    pub fn into_entries(self) -> Vec<DirEntry> {
        match self {
            ParseOutcome::Parsed(listing) => listing.entries,
            _ => Vec::new(),
        }
    }
}

/// Folds the outcomes of successive captures, richest first.
///
/// The first `Parsed` outcome wins. When none parses, the result is `Empty`
/// if any capture looked empty and `Unparsed` otherwise.
#[derive(Debug, Default)]
pub struct Fallback {
    saw_empty: bool,
}

impl Fallback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one outcome. Returns it back when it settles the listing.
    pub fn offer(&mut self, outcome: ParseOutcome) -> Option<ParseOutcome> {
        match outcome {
            ParseOutcome::Parsed(_) => Some(outcome),
            ParseOutcome::Empty => {
                self.saw_empty = true;
                None
            }
            ParseOutcome::Unparsed => None,
        }
    }

    /// The verdict once every capture has been offered without success.
    pub fn finish(self) -> ParseOutcome {
        if self.saw_empty {
            ParseOutcome::Empty
        } else {
            ParseOutcome::Unparsed
        }
    }
}

/// Stateless front end to the stage chain.
///
/// Safe to share between threads and to reuse across calls; the same input
/// always produces the same outcome.
#[derive(Debug, Clone, Default)]
pub struct ListingParser {
    config: ParserConfig,
}

impl ListingParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse one capture that was produced for a known format.
    pub fn parse_as(
        &self,
        format: ListingFormat,
        raw: &str,
        base_path: &str,
    ) -> Result<ParseOutcome, ListingError> {
        let base = BasePath::new(base_path)?;
        Ok(self.run_stage(format, raw, &base))
    }

    /// Parse a capture of unknown dialect by trying every stage in order.
    ///
    /// The first confident stage settles the capture. This includes a stage
    /// that recognized only `.` and `..`: later, looser stages would misread
    /// those rows, so the result is `Empty`.
    pub fn parse(&self, raw: &str, base_path: &str) -> Result<ParseOutcome, ListingError> {
        let base = BasePath::new(base_path)?;
        let min_coverage = self.config.min_coverage;
        for format in ListingFormat::CHAIN {
            let listing = format.parse(raw, &base, &self.config);
            if listing.candidate_lines == 0 {
                return Ok(ParseOutcome::Empty);
            }
            if listing.is_confident(min_coverage) {
                return Ok(listing.into_outcome(min_coverage));
            }
            debug!(
                format = %format,
                coverage = listing.coverage(),
                "Stage not confident, trying next format"
            );
        }
        Ok(ParseOutcome::Unparsed)
    }

    /// Parse successive captures of the same directory, richest first.
    ///
    /// Captures are consumed lazily: iteration stops at the first one that
    /// parses, so an iterator that runs commands on demand only runs as
    /// many as needed.
    pub fn parse_captures<'a, I>(
        &self,
        captures: I,
        base_path: &str,
    ) -> Result<ParseOutcome, ListingError>
    where
        I: IntoIterator<Item = (ListingFormat, &'a str)>,
    {
        let base = BasePath::new(base_path)?;
        let mut fallback = Fallback::new();
        for (format, raw) in captures {
            if let Some(parsed) = fallback.offer(self.run_stage(format, raw, &base)) {
                return Ok(parsed);
            }
        }
        Ok(fallback.finish())
    }

    fn run_stage(&self, format: ListingFormat, raw: &str, base: &BasePath) -> ParseOutcome {
        let outcome = format
            .parse(raw, base, &self.config)
            .into_outcome(self.config.min_coverage);
        if !outcome.is_parsed() {
            debug!(format = %format, base = base.as_str(), "Stage ceded: {outcome:?}");
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_TIME: &str = "\
total 24
drwxrwx--x 4 u0_a317 media_rw 3452 2025-06-18 21:15:08.027999994 +0900 .
drwx--x--x 4 root sdcard_rw 3452 2025-06-01 10:00:00.000000000 +0900 ..
drwxrws--- 2 u0_a317 media_rw 3452 2025-06-18 21:15:08.027999994 +0900 Alarms
-rw-rw---- 1 u0_a317 media_rw 120 2025-06-17 09:01:02.000000000 +0900 notes.txt
drwxrws--- 2 u0_a317 media_rw 3452 2025-06-18 21:15:08.027999994 +0900 DCIM
";

    fn base(path: &str) -> BasePath {
        BasePath::new(path).unwrap()
    }

    // The parser is shared freely between callers.
    fn _assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn listing_parser_is_send_and_sync() {
        _assert_send_sync::<ListingParser>();
    }

    #[test]
    fn format_names_round_trip_through_from_str() {
        for format in ListingFormat::CHAIN {
            assert_eq!(format.as_str().parse::<ListingFormat>(), Ok(format));
        }
        assert_eq!(
            "long".parse::<ListingFormat>(),
            Err(ListingError::UnknownFormat("long".into()))
        );
    }

    #[test]
    fn stage_counts_lines_and_drops_dot_entries() {
        let listing = ListingFormat::TimezoneToken.parse(
            FULL_TIME,
            &base("/storage/emulated/0"),
            &ParserConfig::default(),
        );
        assert_eq!(listing.candidate_lines, 5);
        assert_eq!(listing.recognized_lines, 5);
        let names: Vec<&str> = listing.entries.iter().map(|e| e.name()).collect();
        assert_eq!(names, ["Alarms", "DCIM", "notes.txt"]);
    }

    #[test]
    fn dot_entries_kept_when_configured() {
        let config = ParserConfig {
            skip_dot_entries: false,
            ..ParserConfig::default()
        };
        let listing = ListingFormat::TimezoneToken.parse(FULL_TIME, &base("/"), &config);
        assert_eq!(listing.entries.len(), 5);
        assert_eq!(listing.entries[0].name(), ".");
        assert_eq!(listing.entries[1].name(), "..");
    }

    #[test]
    fn outcome_for_summary_only_capture_is_empty() {
        let listing =
            ListingFormat::TimezoneToken.parse("total 0\n\n", &base("/"), &ParserConfig::default());
        assert_eq!(listing.candidate_lines, 0);
        assert_eq!(listing.coverage(), 1.0);
        assert_eq!(listing.into_outcome(0.5), ParseOutcome::Empty);
    }

    #[test]
    fn outcome_for_dot_only_capture_is_empty() {
        let raw = "./\n../\n";
        let listing =
            ListingFormat::NamesOnly.parse(raw, &base("/"), &ParserConfig::default());
        assert_eq!(listing.recognized_lines, 2);
        assert_eq!(listing.into_outcome(0.5), ParseOutcome::Empty);
    }

    #[test]
    fn outcome_below_coverage_is_unparsed() {
        let raw = "\
-rw-r--r-- 1 root root 5 2025-06-18 21:15:08.0 +0900 a.txt
garbage one
garbage two
garbage three
";
        let listing =
            ListingFormat::TimezoneToken.parse(raw, &base("/"), &ParserConfig::default());
        assert_eq!(listing.recognized_lines, 1);
        assert_eq!(listing.coverage(), 0.25);
        assert_eq!(listing.clone().into_outcome(0.5), ParseOutcome::Unparsed);
        assert!(listing.into_outcome(0.2).is_parsed());
    }

    #[test]
    fn auto_parse_of_empty_full_time_directory_is_empty() {
        // Looser stages would read "+0900 ." as a name if asked.
        let raw = "\
total 0
drwxrwx--x 2 u0_a317 media_rw 3452 2025-06-18 21:15:08.027999994 +0900 .
drwxrwx--x 4 u0_a317 media_rw 3452 2025-06-18 21:15:08.027999994 +0900 ..
";
        let parser = ListingParser::default();
        assert_eq!(parser.parse(raw, "/sdcard/Empty").unwrap(), ParseOutcome::Empty);
    }

    #[test]
    fn zero_recognized_is_unparsed_even_without_threshold() {
        let listing =
            ListingFormat::TimezoneToken.parse("hello\n", &base("/"), &ParserConfig::default());
        assert_eq!(listing.into_outcome(0.0), ParseOutcome::Unparsed);
    }

    #[test]
    fn leaf_name_rules() {
        let config = ParserConfig::default();
        assert_eq!(leaf_name("link -> /x", &config).as_deref(), Some("link"));
        assert_eq!(leaf_name("a b ", &config).as_deref(), Some("a b"));
        assert_eq!(leaf_name(" -> /x", &config), None);
        assert_eq!(leaf_name("a/b", &config), None);
    }

    #[test]
    fn fallback_prefers_first_parsed() {
        let parser = ListingParser::default();
        let outcome = parser
            .parse_captures(
                [
                    (ListingFormat::TimezoneToken, "ls: unknown option --full-time"),
                    (ListingFormat::NamesOnly, "Music/\nsong.mp3\n"),
                    (ListingFormat::NamesOnly, "never/\n"),
                ],
                "/sdcard",
            )
            .unwrap();
        assert_eq!(outcome.format(), Some(ListingFormat::NamesOnly));
        assert_eq!(outcome.entries().len(), 2);
        assert_eq!(outcome.entries()[0].path(), "/sdcard/Music");
    }

    #[test]
    fn fallback_reports_empty_over_unparsed() {
        let mut fallback = Fallback::new();
        assert!(fallback.offer(ParseOutcome::Unparsed).is_none());
        assert!(fallback.offer(ParseOutcome::Empty).is_none());
        assert!(fallback.offer(ParseOutcome::Unparsed).is_none());
        assert_eq!(fallback.finish(), ParseOutcome::Empty);

        assert_eq!(Fallback::new().finish(), ParseOutcome::Unparsed);
    }

    #[test]
    fn parse_captures_stops_consuming_after_success() {
        let parser = ListingParser::default();
        let mut consumed = 0;
        let captures = [
            (ListingFormat::TimezoneToken, FULL_TIME),
            (ListingFormat::NamesOnly, "x\n"),
        ]
        .into_iter()
        .inspect(|_| consumed += 1);

        let outcome = parser.parse_captures(captures, "/").unwrap();
        assert!(outcome.is_parsed());
        assert_eq!(consumed, 1);
    }

    #[test]
    fn invalid_base_path_fails_fast() {
        let parser = ListingParser::default();
        assert_eq!(
            parser.parse("a.txt\n", "relative/dir"),
            Err(ListingError::InvalidBasePath("relative/dir".into()))
        );
        assert!(parser.parse_as(ListingFormat::NamesOnly, "", "").is_err());
    }

    #[test]
    fn outcome_serializes_with_tag() {
        let parser = ListingParser::default();
        let outcome = parser.parse("Download/\n", "/").unwrap();
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["outcome"], "parsed");
        assert_eq!(json["format"], "names-only");
        assert_eq!(json["entries"][0]["path"], "/Download");

        let json = serde_json::to_value(ParseOutcome::Unparsed).unwrap();
        assert_eq!(json, serde_json::json!({ "outcome": "unparsed" }));
    }
}
