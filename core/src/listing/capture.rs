//! Shell commands whose output feeds each stage of the chain.

use serde::{Deserialize, Serialize};

use super::ListingFormat;

/// Placeholder replaced by the quoted directory path.
pub const PATH_PLACEHOLDER: &str = "{path}";

/// A listing command and the format its output is expected to be in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureCommand {
    pub format: ListingFormat,
    /// Command line run by the device shell; must contain `{path}`.
    pub template: String,
}

impl CaptureCommand {
    pub fn new(format: ListingFormat, template: impl Into<String>) -> Self {
        Self {
            format,
            template: template.into(),
        }
    }

    /// The command line for listing `path`.
    pub fn render(&self, path: &str) -> String {
        self.template.replace(PATH_PLACEHOLDER, &quote_path(path))
    }

    /// Commands in decreasing order of detail, one per stage.
    pub fn default_chain() -> Vec<CaptureCommand> {
        vec![
            CaptureCommand::new(ListingFormat::TimezoneToken, "ls -la --full-time {path}"),
            CaptureCommand::new(ListingFormat::EmbeddedDate, "ls -la {path}"),
            CaptureCommand::new(
                ListingFormat::IsoTimestamp,
                "ls -la --time-style=+%Y-%m-%dT%H:%M:%S {path}",
            ),
            CaptureCommand::new(ListingFormat::NamesOnly, "ls -1ap {path}"),
        ]
    }
}

/// Single-quote a path for a POSIX shell.
pub fn quote_path(path: &str) -> String {
    format!("'{}'", path.replace('\'', "'\\''"))
}
