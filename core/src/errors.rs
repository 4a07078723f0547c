//! Error types for the adbhub core crate.
//!
//! The parser itself never fails on malformed listing text; only invalid
//! calls and the collaborator-side concerns (running commands, loading
//! configuration) produce errors. The agent maps these into its exit status.

use thiserror::Error;

/// Top-level error type encompassing all core error categories.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A listing could not be parsed because the call itself was invalid.
    #[error("Listing error: {0}")]
    Listing(#[from] ListingError),

    /// A remote listing command failed.
    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    /// A configuration error (invalid values, missing fields, parse failures).
    #[error("Config error: {0}")]
    Config(String),

    /// A low-level I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by the listing parser for invalid calls.
///
/// Malformed lines are never errors; they are skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListingError {
    /// The base path was empty or not absolute.
    #[error("Invalid base path: {0:?} (must be an absolute path)")]
    InvalidBasePath(String),

    /// A listing format name that is not part of the parser chain.
    #[error("Unknown listing format: {0}")]
    UnknownFormat(String),
}

/// Errors from running a listing command on the device.
#[derive(Error, Debug)]
pub enum CommandError {
    /// The requested directory does not exist on the device.
    #[error("File not found: {0}")]
    NotFound(String),

    /// The device shell refused to list the directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The command exited unsuccessfully for another reason.
    #[error("Command failed: {0}")]
    Failed(String),

    /// The command did not finish within the configured timeout.
    #[error("Command timed out after {0}s: {1}")]
    Timeout(u64, String),

    /// The command could not be started.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CommandError {
    /// Classify the stderr text of a failed listing command.
    ///
    /// Messages from adb itself (`error: device 'X' not found`, `adb: ...`)
    /// describe the connection, not the directory, and stay `Failed`.
    pub fn from_stderr(stderr: &str) -> Self {
        let lower = stderr.trim_start().to_lowercase();
        if lower.starts_with("error:") || lower.starts_with("adb:") {
            CommandError::Failed(stderr.trim().to_string())
        } else if lower.contains("no such file") {
            CommandError::NotFound(stderr.trim().to_string())
        } else if lower.contains("permission denied") {
            CommandError::PermissionDenied(stderr.trim().to_string())
        } else {
            CommandError::Failed(stderr.trim().to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_error_display() {
        let err = ListingError::InvalidBasePath("sdcard".into());
        assert_eq!(
            err.to_string(),
            "Invalid base path: \"sdcard\" (must be an absolute path)"
        );
    }

    #[test]
    fn unknown_format_display() {
        let err = ListingError::UnknownFormat("csv".into());
        assert_eq!(err.to_string(), "Unknown listing format: csv");
    }

    #[test]
    fn command_error_display() {
        let err = CommandError::NotFound("/sdcard/missing".into());
        assert_eq!(err.to_string(), "File not found: /sdcard/missing");

        let err = CommandError::Timeout(10, "ls -la '/'".into());
        assert_eq!(err.to_string(), "Command timed out after 10s: ls -la '/'");
    }

    #[test]
    fn command_error_from_stderr_classifies() {
        let err = CommandError::from_stderr("ls: /sdcard/nope: No such file or directory\n");
        assert!(matches!(err, CommandError::NotFound(ref m) if m.ends_with("directory")));

        let err = CommandError::from_stderr("ls: /data: Permission denied");
        assert!(matches!(err, CommandError::PermissionDenied(_)));

        let err = CommandError::from_stderr("ls: unknown option --full-time");
        assert!(matches!(err, CommandError::Failed(_)));
    }

    #[test]
    fn command_error_from_stderr_keeps_adb_errors_apart() {
        let err = CommandError::from_stderr("error: device 'R58M123' not found\n");
        assert!(matches!(err, CommandError::Failed(ref m) if m.contains("R58M123")));

        let err = CommandError::from_stderr("adb: no devices/emulators found");
        assert!(matches!(err, CommandError::Failed(_)));

        let err = CommandError::from_stderr("ls: /sdcard/x: not found");
        assert!(matches!(err, CommandError::Failed(_)));
    }

    #[test]
    fn core_error_from_listing_error() {
        let core_err: CoreError = ListingError::InvalidBasePath(String::new()).into();
        assert_eq!(
            core_err.to_string(),
            "Listing error: Invalid base path: \"\" (must be an absolute path)"
        );
    }

    #[test]
    fn core_error_from_command_error() {
        let core_err: CoreError = CommandError::PermissionDenied("/data".into()).into();
        assert_eq!(core_err.to_string(), "Command error: Permission denied: /data");
    }

    #[test]
    fn core_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let core_err: CoreError = io_err.into();
        assert_eq!(core_err.to_string(), "I/O error: gone");
    }

    #[test]
    fn command_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "adb: not found");
        let err: CommandError = io_err.into();
        assert_eq!(err.to_string(), "I/O error: adb: not found");
    }
}
