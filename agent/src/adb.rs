//! Capture of directory listings through `adb shell`.
//!
//! Each configured [`CaptureCommand`] is run in order, richest output first,
//! and its stdout handed to the parser. Cheaper commands only run when the
//! richer ones fail or cannot be parsed.

use std::process::Stdio;
use std::time::Duration;

use adbhub_core::config::AgentConfig;
use adbhub_core::errors::{CommandError, CoreError};
use adbhub_core::files::BasePath;
use adbhub_core::listing::capture::CaptureCommand;
use adbhub_core::listing::Fallback;
use adbhub_core::{ListingParser, ParseOutcome};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Runs commands in a device shell via the `adb` executable.
#[derive(Debug, Clone)]
pub struct AdbRunner {
    adb_path: String,
    serial: Option<String>,
    timeout: Duration,
}

impl AdbRunner {
    pub fn new(config: &AgentConfig) -> Self {
        Self {
            adb_path: config.adb_path.clone(),
            serial: config.serial.clone(),
            timeout: Duration::from_secs(config.command_timeout_secs),
        }
    }

    /// Arguments passed to adb for one shell command.
    fn args<'a>(&'a self, command: &'a str) -> Vec<&'a str> {
        let mut args = Vec::with_capacity(4);
        if let Some(serial) = &self.serial {
            args.push("-s");
            args.push(serial.as_str());
        }
        args.push("shell");
        args.push(command);
        args
    }

    /// Run `command` in the device shell and return its stdout.
    pub async fn shell(&self, command: &str) -> Result<String, CommandError> {
        debug!(adb = %self.adb_path, command, "Executing device command");
        let child = Command::new(&self.adb_path)
            .args(self.args(command))
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, child)
            .await
            .map_err(|_| CommandError::Timeout(self.timeout.as_secs(), command.to_string()))??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = if stderr.trim().is_empty() {
                String::from_utf8_lossy(&output.stdout).to_string()
            } else {
                stderr.to_string()
            };
            return Err(CommandError::from_stderr(&message));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// List `path` on the device, trying each capture until one parses.
///
/// A capture whose command fails (non-zero exit, timeout) is skipped. If
/// every command failed the last error is returned; otherwise the folded
/// parse outcome is. This loop keeps its own [`Fallback`] instead of going
/// through [`ListingParser::parse_captures`]: commands run lazily and
/// asynchronously, and their errors have to be tracked beside the outcomes.
pub async fn list_dir(
    runner: &AdbRunner,
    parser: &ListingParser,
    captures: &[CaptureCommand],
    path: &str,
) -> Result<ParseOutcome, CoreError> {
    BasePath::new(path)?;

    let mut fallback = Fallback::new();
    let mut last_error = None;
    let mut captured_any = false;

    for capture in captures {
        let command = capture.render(path);
        let output = match runner.shell(&command).await {
            Ok(output) => output,
            Err(e) => {
                warn!(format = %capture.format, error = %e, "Listing command failed");
                last_error = Some(e);
                continue;
            }
        };
        captured_any = true;

        let outcome = parser.parse_as(capture.format, &output, path)?;
        if let Some(parsed) = fallback.offer(outcome) {
            info!(
                format = %capture.format,
                entries = parsed.entries().len(),
                path,
                "Directory listed"
            );
            return Ok(parsed);
        }
    }

    match last_error {
        Some(e) if !captured_any => Err(e.into()),
        _ => Ok(fallback.finish()),
    }
}
