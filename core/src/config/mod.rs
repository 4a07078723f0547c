use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::listing::capture::{CaptureCommand, PATH_PLACEHOLDER};

/// Listing parser tuning.
///
/// - `min_coverage`: share of candidate lines a stage must recognize before
///   its entries are trusted (0.0 to 1.0).
/// - `summary_token`: first word of the aggregate header line (`total 24`).
/// - `symlink_marker`: separator between a link name and its target.
/// - `skip_dot_entries`: drop the `.` and `..` rows of `ls -a`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParserConfig {
    #[serde(default = "default_min_coverage")]
    pub min_coverage: f64,
    #[serde(default = "default_summary_token")]
    pub summary_token: String,
    #[serde(default = "default_symlink_marker")]
    pub symlink_marker: String,
    #[serde(default = "default_skip_dot_entries")]
    pub skip_dot_entries: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            min_coverage: default_min_coverage(),
            summary_token: default_summary_token(),
            symlink_marker: default_symlink_marker(),
            skip_dot_entries: default_skip_dot_entries(),
        }
    }
}

impl ParserConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(0.0..=1.0).contains(&self.min_coverage) {
            return Err(CoreError::Config(format!(
                "minCoverage must be between 0 and 1, got {}",
                self.min_coverage
            )));
        }
        if self.summary_token.trim().is_empty() {
            return Err(CoreError::Config("summaryToken must not be empty".into()));
        }
        if self.symlink_marker.is_empty() {
            return Err(CoreError::Config("symlinkMarker must not be empty".into()));
        }
        Ok(())
    }
}

/// Configuration of the agent that runs listing commands through adb.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfig {
    #[serde(default = "default_adb_path")]
    pub adb_path: String,
    /// Device serial passed as `adb -s`; `None` lets adb pick the device.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,
    #[serde(default)]
    pub parser: ParserConfig,
    /// Listing commands, richest output first.
    #[serde(default = "CaptureCommand::default_chain")]
    pub captures: Vec<CaptureCommand>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            adb_path: default_adb_path(),
            serial: None,
            command_timeout_secs: default_command_timeout_secs(),
            parser: ParserConfig::default(),
            captures: CaptureCommand::default_chain(),
        }
    }
}

impl AgentConfig {
    /// Load and validate a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json(text: &str) -> Result<Self, CoreError> {
        let config: AgentConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        self.parser.validate()?;
        if self.adb_path.trim().is_empty() {
            return Err(CoreError::Config("adbPath must not be empty".into()));
        }
        if self.command_timeout_secs == 0 {
            return Err(CoreError::Config(
                "commandTimeoutSecs must be greater than 0".into(),
            ));
        }
        if self.captures.is_empty() {
            return Err(CoreError::Config(
                "captures must list at least one command".into(),
            ));
        }
        if let Some(bad) = self
            .captures
            .iter()
            .find(|c| !c.template.contains(PATH_PLACEHOLDER))
        {
            return Err(CoreError::Config(format!(
                "capture template {:?} has no {PATH_PLACEHOLDER} placeholder",
                bad.template
            )));
        }
        Ok(())
    }
}

fn default_min_coverage() -> f64 {
    0.5
}

fn default_summary_token() -> String {
    "total".to_string()
}

fn default_symlink_marker() -> String {
    " -> ".to_string()
}

fn default_skip_dot_entries() -> bool {
    true
}

fn default_adb_path() -> String {
    "adb".to_string()
}

fn default_command_timeout_secs() -> u64 {
    10
}
