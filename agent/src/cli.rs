//! Command-line argument handling.

use std::path::PathBuf;

use adbhub_core::ListingFormat;
use thiserror::Error;

pub const USAGE: &str = "\
Usage:
  adbhub-agent parse [--base-path PATH] [--format FORMAT] [--config FILE] [INPUT]
  adbhub-agent list [--serial SERIAL] [--config FILE] PATH

Commands:
  parse       Parse a captured listing from INPUT (or stdin) and print JSON
  list        Capture and parse a device directory through `adb shell`

Options:
  --base-path PATH   Directory the capture was taken in (default: /)
  --format FORMAT    auto, timezone-token, embedded-date, iso-timestamp
                     or names-only (default: auto)
  --config FILE      JSON configuration file
  --serial SERIAL    Device serial passed to `adb -s`
  --version          Print version and exit
  --help             Print this help message

Exit status is 1 when no listing format could be recognized.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Parse(ParseArgs),
    List(ListArgs),
    Version,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseArgs {
    pub base_path: String,
    /// `None` tries every format in chain order.
    pub format: Option<ListingFormat>,
    pub config: Option<PathBuf>,
    /// `None` reads the capture from stdin.
    pub input: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListArgs {
    pub serial: Option<String>,
    pub config: Option<PathBuf>,
    pub path: String,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CliError {
    #[error("Missing command")]
    MissingCommand,

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Option {0} requires a value")]
    MissingValue(String),

    #[error("Unexpected argument: {0}")]
    UnexpectedArgument(String),

    #[error("Missing directory path")]
    MissingPath,

    #[error("{0}")]
    InvalidFormat(String),
}

/// Parse the arguments that follow the program name.
pub fn parse_args(args: &[String]) -> Result<Command, CliError> {
    let Some((first, rest)) = args.split_first() else {
        return Err(CliError::MissingCommand);
    };

    match first.as_str() {
        "--version" | "-V" => Ok(Command::Version),
        "--help" | "-h" => Ok(Command::Help),
        "parse" => parse_parse_args(rest).map(Command::Parse),
        "list" => parse_list_args(rest).map(Command::List),
        other => Err(CliError::UnknownOption(other.to_string())),
    }
}

fn parse_parse_args(args: &[String]) -> Result<ParseArgs, CliError> {
    let mut parsed = ParseArgs {
        base_path: "/".to_string(),
        format: None,
        config: None,
        input: None,
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--base-path" => parsed.base_path = value(&mut iter, arg)?,
            "--format" => {
                let format = value(&mut iter, arg)?;
                parsed.format = if format == "auto" {
                    None
                } else {
                    Some(
                        format
                            .parse()
                            .map_err(|e: adbhub_core::ListingError| {
                                CliError::InvalidFormat(e.to_string())
                            })?,
                    )
                };
            }
            "--config" => parsed.config = Some(value(&mut iter, arg)?.into()),
            flag if flag.starts_with("--") => {
                return Err(CliError::UnknownOption(flag.to_string()))
            }
            input if parsed.input.is_none() => parsed.input = Some(input.into()),
            extra => return Err(CliError::UnexpectedArgument(extra.to_string())),
        }
    }

    Ok(parsed)
}

fn parse_list_args(args: &[String]) -> Result<ListArgs, CliError> {
    let mut serial = None;
    let mut config = None;
    let mut path = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--serial" => serial = Some(value(&mut iter, arg)?),
            "--config" => config = Some(value(&mut iter, arg)?.into()),
            flag if flag.starts_with("--") => {
                return Err(CliError::UnknownOption(flag.to_string()))
            }
            p if path.is_none() => path = Some(p.to_string()),
            extra => return Err(CliError::UnexpectedArgument(extra.to_string())),
        }
    }

    Ok(ListArgs {
        serial,
        config,
        path: path.ok_or(CliError::MissingPath)?,
    })
}

fn value<'a>(iter: &mut impl Iterator<Item = &'a String>, flag: &str) -> Result<String, CliError> {
    iter.next()
        .cloned()
        .ok_or_else(|| CliError::MissingValue(flag.to_string()))
}
