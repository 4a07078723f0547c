mod adb;
mod cli;

use std::io::Read;
use std::path::Path;

use adbhub_core::{AgentConfig, ListingParser, ParseOutcome};
use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, ListArgs, ParseArgs};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_usage() {
    eprintln!("{}", cli::USAGE);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let command = match cli::parse_args(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{e}");
            print_usage();
            std::process::exit(2);
        }
    };

    let outcome = match command {
        Command::Version => {
            println!("adbhub-agent {}", VERSION);
            return Ok(());
        }
        Command::Help => {
            print_usage();
            return Ok(());
        }
        Command::Parse(args) => {
            init_tracing();
            run_parse(args)?
        }
        Command::List(args) => {
            init_tracing();
            run_list(args).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    if outcome == ParseOutcome::Unparsed {
        std::process::exit(1);
    }
    Ok(())
}

/// Logs go to stderr so the JSON on stdout stays machine-readable.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AgentConfig> {
    match path {
        Some(path) => AgentConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(AgentConfig::default()),
    }
}

fn run_parse(args: ParseArgs) -> anyhow::Result<ParseOutcome> {
    let config = load_config(args.config.as_deref())?;
    let raw = match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("Failed to read capture from stdin")?;
            raw
        }
    };

    let parser = ListingParser::new(config.parser);
    let outcome = match args.format {
        Some(format) => parser.parse_as(format, &raw, &args.base_path)?,
        None => parser.parse(&raw, &args.base_path)?,
    };
    info!(
        base = %args.base_path,
        entries = outcome.entries().len(),
        "Parsed capture: {:?}",
        outcome.format()
    );
    Ok(outcome)
}

async fn run_list(args: ListArgs) -> anyhow::Result<ParseOutcome> {
    let mut config = load_config(args.config.as_deref())?;
    if args.serial.is_some() {
        config.serial = args.serial;
    }

    info!("adbhub-agent {} listing {}", VERSION, args.path);
    let runner = adb::AdbRunner::new(&config);
    let parser = ListingParser::new(config.parser.clone());
    let outcome = adb::list_dir(&runner, &parser, &config.captures, &args.path).await?;
    Ok(outcome)
}
