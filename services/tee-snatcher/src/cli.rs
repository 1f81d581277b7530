//! Command-line parsing
//!
//! Two commands, one flag and a config override:
//!
//! ```text
//! tee-snatcher [--config <path>] start [--dry-run|-d]
//! tee-snatcher [--config <path>] stop
//! ```

use crate::error::{Error, Result};

pub const USAGE: &str = "\
Usage: tee-snatcher [--config <path>] <command> [options]

Commands:
  start    Start monitoring for available tee times
  stop     Stop monitoring

Options:
  --dry-run, -d      Find tee times but simulate the booking
  --config <path>    Config file (default: $CONFIG_PATH or tee-snatcher.toml)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start { dry_run: bool },
    Stop,
}

/// Parsed invocation. `command` is `None` when no command was given.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Cli {
    pub command: Option<Command>,
    pub config_path: Option<String>,
}

/// Parse arguments, excluding the program name.
pub fn parse(args: &[String]) -> Result<Cli> {
    let mut cli = Cli::default();
    let mut dry_run = false;
    let mut command: Option<&str> = None;

    let mut iter = args.iter().map(String::as_str);
    while let Some(arg) = iter.next() {
        match arg {
            "--config" => {
                let path = iter
                    .next()
                    .ok_or_else(|| Error::Usage("--config requires a path".into()))?;
                cli.config_path = Some(path.to_string());
            }
            "--dry-run" | "-d" => dry_run = true,
            flag if flag.starts_with('-') => {
                return Err(Error::Usage(format!("unknown option: {flag}")));
            }
            name if command.is_none() => command = Some(name),
            extra => return Err(Error::Usage(format!("unexpected argument: {extra}"))),
        }
    }

    cli.command = match command {
        None => None,
        Some("start") => Some(Command::Start { dry_run }),
        Some("stop") => Some(Command::Stop),
        Some(other) => return Err(Error::Usage(format!("unknown command: {other}"))),
    };
    Ok(cli)
}
