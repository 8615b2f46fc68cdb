//! wsline - A line-editing terminal client for remote shells
//!
//! wsline connects to a remote shell over WebSocket, edits the input line
//! locally and sends whole lines, interrupts, history and completion
//! requests as text messages. Output from the remote replaces the unsent
//! input line and is followed by a fresh prompt.
//!
//! # Quick Start
//!
//! ```text
//! wsline                         # Connect to ws://localhost:8000
//! wsline ws://host:9000          # Connect to another endpoint
//! wsline -c ./wsline.toml        # Use a specific config file
//! ```
//!
//! # Keys
//!
//! | Key | Action |
//! |-----|--------|
//! | Enter | Submit line |
//! | Backspace | Erase last character |
//! | Ctrl+C | Interrupt |
//! | Up/Down | History previous/next |
//! | Tab | Complete current line |
//! | Ctrl+] | Detach |

mod app;
mod config;
mod core;
mod net;
mod ui;
#[cfg(test)]
mod test_utils;

use std::env;
use std::path::PathBuf;

use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::Config;
use crate::core::session::CloseReason;

/// Version string from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding a log filter directive
const LOG_ENV: &str = "WSLINE_LOG";

/// Command line options
#[derive(Debug, Default, PartialEq)]
struct CliOptions {
    /// Endpoint override
    url: Option<String>,
    /// Explicit config file
    config_path: Option<PathBuf>,
    /// Log level override
    log_level: Option<String>,
}

/// What the command line asked for
#[derive(Debug, PartialEq)]
enum Command {
    Run(CliOptions),
    Help,
    Version,
}

fn print_version() {
    eprintln!("wsline {}", VERSION);
}

fn print_help() {
    eprintln!("wsline {} - Line-editing terminal client for remote shells", VERSION);
    eprintln!();
    eprintln!("Usage: wsline [OPTIONS] [URL]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -u, --url <URL>         WebSocket endpoint (default: ws://localhost:8000)");
    eprintln!("  -c, --config <PATH>     Config file (default: ~/.wsline/config.toml)");
    eprintln!("  -l, --log-level <LVL>   Log level or filter (default: info)");
    eprintln!("  -v, --version           Show version");
    eprintln!("  -h, --help              Show this help");
    eprintln!();
    eprintln!("Keys:");
    eprintln!("  Enter                   Submit line");
    eprintln!("  Backspace               Erase last character");
    eprintln!("  Ctrl+C                  Interrupt remote command");
    eprintln!("  Up / Down               Previous / next history entry");
    eprintln!("  Tab                     Complete current line");
    eprintln!("  Ctrl+]                  Detach (configurable)");
    eprintln!();
    eprintln!("Log file: ~/.wsline/wsline.log ({} overrides the level)", LOG_ENV);
}

fn parse_args<I>(args: I) -> Result<Command, String>
where
    I: IntoIterator<Item = String>,
{
    let mut options = CliOptions::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-v" | "--version" => return Ok(Command::Version),
            "-u" | "--url" => {
                let url = args.next().ok_or("Missing URL argument")?;
                options.url = Some(url);
            }
            "-c" | "--config" => {
                let path = args.next().ok_or("Missing config path argument")?;
                options.config_path = Some(PathBuf::from(path));
            }
            "-l" | "--log-level" => {
                let level = args.next().ok_or("Missing log level argument")?;
                options.log_level = Some(level);
            }
            arg if arg.starts_with('-') => {
                return Err(format!("Unknown argument: {}. Use -h for help.", arg));
            }
            url => {
                if options.url.is_some() {
                    return Err(format!("Unexpected argument: {}", url));
                }
                options.url = Some(url.to_string());
            }
        }
    }

    Ok(Command::Run(options))
}

/// Log to `~/.wsline/wsline.log`; the terminal itself is never written to
fn init_logging(level: &str) {
    let log_path = config::app_dir()
        .map(|dir| dir.join("wsline.log"))
        .unwrap_or_else(|| PathBuf::from("wsline.log"));

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok();

    if let Some(file) = log_file {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .or_else(|_| EnvFilter::try_new(level))
            .unwrap_or_else(|_| EnvFilter::new("info"));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

fn main() -> anyhow::Result<()> {
    let options = match parse_args(env::args().skip(1)) {
        Ok(Command::Run(options)) => options,
        Ok(Command::Help) => {
            print_help();
            return Ok(());
        }
        Ok(Command::Version) => {
            print_version();
            return Ok(());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    };

    // Command line overrides the config file
    let loaded = Config::load(options.config_path.as_deref());
    let mut config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => Config::default(),
    };
    if let Some(url) = options.url {
        config.endpoint = url;
    }
    if let Some(level) = options.log_level {
        config.log.level = level;
    }

    init_logging(&config.log.level);
    info!("wsline {} starting...", VERSION);
    if let Err(e) = loaded {
        warn!("{}; using defaults", e);
    }

    config.validate_endpoint()?;

    let reason = app::run(&config)?;
    eprintln!("{}", reason);

    if matches!(
        reason,
        CloseReason::ConnectFailed(_) | CloseReason::DisplayFailed(_)
    ) {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_args() {
        assert_eq!(parse_args(args(&[])), Ok(Command::Run(CliOptions::default())));
    }

    #[test]
    fn test_positional_url() {
        let command = parse_args(args(&["ws://host:9000"])).unwrap();
        assert_eq!(
            command,
            Command::Run(CliOptions {
                url: Some("ws://host:9000".to_string()),
                ..CliOptions::default()
            })
        );
    }

    #[test]
    fn test_all_options() {
        let command = parse_args(args(&[
            "-u", "wss://a/b", "--config", "/tmp/w.toml", "-l", "debug",
        ]))
        .unwrap();
        assert_eq!(
            command,
            Command::Run(CliOptions {
                url: Some("wss://a/b".to_string()),
                config_path: Some(PathBuf::from("/tmp/w.toml")),
                log_level: Some("debug".to_string()),
            })
        );
    }

    #[test]
    fn test_help_and_version() {
        assert_eq!(parse_args(args(&["--help"])), Ok(Command::Help));
        assert_eq!(parse_args(args(&["-v"])), Ok(Command::Version));
    }

    #[test]
    fn test_errors() {
        assert!(parse_args(args(&["--bogus"])).is_err());
        assert!(parse_args(args(&["-u"])).is_err());
        assert!(parse_args(args(&["ws://a", "ws://b"])).is_err());
    }
}
