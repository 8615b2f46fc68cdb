//! Configuration for wsline.
//!
//! Settings are read from `~/.wsline/config.toml` (or the file given with
//! `--config`) and may be overridden from the command line.
//!
//! # Configuration File
//!
//! ```toml
//! # Remote shell endpoint
//! endpoint = "ws://localhost:8000"
//!
//! # Key that detaches from the session (Ctrl + character)
//! detach_key = "ctrl-]"
//!
//! [prompt]
//! label = "$"
//! color = "blue"
//!
//! [banner]
//! text = "remote shell"
//! color = "green"
//!
//! [log]
//! level = "info"
//! ```
//!
//! Colors are either a name (`red`, `dark_cyan`, `grey`, ...) or `#rrggbb`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crossterm::style::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;

use crate::core::key::{KeyPress, Modifiers, NamedKey};
use crate::ui::{Banner, Prompt};

/// Endpoint used when neither the file nor the command line sets one
pub const DEFAULT_ENDPOINT: &str = "ws://localhost:8000";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid endpoint '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("Unknown color: {0}")]
    UnknownColor(String),

    #[error("Invalid detach key: {0}")]
    InvalidDetachKey(String),

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// WebSocket endpoint of the remote shell
    pub endpoint: String,
    /// Host-level key that tears the session down locally
    pub detach_key: String,
    /// Prompt settings
    pub prompt: PromptConfig,
    /// Connected banner settings
    pub banner: BannerConfig,
    /// Log settings
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            detach_key: "ctrl-]".to_string(),
            prompt: PromptConfig::default(),
            banner: BannerConfig::default(),
            log: LogConfig::default(),
        }
    }
}

/// Prompt configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    pub label: String,
    pub color: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            label: "$".to_string(),
            color: "blue".to_string(),
        }
    }
}

/// Banner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BannerConfig {
    pub text: String,
    pub color: String,
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self {
            text: "remote shell".to_string(),
            color: "green".to_string(),
        }
    }
}

/// Log configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Level or EnvFilter directive
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the default location.
    ///
    /// A missing default file is not an error; a missing explicit file is.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from(path),
            None => match Self::get_config_path() {
                Some(path) if path.exists() => Self::load_from(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Get config file path
    fn get_config_path() -> Option<PathBuf> {
        app_dir().map(|dir| dir.join("config.toml"))
    }

    /// Check that the endpoint is a usable WebSocket URL
    pub fn validate_endpoint(&self) -> Result<(), ConfigError> {
        let url = self.endpoint.trim();
        if !(url.starts_with("ws://") || url.starts_with("wss://")) {
            return Err(ConfigError::InvalidEndpoint {
                url: url.to_string(),
                reason: "scheme must be ws:// or wss://".to_string(),
            });
        }
        url.into_client_request()
            .map(|_| ())
            .map_err(|e| ConfigError::InvalidEndpoint {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }

    /// Build the prompt
    pub fn prompt(&self) -> Result<Prompt, ConfigError> {
        Ok(Prompt::new(
            self.prompt.label.clone(),
            parse_color(&self.prompt.color)?,
        ))
    }

    /// Build the connected banner
    pub fn banner(&self) -> Result<Banner, ConfigError> {
        Ok(Banner::new(
            self.banner.text.clone(),
            parse_color(&self.banner.color)?,
        ))
    }

    /// Parse the detach key binding
    pub fn detach_key(&self) -> Result<DetachKey, ConfigError> {
        DetachKey::parse(&self.detach_key)
    }
}

/// Ctrl + character chord that detaches from the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetachKey {
    pub char: char,
}

impl DetachKey {
    /// Parse `ctrl-x`, `ctrl+x`, `C-x` or `^x`
    pub fn parse(spec: &str) -> Result<Self, ConfigError> {
        let lower = spec.trim().to_lowercase();
        let rest = ["ctrl-", "ctrl+", "c-", "^"]
            .iter()
            .find_map(|prefix| lower.strip_prefix(prefix));

        let mut chars = match rest {
            Some(rest) => rest.chars(),
            None => return Err(ConfigError::InvalidDetachKey(spec.to_string())),
        };

        match (chars.next(), chars.next()) {
            // Ctrl+C is the interrupt key and cannot be rebound
            (Some('c'), None) => Err(ConfigError::InvalidDetachKey(spec.to_string())),
            (Some(ch), None) if !ch.is_whitespace() => Ok(Self { char: ch }),
            _ => Err(ConfigError::InvalidDetachKey(spec.to_string())),
        }
    }

    pub fn matches(&self, key: &KeyPress) -> bool {
        key.modifiers.contains(Modifiers::CTRL) && key.key == NamedKey::Char(self.char)
    }
}

/// Parse a color name or `#rrggbb`
pub fn parse_color(name: &str) -> Result<Color, ConfigError> {
    let lower = name.trim().to_lowercase().replace('-', "_");

    if let Some(hex) = lower.strip_prefix('#') {
        if hex.len() == 6 && hex.is_ascii() {
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
            if let (Ok(r), Ok(g), Ok(b)) = (channel(0), channel(2), channel(4)) {
                return Ok(Color::Rgb { r, g, b });
            }
        }
        return Err(ConfigError::UnknownColor(name.to_string()));
    }

    let color = match lower.as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "dark_red" => Color::DarkRed,
        "green" => Color::Green,
        "dark_green" => Color::DarkGreen,
        "yellow" => Color::Yellow,
        "dark_yellow" => Color::DarkYellow,
        "blue" => Color::Blue,
        "dark_blue" => Color::DarkBlue,
        "magenta" => Color::Magenta,
        "dark_magenta" => Color::DarkMagenta,
        "cyan" => Color::Cyan,
        "dark_cyan" => Color::DarkCyan,
        "white" => Color::White,
        "grey" | "gray" => Color::Grey,
        "dark_grey" | "dark_gray" => Color::DarkGrey,
        _ => return Err(ConfigError::UnknownColor(name.to_string())),
    };
    Ok(color)
}

/// `~/.wsline`, created on first use
pub fn app_dir() -> Option<PathBuf> {
    let dir = home_dir()?.join(".wsline");
    if !dir.exists() {
        let _ = fs::create_dir_all(&dir);
    }
    Some(dir)
}

// Get home directory
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("USERPROFILE")
        .or_else(|| std::env::var_os("HOME"))
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.endpoint, "ws://localhost:8000");
        assert_eq!(config.log.level, "info");
        assert!(config.validate_endpoint().is_ok());
        assert_eq!(config.detach_key().unwrap(), DetachKey { char: ']' });
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::parse(
            r#"
            endpoint = "wss://shell.example.com/term"

            [prompt]
            label = "~"
            "#,
        )
        .unwrap();
        assert_eq!(config.endpoint, "wss://shell.example.com/term");
        assert_eq!(config.prompt.label, "~");
        assert_eq!(config.prompt.color, "blue");
        assert_eq!(config.banner.text, "remote shell");
    }

    #[test]
    fn test_parse_error() {
        assert!(Config::parse("endpoint = ").is_err());
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/nonexistent/wsline.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_invalid_endpoint() {
        let config = Config {
            endpoint: "http://localhost:8000".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            config.validate_endpoint(),
            Err(ConfigError::InvalidEndpoint { .. })
        ));
    }

    #[test]
    fn test_detach_key_parse() {
        assert_eq!(DetachKey::parse("ctrl-]").unwrap().char, ']');
        assert_eq!(DetachKey::parse("Ctrl+Q").unwrap().char, 'q');
        assert_eq!(DetachKey::parse("C-d").unwrap().char, 'd');
        assert_eq!(DetachKey::parse("^x").unwrap().char, 'x');
        assert!(DetachKey::parse("ctrl-c").is_err());
        assert!(DetachKey::parse("alt-x").is_err());
        assert!(DetachKey::parse("ctrl-ab").is_err());
    }

    #[test]
    fn test_detach_key_matches() {
        let key = DetachKey { char: ']' };
        assert!(key.matches(&KeyPress::ctrl(']')));
        assert!(!key.matches(&KeyPress::char(']')));
    }

    #[test]
    fn test_colors() {
        assert_eq!(parse_color("blue").unwrap(), Color::Blue);
        assert_eq!(parse_color("Dark-Cyan").unwrap(), Color::DarkCyan);
        assert_eq!(
            parse_color("#1e90ff").unwrap(),
            Color::Rgb { r: 0x1e, g: 0x90, b: 0xff }
        );
        assert!(parse_color("#12345").is_err());
        assert!(parse_color("chartreuse").is_err());
    }
}
