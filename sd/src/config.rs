//! StudyDaemon configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main StudyDaemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Snapshot store configuration
    pub store: StoreConfig,

    /// Telegram delivery configuration
    pub telegram: TelegramConfig,

    /// Sync server configuration
    pub server: ServerConfig,

    /// Daily report times
    pub reports: ReportsConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Checks the report times parse. Call this early in startup to fail
    /// fast with clear error messages.
    pub fn validate(&self) -> Result<()> {
        self.reports.parse_times()?;
        Ok(())
    }

    /// Validate delivery settings for commands that send messages
    pub fn validate_delivery(&self) -> Result<()> {
        if std::env::var(&self.telegram.bot_token_env).is_err() {
            return Err(eyre::eyre!(
                "Telegram bot token not found. Set the {} environment variable.",
                self.telegram.bot_token_env
            ));
        }
        if self.telegram.chat_id.is_empty() {
            return Err(eyre::eyre!("telegram.chat-id is empty in the configuration"));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: ./studydaemon.yml
        let local_config = PathBuf::from("studydaemon.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/studydaemon/studydaemon.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("studydaemon").join("studydaemon.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read just the log level, for setting up logging before the full load
    ///
    /// Quiet on every failure; the full load reports problems once logging
    /// is up.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let path = match config_path {
            Some(path) => path.clone(),
            None => {
                let local = PathBuf::from("studydaemon.yml");
                if local.exists() {
                    local
                } else {
                    dirs::config_dir()?.join("studydaemon").join("studydaemon.yml")
                }
            }
        };
        let content = fs::read_to_string(path).ok()?;
        let config: Config = serde_yaml::from_str(&content).ok()?;
        Some(config.logging.level)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Snapshot store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the persisted state document
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        // XDG data directory (~/.local/share/studydaemon on Linux)
        let path = dirs::data_dir()
            .map(|d| d.join("studydaemon"))
            .unwrap_or_else(|| PathBuf::from(".studydaemon"))
            .join("state.json");

        Self { path }
    }
}

/// Telegram delivery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Environment variable containing the bot token
    #[serde(rename = "bot-token-env")]
    pub bot_token_env: String,

    /// Chat to deliver reports to
    #[serde(rename = "chat-id")]
    pub chat_id: String,

    /// API base URL
    #[serde(rename = "api-base")]
    pub api_base: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token_env: "STUDYD_BOT_TOKEN".to_string(),
            chat_id: String::new(),
            api_base: "https://api.telegram.org".to_string(),
        }
    }
}

/// Sync server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host
    pub host: String,

    /// Bind port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

/// Daily report times (local, HH:MM)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportsConfig {
    /// Morning program time
    pub morning: String,

    /// Midday nudge time
    pub midday: String,

    /// Evening summary time
    pub evening: String,

    /// Trigger tick interval in seconds
    #[serde(rename = "tick-secs")]
    pub tick_secs: u64,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            morning: "08:00".to_string(),
            midday: "14:30".to_string(),
            evening: "23:00".to_string(),
            tick_secs: 30,
        }
    }
}

impl ReportsConfig {
    /// Parse the three slot times
    pub fn parse_times(&self) -> Result<(chrono::NaiveTime, chrono::NaiveTime, chrono::NaiveTime)> {
        let parse = |label: &str, value: &str| {
            chrono::NaiveTime::parse_from_str(value, "%H:%M")
                .context(format!("Invalid reports.{} time {:?}, expected HH:MM", label, value))
        };
        Ok((
            parse("morning", &self.morning)?,
            parse("midday", &self.midday)?,
            parse("evening", &self.evening)?,
        ))
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.telegram.bot_token_env, "STUDYD_BOT_TOKEN");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.reports.morning, "08:00");
        assert_eq!(config.reports.tick_secs, 30);
        assert!(config.store.path.ends_with("state.json"));
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
store:
  path: /tmp/studydaemon/state.json

telegram:
  bot-token-env: MY_BOT_TOKEN
  chat-id: "12345"
  api-base: https://telegram.example.com

server:
  host: 0.0.0.0
  port: 8080

reports:
  morning: "07:30"
  evening: "22:00"
  tick-secs: 10
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.store.path, PathBuf::from("/tmp/studydaemon/state.json"));
        assert_eq!(config.telegram.bot_token_env, "MY_BOT_TOKEN");
        assert_eq!(config.telegram.chat_id, "12345");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.reports.morning, "07:30");
        assert_eq!(config.reports.midday, "14:30");
        assert_eq!(config.reports.tick_secs, 10);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
server:
  port: 4000
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.reports.evening, "23:00");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_validate_rejects_bad_time() {
        let mut config = Config::default();
        config.reports.midday = "half past two".to_string();

        assert!(config.validate().is_err());
        config.reports.midday = "14:30".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_times() {
        let reports = ReportsConfig::default();
        let (morning, midday, evening) = reports.parse_times().unwrap();

        assert_eq!(morning, chrono::NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(midday, chrono::NaiveTime::from_hms_opt(14, 30, 0).unwrap());
        assert_eq!(evening, chrono::NaiveTime::from_hms_opt(23, 0, 0).unwrap());
    }
}
