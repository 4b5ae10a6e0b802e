use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub mod paths;
pub mod validation;

use paths::{get_config_path, get_log_dir_path};
use validation::validate_config;

/// Configuration structure for the application.
/// Handles loading, saving, and managing application settings.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Bearer token for the query API.
    pub api_token: String,
    /// Request budget against the rate-limited API.
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u64,
    /// HTTP timeout in seconds for API requests. Defaults to 30 seconds.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
    /// Path to the log file. If not specified, logs go to the default location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<String>,
    /// GraphQL endpoint URL. Overridable for testing.
    #[serde(default = "default_graphql_url")]
    pub graphql_url: String,
    /// Entities endpoint base URL. Overridable for testing.
    #[serde(default = "default_entities_url")]
    pub entities_url: String,
}

fn default_requests_per_minute() -> u64 {
    crate::constants::DEFAULT_REQUESTS_PER_MINUTE
}

fn default_http_timeout() -> u64 {
    crate::constants::DEFAULT_HTTP_TIMEOUT_SECONDS
}

fn default_graphql_url() -> String {
    crate::constants::DEFAULT_GRAPHQL_URL.to_string()
}

fn default_entities_url() -> String {
    crate::constants::DEFAULT_ENTITIES_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_token: String::new(),
            requests_per_minute: default_requests_per_minute(),
            http_timeout_seconds: default_http_timeout(),
            log_file_path: None,
            graphql_url: default_graphql_url(),
            entities_url: default_entities_url(),
        }
    }
}

impl Config {
    /// Loads configuration from the default config file location.
    /// Environment variables override config file values.
    ///
    /// # Environment Variables
    /// - `UPSET_API_TOKEN` - Override the API token
    /// - `UPSET_LOG_FILE` - Override the log file path
    /// - `UPSET_HTTP_TIMEOUT` - Override the HTTP timeout in seconds
    /// - `UPSET_RPM` - Override the requests-per-minute budget
    ///
    /// A missing config file is only an error when no token is available
    /// from the environment either.
    pub async fn load() -> Result<Self, AppError> {
        let config_path = get_config_path();

        let mut config = if Path::new(&config_path).exists() {
            let content = fs::read_to_string(&config_path).await?;
            toml::from_str(&content)?
        } else if let Ok(api_token) = std::env::var("UPSET_API_TOKEN") {
            Config {
                api_token,
                ..Config::default()
            }
        } else {
            return Err(AppError::config_error(format!(
                "No config file at {config_path} and UPSET_API_TOKEN is not set"
            )));
        };

        // Override with environment variables if present
        if let Ok(api_token) = std::env::var("UPSET_API_TOKEN") {
            config.api_token = api_token;
        }

        if let Ok(log_file_path) = std::env::var("UPSET_LOG_FILE") {
            config.log_file_path = Some(log_file_path);
        }

        if let Some(timeout) = std::env::var("UPSET_HTTP_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            config.http_timeout_seconds = timeout;
        }

        if let Some(rpm) = std::env::var("UPSET_RPM")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            config.requests_per_minute = rpm;
        }

        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration settings
    pub fn validate(&self) -> Result<(), AppError> {
        validate_config(
            &self.api_token,
            self.requests_per_minute,
            &self.log_file_path,
        )
    }

    /// Saves current configuration to the default config file location.
    pub async fn save(&self) -> Result<(), AppError> {
        let config_path = get_config_path();
        self.save_to_path(&config_path).await
    }

    /// Returns the platform-specific path for the config file.
    pub fn get_config_path() -> String {
        paths::get_config_path()
    }

    /// Returns the platform-specific path for the log directory.
    pub fn get_log_dir_path() -> String {
        paths::get_log_dir_path()
    }

    /// Displays current configuration settings to stdout, with the token
    /// masked.
    pub async fn display() -> Result<(), AppError> {
        let config_path = get_config_path();
        let log_dir = get_log_dir_path();

        if Path::new(&config_path).exists() {
            let config = Config::load().await?;
            println!("\nCurrent Configuration");
            println!("────────────────────────────────────");
            println!("Config Location:");
            println!("{config_path}");
            println!("────────────────────────────────────");
            println!("API Token:");
            println!("{}", mask_token(&config.api_token));
            println!("────────────────────────────────────");
            println!("Rate Budget:");
            println!("{} requests/minute", config.requests_per_minute);
            println!("────────────────────────────────────");
            println!("HTTP Timeout:");
            println!("{} seconds", config.http_timeout_seconds);
            println!("────────────────────────────────────");
            println!("Log File Location:");
            if let Some(custom_path) = &config.log_file_path {
                println!("{custom_path}");
            } else {
                println!("{log_dir}/upset_scanner.log");
                println!("(Default location)");
            }
        } else {
            println!("\nNo configuration file found at:");
            println!("{config_path}");
        }

        Ok(())
    }

    /// Saves configuration to a custom file path, creating the parent
    /// directory if it doesn't exist.
    pub async fn save_to_path(&self, path: &str) -> Result<(), AppError> {
        let config_dir = Path::new(path).parent().ok_or_else(|| {
            AppError::config_error(format!("Path '{path}' has no parent directory"))
        })?;

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).await?;
        }
        let content = toml::to_string_pretty(self)?;
        let mut file = fs::File::create(path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Loads configuration from a custom file path (for testing).
    pub async fn load_from_path(path: &str) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

fn mask_token(token: &str) -> String {
    // Character-based, not byte-based: tokens are not guaranteed ASCII
    if token.chars().count() <= 4 {
        return "****".to_string();
    }
    let prefix: String = token.chars().take(4).collect();
    format!("{prefix}****")
}
