use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Client for the sealbox share-once secret service")]
pub struct Config {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Server base URL
    #[arg(short, long, global = true)]
    pub server: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Extra attempts on 429/5xx before giving up
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Print machine-readable JSON instead of human output
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Seal a new secret and print its share link
    Create {
        /// Secret text; omit to read from --file or stdin
        text: Option<String>,

        /// Read the secret from a file instead of the argument/stdin
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Expire after an offset from now, e.g. "45m" or "2h"
        #[arg(
            long,
            value_name = "OFFSET",
            conflicts_with_all = ["expire_date", "expire_time"]
        )]
        expires_in: Option<String>,

        /// Expire on a calendar date (YYYY-MM-DD, local time)
        #[arg(long, value_name = "DATE", requires = "expire_time")]
        expire_date: Option<NaiveDate>,

        /// Time of day for --expire-date, e.g. "5:30 PM" (AM when no suffix)
        #[arg(long, value_name = "TIME", requires = "expire_date")]
        expire_time: Option<String>,

        /// Views allowed before the secret burns
        #[arg(long, default_value_t = 1)]
        max_views: u32,
    },
    /// Show metadata for an existing secret
    Info {
        /// Secret id or share link
        id: String,
    },
    /// Delete a secret before it expires
    Delete {
        /// Secret id or share link
        id: String,
    },
}

impl Config {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Application settings (from config file)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the sealbox server
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Extra attempts on 429/5xx before giving up
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Expiration settings
    #[serde(default)]
    pub expiry: ExpirySettings,
}

fn default_server_url() -> String {
    "http://localhost:8300".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

/// Expiration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpirySettings {
    /// Minimum lead time for a submitted expiration (minutes)
    #[serde(default = "default_min_lead_minutes")]
    pub min_lead_minutes: u32,
}

fn default_min_lead_minutes() -> u32 {
    sealbox_core::expiry::DEFAULT_MIN_LEAD_MINUTES
}

impl Default for ExpirySettings {
    fn default() -> Self {
        Self {
            min_lead_minutes: default_min_lead_minutes(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            request_timeout_secs: default_request_timeout(),
            max_retries: default_max_retries(),
            expiry: ExpirySettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from config file or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        // Try custom path first
        if let Some(p) = path {
            if p.exists() {
                let content = std::fs::read_to_string(p)
                    .with_context(|| format!("Failed to read config file: {:?}", p))?;
                return toml::from_str(&content)
                    .with_context(|| format!("Failed to parse config file: {:?}", p));
            }
        }

        // Try default config locations
        let default_paths = [
            dirs::config_dir().map(|p| p.join("sealbox/config.toml")),
            dirs::home_dir().map(|p| p.join(".config/sealbox/config.toml")),
            dirs::home_dir().map(|p| p.join(".sealbox.toml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file: {:?}", path))?;
                return toml::from_str(&content)
                    .with_context(|| format!("Failed to parse config file: {:?}", path));
            }
        }

        // Return defaults if no config file found
        Ok(Self::default())
    }

    /// Merge CLI config into settings (CLI takes precedence)
    pub fn merge_cli(&mut self, cli: &Config) {
        if let Some(server) = &cli.server {
            self.server_url = server.clone();
        }
        if let Some(timeout) = cli.timeout {
            self.request_timeout_secs = timeout;
        }
        if let Some(max_retries) = cli.max_retries {
            self.max_retries = max_retries;
        }
    }

    /// Validate and normalize settings values
    ///
    /// Strips trailing slashes from the server URL so endpoint paths join
    /// cleanly, and keeps the timeout above zero.
    pub fn validate(&mut self) {
        while self.server_url.ends_with('/') {
            self.server_url.pop();
        }
        if self.request_timeout_secs == 0 {
            self.request_timeout_secs = 1;
        }
    }
}
