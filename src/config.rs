//! Configuration management for the back office
//!
//! Handles environment variables and application settings.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use tracing::{info, warn};

const DEFAULT_SECRET: &str = "change-me-in-production";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Directory holding the JSON data file
    pub data_dir: PathBuf,

    /// Name of the JSON data file inside `data_dir`
    pub data_file: String,

    /// Secret used to sign session tokens
    pub shared_secret: String,

    /// Environment (development, production)
    pub environment: String,

    /// Log level
    pub log_level: String,

    /// Emit logs as JSON lines instead of the compact console format
    pub json_logs: bool,

    /// CORS origins (empty means allow all)
    pub cors_origins: Vec<String>,

    /// Session token lifetime in seconds
    pub session_ttl: u64,

    /// IANA timezone of the school, used for "today" and week boundaries
    pub timezone: String,

    /// Login name of the single back office account
    pub admin_login: String,

    /// Password the account starts with, until changed from the profile page
    pub admin_initial_password: String,

    /// Seed a fresh data file with demo records
    pub seed_demo_data: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            data_dir: PathBuf::from("./data"),
            data_file: "autoescuela.json".to_string(),
            shared_secret: DEFAULT_SECRET.to_string(),
            environment: "development".to_string(),
            log_level: "info".to_string(),
            json_logs: false,
            cors_origins: vec![],
            session_ttl: 12 * 60 * 60,
            timezone: "Europe/Madrid".to_string(),
            admin_login: "autoescuela_laroca".to_string(),
            admin_initial_password: "laroca1234".to_string(),
            seed_demo_data: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup, over the defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Server configuration
        if let Some(host) = lookup("AUTOESCUELA_HOST") {
            config.host = host;
        }

        if let Some(port) = lookup("AUTOESCUELA_PORT") {
            config.port = port.parse().map_err(|_| ConfigError::InvalidPort(port))?;
        }

        // Storage
        if let Some(data_dir) = lookup("AUTOESCUELA_DATA_DIR") {
            config.data_dir = PathBuf::from(data_dir);
        }

        if let Some(data_file) = lookup("AUTOESCUELA_DATA_FILE") {
            config.data_file = data_file;
        }

        if let Some(seed) = lookup("AUTOESCUELA_SEED_DEMO_DATA") {
            config.seed_demo_data = parse_bool(&seed)?;
        }

        // Authentication
        if let Some(shared_secret) = lookup("AUTOESCUELA_SECRET") {
            config.shared_secret = shared_secret;
        }

        if let Some(ttl) = lookup("AUTOESCUELA_SESSION_TTL") {
            config.session_ttl = ttl.parse().map_err(|_| ConfigError::InvalidSessionTtl(ttl))?;
        }

        if let Some(login) = lookup("AUTOESCUELA_ADMIN_LOGIN") {
            config.admin_login = login;
        }

        if let Some(password) = lookup("AUTOESCUELA_ADMIN_PASSWORD") {
            config.admin_initial_password = password;
        }

        // Environment
        if let Some(environment) = lookup("AUTOESCUELA_ENVIRONMENT") {
            config.environment = environment;
        }

        // Logging
        if let Some(log_level) = lookup("AUTOESCUELA_LOG_LEVEL") {
            config.log_level = log_level;
        }

        if let Some(json_logs) = lookup("AUTOESCUELA_JSON_LOGS") {
            config.json_logs = parse_bool(&json_logs)?;
        }

        // CORS origins
        if let Some(cors_origins) = lookup("AUTOESCUELA_CORS_ORIGINS") {
            config.cors_origins = cors_origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Some(timezone) = lookup("AUTOESCUELA_TIMEZONE") {
            config.timezone = timezone;
        }

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shared_secret == DEFAULT_SECRET && self.is_production() {
            return Err(ConfigError::InsecureProductionSecret);
        }

        if self.shared_secret.len() < 16 {
            return Err(ConfigError::SharedSecretTooShort);
        }

        if self.port == 0 {
            return Err(ConfigError::InvalidPort(self.port.to_string()));
        }

        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDataDir);
        }

        if self.data_file.trim().is_empty() {
            return Err(ConfigError::EmptyDataFile);
        }

        if self.session_ttl == 0 {
            return Err(ConfigError::InvalidSessionTtl(self.session_ttl.to_string()));
        }

        if self.admin_login.trim().is_empty() {
            return Err(ConfigError::EmptyAdminLogin);
        }

        if self.admin_initial_password.is_empty() {
            return Err(ConfigError::EmptyAdminPassword);
        }

        self.tz()?;

        Ok(())
    }

    /// Parsed school timezone
    pub fn tz(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::InvalidTimezone(self.timezone.clone()))
    }

    /// Socket address string to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn server_url(&self) -> String {
        format!("http://{}", self.bind_address())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Log the effective configuration, without secrets
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!("  Environment: {}", self.environment);
        info!("  Server: {}", self.server_url());
        info!("  Data file: {}", self.data_dir.join(&self.data_file).display());
        info!("  Timezone: {}", self.timezone);
        info!("  Log level: {}", self.log_level);
        info!("  CORS origins: {:?}", self.cors_origins);
        info!("  Session TTL: {}s", self.session_ttl);
        info!("  Demo data: {}", self.seed_demo_data);

        if self.shared_secret == DEFAULT_SECRET {
            warn!("Using default shared secret - CHANGE IN PRODUCTION!");
        }
    }
}

fn parse_bool(value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool(value.to_string())),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port: {0}")]
    InvalidPort(String),

    #[error("Invalid session TTL: {0}")]
    InvalidSessionTtl(String),

    #[error("Invalid boolean value: {0}")]
    InvalidBool(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Insecure shared secret for production environment")]
    InsecureProductionSecret,

    #[error("Shared secret too short (minimum 16 characters)")]
    SharedSecretTooShort,

    #[error("Empty data directory")]
    EmptyDataDir,

    #[error("Empty data file name")]
    EmptyDataFile,

    #[error("Empty admin login")]
    EmptyAdminLogin,

    #[error("Empty admin password")]
    EmptyAdminPassword,
}
