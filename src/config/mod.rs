use crate::core::{AppError, Result};
use std::env;
use std::str::FromStr;

pub mod server;

pub use server::ServerConfig;

/// Upper bound on `MAX_LINE_ITEMS`; keeps document totals within `Decimal` range
pub const MAX_LINE_ITEMS_CEILING: usize = 100_000;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub server: ServerConfig,
    pub limits: LimitsConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    pub log_format: LogFormat,
}

/// Output format for the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(AppError::configuration(format!("Invalid LOG_FORMAT: {}", s))),
        }
    }
}

/// Request-size and throughput limits applied at the HTTP boundary
#[derive(Debug, Clone)]
pub struct LimitsConfig {
    pub rate_limit_per_minute: u32,
    pub max_formula_fields: usize,
    pub max_line_items: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            rate_limit_per_minute: 1000,
            max_formula_fields: 500,
            max_line_items: 1000,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let defaults = LimitsConfig::default();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
                log_format: env::var("LOG_FORMAT")
                    .unwrap_or_else(|_| "pretty".to_string())
                    .parse()?,
            },
            server: ServerConfig::from_env()?,
            limits: LimitsConfig {
                rate_limit_per_minute: parse_var(
                    "RATE_LIMIT_PER_MINUTE",
                    defaults.rate_limit_per_minute,
                )?,
                max_formula_fields: parse_var("MAX_FORMULA_FIELDS", defaults.max_formula_fields)?,
                max_line_items: parse_var("MAX_LINE_ITEMS", defaults.max_line_items)?,
            },
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AppError::configuration("Server port must be greater than 0"));
        }

        if self.server.workers == 0 {
            return Err(AppError::configuration("Server workers must be greater than 0"));
        }

        self.limits.validate()
    }
}

impl LimitsConfig {
    pub fn validate(&self) -> Result<()> {
        if self.rate_limit_per_minute == 0 {
            return Err(AppError::configuration("Rate limit must be greater than 0"));
        }

        if self.max_formula_fields == 0 || self.max_line_items == 0 {
            return Err(AppError::configuration(
                "Formula field and line item limits must be greater than 0",
            ));
        }

        if self.max_line_items > MAX_LINE_ITEMS_CEILING {
            return Err(AppError::configuration(format!(
                "Line item limit must not exceed {}",
                MAX_LINE_ITEMS_CEILING
            )));
        }

        Ok(())
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| AppError::configuration(format!("Invalid {}", name))),
        Err(_) => Ok(default),
    }
}
