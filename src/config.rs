use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{ForecastError, Result};
use crate::llm::{GeminiConfig, DEFAULT_GEMINI_MODEL, DEFAULT_TIMEOUT_SECS, GEMINI_BASE_URL};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gemini: GeminiConfig,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    /// Reads the process environment. `GEMINI_API_KEY` is required.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests need not touch the real environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get("GEMINI_API_KEY")
            .ok_or_else(|| ForecastError::Config("GEMINI_API_KEY must be set".to_string()))?;

        let timeout_secs: u64 = parse_or(
            "GEMINI_TIMEOUT_SECS",
            get("GEMINI_TIMEOUT_SECS"),
            DEFAULT_TIMEOUT_SECS,
        )?;
        let port: u16 = parse_or("FORECASTER_PORT", get("FORECASTER_PORT"), DEFAULT_PORT)?;

        let mut gemini = GeminiConfig::new(api_key)
            .with_model(get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()))
            .with_base_url(get("GEMINI_BASE_URL").unwrap_or_else(|| GEMINI_BASE_URL.to_string()))
            .with_timeout(Duration::from_secs(timeout_secs));

        if let Some(raw) = get("GEMINI_TEMPERATURE") {
            gemini = gemini.with_temperature(parse_value("GEMINI_TEMPERATURE", &raw)?);
        }

        Ok(Self {
            gemini,
            host: get("FORECASTER_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ForecastError::Config(format!("Invalid address: {}", e)))
    }
}

fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match raw {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| ForecastError::Config(format!("{} has invalid value '{}': {}", key, raw, e)))
}
