use std::env;
use std::fmt;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_GEOCODER_URL: &str = "https://geocode-maps.yandex.ru/1.x";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} must be a valid number, got '{value}'")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

#[derive(Clone)]
pub struct ManagerCredentials {
    pub username: String,
    pub password: String,
    /// Value of the session cookie handed out after a successful login.
    pub session_token: String,
}

impl fmt::Debug for ManagerCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagerCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub geocoder: GeocoderConfig,
    pub manager: ManagerCredentials,
}

impl Config {
    /// Read configuration from the process environment (after `.env` has
    /// been loaded by the caller).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| lookup(name).ok_or(ConfigError::Missing(name));
        let or_default = |name: &str, default: &str| {
            lookup(name).unwrap_or_else(|| default.to_string())
        };

        let port_raw = or_default("PORT", "8080");
        let port = port_raw.parse().map_err(|_| ConfigError::Invalid {
            name: "PORT",
            value: port_raw.clone(),
        })?;
        let timeout_raw = or_default("GEOCODER_TIMEOUT_SECS", "5");
        let timeout_secs: u64 = timeout_raw.parse().map_err(|_| ConfigError::Invalid {
            name: "GEOCODER_TIMEOUT_SECS",
            value: timeout_raw.clone(),
        })?;

        Ok(Config {
            database_url: required("DATABASE_URL")?,
            host: or_default("HOST", "0.0.0.0"),
            port,
            geocoder: GeocoderConfig {
                base_url: or_default("GEOCODER_URL", DEFAULT_GEOCODER_URL),
                api_key: required("GEOCODER_API_KEY")?,
                timeout: Duration::from_secs(timeout_secs),
            },
            manager: ManagerCredentials {
                username: required("MANAGER_USERNAME")?,
                password: required("MANAGER_PASSWORD")?,
                session_token: required("MANAGER_SESSION_TOKEN")?,
            },
        })
    }
}
