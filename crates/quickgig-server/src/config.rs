use std::net::SocketAddr;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

/// Placeholder secret used when none is configured. Fine for local
/// development only.
pub const DEV_JWT_SECRET: &str = "dev-secret-change-me";

/// Token lifetimes accepted from the environment: one hour up to a year.
pub const TOKEN_TTL_HOURS: RangeInclusive<i64> = 1..=8760;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{name} has invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub db_readers: usize,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; `from_env` passes the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token_ttl_hours = parse_var(&lookup, "QUICKGIG_TOKEN_TTL_HOURS", 24)?;
        if !TOKEN_TTL_HOURS.contains(&token_ttl_hours) {
            return Err(ConfigError::Invalid {
                name: "QUICKGIG_TOKEN_TTL_HOURS",
                value: token_ttl_hours.to_string(),
            });
        }

        Ok(Self {
            host: lookup("QUICKGIG_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_var(&lookup, "PORT", 5001)?,
            db_path: lookup("QUICKGIG_DB_PATH")
                .unwrap_or_else(|| "quickgig.db".into())
                .into(),
            db_readers: parse_var(&lookup, "QUICKGIG_DB_READERS", 4)?,
            jwt_secret: lookup("QUICKGIG_JWT_SECRET")
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEV_JWT_SECRET.into()),
            token_ttl_hours,
        })
    }

    pub fn uses_placeholder_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }

    pub fn addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|_| ConfigError::Invalid {
            name: "QUICKGIG_HOST",
            value: self.host.clone(),
        })
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
