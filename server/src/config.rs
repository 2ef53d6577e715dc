//! Process configuration read from the environment.
//!
//! Outside production, `.env` is loaded first and must exist. `MONGODB_URI`
//! is required; `PORT` falls back to [`DEFAULT_PORT`].

use std::env;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 5001;
pub const PRODUCTION: &str = "production";
pub const STATIC_DIR: &str = "./client/dist";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load .env file: {0}")]
    DotEnv(#[from] dotenvy::Error),

    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("invalid PORT value {0:?}")]
    InvalidPort(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub mongodb_uri: String,
    pub port: u16,
    pub environment: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        if env::var("ENV").ok().as_deref() != Some(PRODUCTION) {
            dotenvy::dotenv()?;
        }
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let mongodb_uri = var("MONGODB_URI").ok_or(ConfigError::MissingVar("MONGODB_URI"))?;
        let port = match var("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            mongodb_uri,
            port,
            environment: var("ENV"),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment.as_deref() == Some(PRODUCTION)
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }

    /// Prebuilt client assets, served only in production.
    pub fn static_dir(&self) -> Option<PathBuf> {
        self.is_production().then(|| PathBuf::from(STATIC_DIR))
    }
}
