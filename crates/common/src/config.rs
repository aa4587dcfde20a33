//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config. Provider-specific settings
//! (LLM credentials, media storage credentials) are loaded by their own
//! crates; this struct only carries what the composition root needs.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

/// Backing store for conversations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreProvider {
    #[default]
    Postgres,
    Memory,
}

impl std::str::FromStr for StoreProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "postgres" | "postgresql" => Ok(StoreProvider::Postgres),
            "memory" => Ok(StoreProvider::Memory),
            other => Err(anyhow::anyhow!(
                "Unknown store provider: {}. Supported providers: postgres, memory",
                other
            )),
        }
    }
}

impl std::fmt::Display for StoreProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreProvider::Postgres => write!(f, "postgres"),
            StoreProvider::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Which conversation store to use
    pub store_provider: StoreProvider,

    /// Database connection URL, required for the postgres store
    pub database_url: Option<String>,

    /// Comma-separated list of allowed CORS origins
    pub cors_allowed_origins: Option<String>,

    /// Runtime configuration
    pub rust_log: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let store_provider = env::var("STORE_PROVIDER")
            .unwrap_or_else(|_| StoreProvider::default().to_string())
            .parse::<StoreProvider>()?;

        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());
        if store_provider == StoreProvider::Postgres && database_url.is_none() {
            return Err(anyhow::anyhow!(
                "DATABASE_URL is required for the postgres store"
            ));
        }

        let config = Self {
            store_provider,
            database_url,
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS").ok(),
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "threadline=debug".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
        };

        Ok(config)
    }
}
