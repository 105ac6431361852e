use std::env;
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// AppConfig
///
/// Holds the application's entire configuration state. Immutable once loaded and
/// pulled into handlers through `FromRef`, like the services it sits next to.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls the log format.
    pub env: Env,
    // Which `Repository` implementation backs the services.
    pub storage: StorageBackend,
    // Postgres connection string. Only required for `StorageBackend::Postgres`.
    pub db_url: Option<String>,
    pub db_max_connections: u32,
    // Socket address the HTTP server binds to.
    pub bind_addr: String,
    // Insert the default countries at startup when they are missing.
    pub seed_data: bool,
}

/// Env
///
/// Runtime context: pretty logs for local development, JSON logs in production.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Env {
    Local,
    Production,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

/// ConfigError
///
/// Raised by `AppConfig::load` so startup fails before anything binds a socket.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set when STORAGE_BACKEND=postgres")]
    Missing(&'static str),
    #[error("invalid value for {name}: '{value}'")]
    Invalid { name: &'static str, value: String },
}

impl Default for AppConfig {
    /// In-memory, seedless configuration for tests; needs no environment variables.
    fn default() -> Self {
        Self {
            env: Env::Local,
            storage: StorageBackend::Memory,
            db_url: None,
            db_max_connections: DEFAULT_MAX_CONNECTIONS,
            bind_addr: "127.0.0.1:0".to_string(),
            seed_data: false,
        }
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
        }),
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads every setting from the environment (call `dotenv` first to pick up a
    /// `.env` file).
    ///
    /// # Errors
    /// Unknown enum values, unparsable numbers, and a missing `DATABASE_URL` with the
    /// Postgres backend.
    pub fn load() -> Result<Self, ConfigError> {
        let env = match env::var("APP_ENV").unwrap_or_else(|_| "local".to_string()).as_str() {
            "production" => Env::Production,
            "local" => Env::Local,
            other => {
                return Err(ConfigError::Invalid {
                    name: "APP_ENV",
                    value: other.to_string(),
                });
            }
        };

        let storage = match env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "postgres".to_string())
            .as_str()
        {
            "postgres" => StorageBackend::Postgres,
            "memory" => StorageBackend::Memory,
            other => {
                return Err(ConfigError::Invalid {
                    name: "STORAGE_BACKEND",
                    value: other.to_string(),
                });
            }
        };

        let db_url = env::var("DATABASE_URL").ok();
        if storage == StorageBackend::Postgres && db_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let db_max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(raw) => raw.trim().parse::<u32>().map_err(|_| ConfigError::Invalid {
                name: "DB_MAX_CONNECTIONS",
                value: raw.clone(),
            })?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        // Local in-memory runs start with the default catalog unless told otherwise.
        let seed_data = match env::var("SEED_DATA") {
            Ok(raw) => parse_bool("SEED_DATA", &raw)?,
            Err(_) => env == Env::Local && storage == StorageBackend::Memory,
        };

        Ok(Self {
            env,
            storage,
            db_url,
            db_max_connections,
            bind_addr,
            seed_data,
        })
    }
}
