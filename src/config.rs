//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

/// Development default values - NEVER use in production.
pub mod defaults {
    pub const DEV_DB_DRIVER: &str = "postgres";
    pub const DEV_DB_USER: &str = "postgres";
    pub const DEV_DB_PASSWORD: &str = "postgres";
    pub const DEV_DB_HOST: &str = "localhost";
    pub const DEV_DB_PORT: u16 = 5432;
    pub const DEV_DB_NAME: &str = "postgres";
    pub const DEV_DB_MAX_CONNECTIONS: u32 = 10;
    pub const DEV_DB_MIN_CONNECTIONS: u32 = 1;
    pub const DEV_DB_CONNECT_TIMEOUT_SECS: u64 = 10;

    pub const DEV_CACHE_URL: &str = "redis://localhost:6379";
    pub const DEV_CACHE_DB: i64 = 1;
}

/// Drivers accepted in `FILESTORE_DB_DRIVER`. Only PostgreSQL is compiled in.
const SUPPORTED_DRIVERS: &[&str] = &["postgres", "postgresql"];

/// Schemes accepted in `FILESTORE_CACHE_URL`.
const CACHE_SCHEMES: &[&str] = &["redis", "rediss"];

/// Runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Parse environment from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Relational database configuration.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Full connection URL. When set, the individual parts below are ignored.
    pub url: Option<String>,
    /// Driver / URL scheme (postgres)
    pub driver: String,
    pub username: String,
    pub password: SecretString,
    pub host: String,
    pub port: u16,
    /// Database name
    pub name: String,
    /// Optional schema used as the connection search path
    pub schema: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
}

impl DatabaseConfig {
    /// Build the connection URL, percent-encoding the credentials.
    pub fn connection_url(&self) -> String {
        if let Some(ref url) = self.url {
            return url.clone();
        }

        format!(
            "{}://{}:{}@{}:{}/{}",
            self.driver,
            urlencoding::encode(&self.username),
            urlencoding::encode(self.password.expose_secret()),
            self.host,
            self.port,
            self.name
        )
    }

    /// Connection URL with the password masked, for logging.
    pub fn redacted_url(&self) -> String {
        if self.url.is_some() {
            return "<FILESTORE_DB_URL>".to_string();
        }

        format!(
            "{}://{}:***@{}:{}/{}",
            self.driver,
            urlencoding::encode(&self.username),
            self.host,
            self.port,
            self.name
        )
    }
}

/// Cache store configuration.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Redis server URL without a database path
    pub url: String,
    /// Numbered database index
    pub db: i64,
}

impl CacheConfig {
    /// Redis URL selecting the configured database index.
    pub fn connection_url(&self) -> String {
        format!("{}/{}", self.url.trim_end_matches('/'), self.db)
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Runtime environment
    pub environment: Environment,
    /// Relational store settings
    pub database: DatabaseConfig,
    /// Cache store settings
    pub cache: CacheConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In development mode (RUST_ENV=development) every variable has a default.
    /// In production mode the development database password is rejected.
    ///
    /// Environment variables:
    /// - `RUST_ENV`: Environment (development/production) - REQUIRED
    /// - `FILESTORE_DB_URL`: Full database URL (overrides the individual parts)
    /// - `FILESTORE_DB_DRIVER`: URL scheme (default: postgres)
    /// - `FILESTORE_DB_USER` / `FILESTORE_DB_PASSWORD`: Credentials
    /// - `FILESTORE_DB_HOST` / `FILESTORE_DB_PORT`: Server address (default: localhost:5432)
    /// - `FILESTORE_DB_NAME`: Database name (default: postgres)
    /// - `FILESTORE_DB_SCHEMA`: Schema search path override (optional)
    /// - `FILESTORE_DB_MAX_CONNECTIONS` / `FILESTORE_DB_MIN_CONNECTIONS`: Pool size
    /// - `FILESTORE_CACHE_URL`: Redis URL (default: redis://localhost:6379)
    /// - `FILESTORE_CACHE_DB`: Redis database index (default: 1)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_str = lookup("RUST_ENV").ok_or(ConfigError::MissingEnvVar("RUST_ENV"))?;

        let environment = Environment::parse(&env_str).ok_or(ConfigError::InvalidValue(
            "RUST_ENV must be 'development' or 'production'",
        ))?;

        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let driver = or_default("FILESTORE_DB_DRIVER", defaults::DEV_DB_DRIVER).to_lowercase();
        if !SUPPORTED_DRIVERS.contains(&driver.as_str()) {
            return Err(ConfigError::InvalidValue(
                "FILESTORE_DB_DRIVER must be 'postgres' or 'postgresql'",
            ));
        }

        let port = or_default("FILESTORE_DB_PORT", &defaults::DEV_DB_PORT.to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidValue("FILESTORE_DB_PORT must be a valid port number"))?;

        let max_connections = or_default(
            "FILESTORE_DB_MAX_CONNECTIONS",
            &defaults::DEV_DB_MAX_CONNECTIONS.to_string(),
        )
        .parse::<u32>()
        .map_err(|_| {
            ConfigError::InvalidValue("FILESTORE_DB_MAX_CONNECTIONS must be a valid number")
        })?;

        let min_connections = or_default(
            "FILESTORE_DB_MIN_CONNECTIONS",
            &defaults::DEV_DB_MIN_CONNECTIONS.to_string(),
        )
        .parse::<u32>()
        .map_err(|_| {
            ConfigError::InvalidValue("FILESTORE_DB_MIN_CONNECTIONS must be a valid number")
        })?;

        if min_connections > max_connections {
            return Err(ConfigError::InvalidValue(
                "FILESTORE_DB_MIN_CONNECTIONS must not exceed FILESTORE_DB_MAX_CONNECTIONS",
            ));
        }

        let database = DatabaseConfig {
            url: lookup("FILESTORE_DB_URL").filter(|s| !s.is_empty()),
            driver,
            username: or_default("FILESTORE_DB_USER", defaults::DEV_DB_USER),
            password: SecretString::from(or_default(
                "FILESTORE_DB_PASSWORD",
                defaults::DEV_DB_PASSWORD,
            )),
            host: or_default("FILESTORE_DB_HOST", defaults::DEV_DB_HOST),
            port,
            name: or_default("FILESTORE_DB_NAME", defaults::DEV_DB_NAME),
            schema: lookup("FILESTORE_DB_SCHEMA").filter(|s| !s.is_empty()),
            max_connections,
            min_connections,
            connect_timeout: Duration::from_secs(defaults::DEV_DB_CONNECT_TIMEOUT_SECS),
        };

        let cache_db = or_default("FILESTORE_CACHE_DB", &defaults::DEV_CACHE_DB.to_string())
            .parse::<i64>()
            .ok()
            .filter(|db| *db >= 0)
            .ok_or(ConfigError::InvalidValue(
                "FILESTORE_CACHE_DB must be a non-negative number",
            ))?;

        let cache = CacheConfig {
            url: validate_cache_url(or_default("FILESTORE_CACHE_URL", defaults::DEV_CACHE_URL))?,
            db: cache_db,
        };

        let config = Config {
            environment,
            database,
            cache,
        };

        if environment.is_production() {
            config.validate_production()?;
        }

        Ok(config)
    }

    /// Validate that production configuration does not use development defaults.
    fn validate_production(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database.url.is_none()
            && self.database.password.expose_secret() == defaults::DEV_DB_PASSWORD
        {
            errors.push(
                "FILESTORE_DB_PASSWORD is using the development default. Set a production password."
                    .to_string(),
            );
        }

        if !errors.is_empty() {
            return Err(ConfigError::ProductionValidation(errors));
        }

        Ok(())
    }

    /// Check if running in development mode.
    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }
}

/// The database index is appended to the cache URL, so the URL itself must not
/// select one or carry a query string.
fn validate_cache_url(raw: String) -> Result<String, ConfigError> {
    let url = url::Url::parse(&raw)
        .map_err(|_| ConfigError::InvalidValue("FILESTORE_CACHE_URL must be a valid URL"))?;

    if !CACHE_SCHEMES.contains(&url.scheme()) {
        return Err(ConfigError::InvalidValue(
            "FILESTORE_CACHE_URL must use the redis:// or rediss:// scheme",
        ));
    }
    if !matches!(url.path(), "" | "/") {
        return Err(ConfigError::InvalidValue(
            "FILESTORE_CACHE_URL must not include a database path; use FILESTORE_CACHE_DB",
        ));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::InvalidValue(
            "FILESTORE_CACHE_URL must not include a query string",
        ));
    }

    Ok(raw)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),

    #[error("Production configuration validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    ProductionValidation(Vec<String>),
}
