use std::env;
use std::fmt;

use sqlx::postgres::PgConnectOptions;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    Missing(&'static str),
    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Allowed browser origins for cross-origin requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

impl CorsOrigins {
    /// Parse a comma-separated origin list; `*` or an empty value allows any origin
    pub fn parse(value: &str) -> Self {
        let origins: Vec<String> = value
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            CorsOrigins::Any
        } else {
            CorsOrigins::List(origins)
        }
    }
}

/// Connection settings for the bulletin database.
///
/// `DATABASE_URL` wins when present, otherwise the libpq-style `PG*` variables are used.
#[derive(Clone)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub name: Option<String>,
    pub user: String,
    pub password: Option<String>,
    pub max_connections: u32,
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl DatabaseSettings {
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        if let Some(url) = &self.url {
            return url.parse().map_err(|_| ConfigError::Invalid {
                name: "DATABASE_URL",
                value: "<redacted>".to_string(),
            });
        }

        let name = self.name.as_deref().ok_or(ConfigError::Missing("PGDATABASE"))?;
        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(name)
            .username(&self.user);
        if let Some(password) = &self.password {
            options = options.password(password);
        }
        Ok(options)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseSettings,
    pub server_host: String,
    pub server_port: u16,
    pub cors_origins: CorsOrigins,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("DATABASE_URL").filter(|v| !v.is_empty());
        let name = lookup("PGDATABASE").filter(|v| !v.is_empty());
        if url.is_none() && name.is_none() {
            return Err(ConfigError::Missing("PGDATABASE"));
        }

        let database = DatabaseSettings {
            url,
            host: lookup("PGHOST").unwrap_or_else(|| "localhost".to_string()),
            port: parse_or("PGPORT", lookup("PGPORT"), 5432)?,
            name,
            user: lookup("PGUSER").unwrap_or_else(|| "postgres".to_string()),
            password: lookup("PGPASSWORD"),
            max_connections: parse_or("DB_MAX_CONNECTIONS", lookup("DB_MAX_CONNECTIONS"), 5)?,
        };

        Ok(Config {
            database,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            server_port: parse_or("PORT", lookup("PORT"), 4000)?,
            cors_origins: lookup("CORS_ORIGIN")
                .map(|v| CorsOrigins::parse(&v))
                .unwrap_or(CorsOrigins::Any),
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) if v.trim().is_empty() => Ok(default),
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid { name, value: v }),
    }
}
