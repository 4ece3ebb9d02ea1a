//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use quill_core::pagination::DEFAULT_PAGE_SIZE;
use quill_infra::auth::MAX_EXPIRATION_HOURS;
use quill_infra::{DatabaseConfig, JwtConfig};

use crate::telemetry::TelemetryConfig;

/// Staff account created on startup when it does not exist yet.
#[derive(Clone)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AdminBootstrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminBootstrap")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs on the in-memory store.
    pub database: Option<DatabaseConfig>,
    pub posts_per_page: u64,
    pub jwt: JwtConfig,
    pub admin: Option<AdminBootstrap>,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let database = lookup("DATABASE_URL").map(|url| {
            let mut config = DatabaseConfig::new(url);
            if let Some(max) = parsed(&lookup, "DB_MAX_CONNECTIONS") {
                config.max_connections = max;
            }
            if let Some(min) = parsed(&lookup, "DB_MIN_CONNECTIONS") {
                config.min_connections = min;
            }
            if let Some(secs) = parsed(&lookup, "DB_CONNECT_TIMEOUT_SECS") {
                config.connect_timeout = Duration::from_secs(secs);
            }
            config.sqlx_logging = lookup("DB_LOG_STATEMENTS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false);
            config
        });

        let defaults = JwtConfig::default();
        let jwt = JwtConfig {
            secret: lookup("JWT_SECRET").unwrap_or(defaults.secret),
            expiration_hours: parsed::<i64>(&lookup, "JWT_EXPIRATION_HOURS")
                .map(|hours| hours.clamp(1, MAX_EXPIRATION_HOURS))
                .unwrap_or(defaults.expiration_hours),
            issuer: lookup("JWT_ISSUER").unwrap_or(defaults.issuer),
        };

        let admin = match (lookup("ADMIN_EMAIL"), lookup("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminBootstrap { email, password }),
            _ => None,
        };

        let telemetry = TelemetryConfig {
            json_logs: lookup("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
            service_name: lookup("SERVICE_NAME").unwrap_or_else(|| "quill".to_string()),
        };

        Self {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parsed(&lookup, "PORT").unwrap_or(8080),
            database,
            posts_per_page: parsed(&lookup, "POSTS_PER_PAGE")
                .filter(|n: &u64| *n > 0)
                .unwrap_or(DEFAULT_PAGE_SIZE),
            jwt,
            admin,
            telemetry,
        }
    }
}

/// Read and parse one value; unparsable values count as unset.
fn parsed<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|v| v.parse().ok())
}
