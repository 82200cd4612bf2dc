use std::env;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("environment variable {0} must not be empty")]
    Empty(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub redis_url: String,
    pub jwt_secret: String,
    pub jwt_access_expiration_secs: u64,
    pub jwt_refresh_expiration_secs: u64,
    pub server_host: String,
    pub server_port: u16,
    pub api_base_uri: String,
    /// Accepted in place of the cached code when set. Test and bootstrap deployments only.
    pub registration_bypass_code: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let jwt_secret = required("JWT_SECRET")?;
        if jwt_secret.trim().is_empty() {
            return Err(ConfigError::Empty("JWT_SECRET"));
        }


        Ok(Config {
            database_url: required("DATABASE_URL")?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            redis_url: required("REDIS_URL")?,
            jwt_secret,
            jwt_access_expiration_secs: hours_as_secs(env::var("JWT_ACCESS_EXPIRATION").ok(), 24),
            jwt_refresh_expiration_secs: hours_as_secs(env::var("JWT_REFRESH_EXPIRATION").ok(), 720),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            api_base_uri: env::var("API_BASE_URI").unwrap_or_else(|_| "/api/v1".into()),
            registration_bypass_code: env::var("REGISTRATION_BYPASS_CODE")
                .ok()
                .filter(|code| !code.trim().is_empty()),
        })
    }

    pub fn access_token_ttl(&self) -> Duration {
        Duration::from_secs(self.jwt_access_expiration_secs)
    }

    pub fn refresh_token_ttl(&self) -> Duration {
        Duration::from_secs(self.jwt_refresh_expiration_secs)
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}

// "24h" and "24" both mean 24 hours.
fn hours_as_secs(value: Option<String>, default_hours: u64) -> u64 {
    value
        .and_then(|v| v.trim().trim_end_matches('h').parse::<u64>().ok())
        .unwrap_or(default_hours)
        .saturating_mul(3600)
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/delivery_test".into(),
            database_max_connections: 1,
            redis_url: "redis://127.0.0.1/".into(),
            jwt_secret: "test-secret".into(),
            jwt_access_expiration_secs: 3600,
            jwt_refresh_expiration_secs: 30 * 24 * 3600,
            server_host: "127.0.0.1".into(),
            server_port: 3000,
            api_base_uri: "/api/v1".into(),
            registration_bypass_code: None,
        }
    }
}
