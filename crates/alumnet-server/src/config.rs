//! Server configuration, read from the environment.

use alumnet_auth::AuthConfig;
use alumnet_db::DbConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub db: DbConfig,
    pub auth: AuthConfig,
    /// Registration/resend attempts allowed per email per window.
    pub throttle_limit: u32,
    /// Throttle window length in seconds.
    pub throttle_window_secs: i64,
}

fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

impl ServerConfig {
    /// Build from `ALUMNET_*` environment variables. The JWT key pair
    /// is required; everything else has a development default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let db = DbConfig {
            url: var("ALUMNET_DB_URL").unwrap_or_else(|| "ws://127.0.0.1:8000".into()),
            namespace: var("ALUMNET_DB_NAMESPACE").unwrap_or_else(|| "alumnet".into()),
            database: var("ALUMNET_DB_DATABASE").unwrap_or_else(|| "main".into()),
            username: var("ALUMNET_DB_USERNAME"),
            password: var("ALUMNET_DB_PASSWORD"),
        };

        let auth = AuthConfig {
            jwt_private_key_pem: var("ALUMNET_JWT_PRIVATE_KEY_PEM")
                .ok_or(ConfigError::MissingVar("ALUMNET_JWT_PRIVATE_KEY_PEM"))?,
            jwt_public_key_pem: var("ALUMNET_JWT_PUBLIC_KEY_PEM")
                .ok_or(ConfigError::MissingVar("ALUMNET_JWT_PUBLIC_KEY_PEM"))?,
            pepper: var("ALUMNET_PASSWORD_PEPPER"),
            ..Default::default()
        };

        Ok(Self {
            bind_addr: var("ALUMNET_BIND_ADDR").unwrap_or_else(|| "127.0.0.1:3000".into()),
            db,
            auth,
            throttle_limit: 5,
            throttle_window_secs: 600,
        })
    }
}
