use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Signing secret for session tokens. Override with JWT_SECRET.
    pub jwt_secret: String,
    /// Session token lifetime. Fixed one-hour window in every tier.
    pub token_ttl_minutes: i64,
    /// Marks the session cookie `Secure` so browsers only send it over TLS.
    pub secure_cookies: bool,
}

/// Placeholder secret for local development. Production deployments must
/// set JWT_SECRET; main() warns loudly when this value survives into prod.
pub const DEV_JWT_SECRET: &str = "storykeep-dev-secret-do-not-deploy";

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // API overrides
        if let Ok(v) = env::var("API_REQUEST_TIMEOUT_SECS") {
            self.api.request_timeout_secs = v.parse().unwrap_or(self.api.request_timeout_secs);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            if !v.is_empty() {
                self.security.jwt_secret = v;
            }
        }
        if let Ok(v) = env::var("SECURITY_TOKEN_TTL_MINUTES") {
            self.security.token_ttl_minutes = v.parse().unwrap_or(self.security.token_ttl_minutes);
        }
        if let Ok(v) = env::var("SECURITY_SECURE_COOKIES") {
            self.security.secure_cookies = v.parse().unwrap_or(self.security.secure_cookies);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                max_connections: 10,
                connection_timeout: 30,
            },
            api: ApiConfig {
                request_timeout_secs: 30,
            },
            security: SecurityConfig {
                jwt_secret: DEV_JWT_SECRET.to_string(),
                token_ttl_minutes: 60,
                secure_cookies: false,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                max_connections: 20,
                connection_timeout: 10,
            },
            api: ApiConfig {
                request_timeout_secs: 30,
            },
            security: SecurityConfig {
                jwt_secret: DEV_JWT_SECRET.to_string(),
                token_ttl_minutes: 60,
                secure_cookies: true,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                max_connections: 50,
                connection_timeout: 5,
            },
            api: ApiConfig {
                request_timeout_secs: 15,
            },
            security: SecurityConfig {
                jwt_secret: DEV_JWT_SECRET.to_string(),
                token_ttl_minutes: 60,
                secure_cookies: true,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

// Helper macros for common checks
#[macro_export]
macro_rules! is_development {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Development)
    };
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}
