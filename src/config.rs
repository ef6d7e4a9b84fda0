use anyhow::{Context, Result};
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,

    // Database
    pub database_url: String,

    // JWT
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub jwt_refresh_expiry_hours: i64,

    // CORS
    pub cors_allowed_origins: String,

    // Question bank
    pub seed_on_start: bool,

    // Rate limiting
    pub auth_requests_per_minute: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let database_url = get_env("DATABASE_URL").unwrap_or_else(|_| {
            format!(
                "postgresql://{}:{}@{}:{}/{}",
                get_env_or_default("POSTGRES_USER", "postgres"),
                get_env_or_default("POSTGRES_PASSWORD", ""),
                get_env_or_default("POSTGRES_HOST", "localhost"),
                get_env_or_default("POSTGRES_PORT", "5432"),
                get_env_or_default("POSTGRES_DB", "screening")
            )
        });

        Ok(Self {
            // Server
            port: get_env_or_default("PORT", "8080").parse().unwrap_or(8080),

            // Database
            database_url,

            // JWT
            jwt_secret: get_env("JWT_SECRET").context("JWT_SECRET is required")?,
            jwt_expiry_hours: get_env_or_default("JWT_EXPIRY_HOURS", "24")
                .parse()
                .unwrap_or(24),
            jwt_refresh_expiry_hours: get_env_or_default("JWT_REFRESH_EXPIRY_HOURS", "168")
                .parse()
                .unwrap_or(168),

            // CORS
            cors_allowed_origins: get_env_or_default("CORS_ALLOWED_ORIGINS", "*"),

            // Question bank seeding is idempotent; safe to leave on
            seed_on_start: get_env_or_default("SEED_ON_START", "true")
                .parse()
                .unwrap_or(true),

            // Rate limiting
            auth_requests_per_minute: get_env_or_default("AUTH_REQUESTS_PER_MINUTE", "30")
                .parse()
                .unwrap_or(30),
        })
    }
}

fn get_env(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("Missing environment variable: {}", key))
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
