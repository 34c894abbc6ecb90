use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub mail_api_url: Option<String>,
    pub mail_api_token: Option<String>,
    pub mail_from_address: String,
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            mail_api_url: env::var("MAIL_API_URL").ok(),
            mail_api_token: env::var("MAIL_API_TOKEN").ok(),
            mail_from_address: env::var("MAIL_FROM_ADDRESS")
                .unwrap_or_else(|_| "no-reply@verdant.community".to_string()),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_default(),
        })
    }
}
