//! Application configuration loaded from environment variables.

use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Default maximum request body size: 10 MiB.
const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

/// Default maximum html payload length: 5 MiB of characters.
const DEFAULT_MAX_HTML_SIZE: usize = 5 * 1024 * 1024;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub gemini_api_key: String,
    pub port: u16,
    /// Exact allowed origin, or None for any (extension pages have opaque
    /// origins, so the default is permissive).
    pub cors_origin: Option<String>,
    pub rate_limit_window_ms: u64,
    pub rate_limit_max_requests: u32,
    /// Request body cap in bytes.
    pub max_body_size: usize,
    /// `html` field cap in characters.
    pub max_html_size: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            gemini_api_key: env::var("GEMINI_API_KEY").context("GEMINI_API_KEY must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            cors_origin: env::var("CORS_ORIGIN").ok().filter(|o| o != "*"),
            rate_limit_window_ms: env::var("RATE_LIMIT_WINDOW_MS")
                .unwrap_or_else(|_| "900000".to_string())
                .parse()
                .context("RATE_LIMIT_WINDOW_MS must be a valid number")?,
            rate_limit_max_requests: env::var("RATE_LIMIT_MAX_REQUESTS")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .context("RATE_LIMIT_MAX_REQUESTS must be a valid number")?,
            max_body_size: env::var("MAX_BODY_SIZE")
                .map(|v| v.parse())
                .unwrap_or(Ok(DEFAULT_MAX_BODY_SIZE))
                .context("MAX_BODY_SIZE must be a valid number of bytes")?,
            max_html_size: env::var("MAX_HTML_SIZE")
                .map(|v| v.parse())
                .unwrap_or(Ok(DEFAULT_MAX_HTML_SIZE))
                .context("MAX_HTML_SIZE must be a valid number of characters")?,
        })
    }

    /// A configuration suitable for tests: permissive CORS, generous rate
    /// limit, default caps.
    pub fn for_tests() -> Self {
        Self {
            database_url: String::new(),
            gemini_api_key: String::new(),
            port: 0,
            cors_origin: None,
            rate_limit_window_ms: 1_000,
            rate_limit_max_requests: 10_000,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            max_html_size: DEFAULT_MAX_HTML_SIZE,
        }
    }
}
