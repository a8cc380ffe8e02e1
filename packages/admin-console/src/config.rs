use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;

/// Console configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub api_url: String,
    pub api_token: Option<String>,
    pub page_limit: u32,
    pub audit_feed_limit: u32,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:4000/api/admin".to_string(),
            api_token: None,
            page_limit: 20,
            audit_feed_limit: 10,
        }
    }
}

impl ConsoleConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let defaults = Self::default();

        Ok(Self {
            api_url: env::var("ADMIN_API_URL").unwrap_or(defaults.api_url),
            api_token: env::var("ADMIN_API_TOKEN").ok().filter(|t| !t.is_empty()),
            page_limit: positive_var("ADMIN_PAGE_LIMIT", defaults.page_limit)?,
            audit_feed_limit: positive_var("ADMIN_AUDIT_FEED_LIMIT", defaults.audit_feed_limit)?,
        })
    }
}

fn positive_var(name: &str, default: u32) -> Result<u32> {
    let Ok(raw) = env::var(name) else {
        return Ok(default);
    };
    let value: u32 = raw
        .trim()
        .parse()
        .with_context(|| format!("{} must be a positive integer", name))?;
    if value == 0 {
        bail!("{} must be a positive integer", name);
    }
    Ok(value)
}
