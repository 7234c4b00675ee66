use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer token accepted by the resume endpoints.
    pub api_token: String,
    pub port: u16,
    pub rust_log: String,
    /// LaTeX engine invoked by the renderer.
    pub latex_program: String,
    pub render_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let render_timeout_secs = std::env::var("RENDER_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .context("RENDER_TIMEOUT_SECS must be a whole number of seconds")?;

        Ok(Config {
            api_token: require_env("API_TOKEN")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            latex_program: std::env::var("LATEX_PROGRAM")
                .unwrap_or_else(|_| "pdflatex".to_string()),
            render_timeout: Duration::from_secs(render_timeout_secs),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    let value = std::env::var(key)
        .with_context(|| format!("Required environment variable '{key}' is not set"))?;
    if value.trim().is_empty() {
        anyhow::bail!("Required environment variable '{key}' is empty");
    }
    Ok(value)
}
