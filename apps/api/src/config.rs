use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash-latest";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Application configuration loaded from environment variables.
/// Startup fails if `GEMINI_API_KEY` is missing or a numeric variable does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub llm_timeout_secs: u64,
    pub llm_max_retries: u32,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    /// Extracted resumes shorter than this are analyzed anyway, with a warning.
    pub min_resume_chars: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let gemini_api_key = lookup("GEMINI_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .context("Required environment variable 'GEMINI_API_KEY' is not set")?;

        Ok(Config {
            gemini_api_key,
            gemini_model: lookup("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_api_base: lookup("GEMINI_API_BASE")
                .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string()),
            llm_timeout_secs: parse_or(&lookup, "LLM_TIMEOUT_SECS", 120)?,
            llm_max_retries: parse_or(&lookup, "LLM_MAX_RETRIES", 0)?,
            upload_dir: lookup("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("uploads")),
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            min_resume_chars: parse_or(&lookup, "MIN_RESUME_CHARS", 50)?,
            port: parse_or(&lookup, "PORT", 3000)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
