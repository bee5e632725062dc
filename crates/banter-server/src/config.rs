use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use banter_genai::GatewayConfig;

/// Ten years. Keeps `now + ttl` far inside chrono's range.
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365 * 10;
use banter_genai::config::{
    DEFAULT_GEMINI_BASE_URL, DEFAULT_HUGGINGFACE_MODEL_URL, DEFAULT_IMAGEKIT_UPLOAD_URL,
    DEFAULT_TEXT_MODEL, DEFAULT_VISION_MODEL,
};

/// Process configuration, read once at startup and handed to each component.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub session_ttl_hours: i64,
    pub cookie_secure: bool,
    pub gateway: GatewayConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let host = var_or("BANTER_HOST", "0.0.0.0");
        let port = parse_var(
            "BANTER_PORT",
            std::env::var("PORT").unwrap_or_else(|_| "8080".into()),
        )?;
        let db_path: PathBuf = var_or("BANTER_DB_PATH", "banter.db").into();
        let session_ttl_hours =
            check_session_ttl(parse_var("BANTER_SESSION_TTL_HOURS", "720".into())?)?;
        let cookie_secure: bool = parse_var("BANTER_COOKIE_SECURE", "false".into())?;
        let image_timeout_secs: u64 = parse_var("BANTER_IMAGE_TIMEOUT_SECS", "120".into())?;

        let gateway = GatewayConfig {
            gemini_api_key: secret("GEMINI_API_KEY"),
            gemini_base_url: var_or("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
            default_model: var_or("BANTER_DEFAULT_MODEL", DEFAULT_TEXT_MODEL),
            vision_model: var_or("BANTER_VISION_MODEL", DEFAULT_VISION_MODEL),
            huggingface_api_key: secret("HUGGINGFACE_API_KEY"),
            huggingface_model_url: var_or("HUGGINGFACE_MODEL_URL", DEFAULT_HUGGINGFACE_MODEL_URL),
            image_timeout: Duration::from_secs(image_timeout_secs),
            imagekit_private_key: secret("IMAGEKIT_PRIVATE_KEY"),
            imagekit_upload_url: var_or("IMAGEKIT_UPLOAD_URL", DEFAULT_IMAGEKIT_UPLOAD_URL),
        };

        Ok(Self {
            host,
            port,
            db_path,
            session_ttl_hours,
            cookie_secure,
            gateway,
        })
    }
}

fn check_session_ttl(hours: i64) -> Result<i64> {
    if !(1..=MAX_SESSION_TTL_HOURS).contains(&hours) {
        anyhow::bail!(
            "BANTER_SESSION_TTL_HOURS must be between 1 and {}, got {}",
            MAX_SESSION_TTL_HOURS,
            hours
        );
    }
    Ok(hours)
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.into())
}

fn secret(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T>(name: &str, default: String) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = std::env::var(name).unwrap_or(default);
    raw.trim()
        .parse()
        .with_context(|| format!("Invalid value for {}: '{}'", name, raw))
}
