use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

pub const DEFAULT_PROVIDER_URL: &str = "https://api.groq.com/openai/v1";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub groq_api_key: String,
    pub groq_api_url: String,
    pub session_ttl_minutes: u64,
    pub generate_rps: u32,
    pub max_upload_mb: usize,
    pub provider_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let groq_api_key = get_env("GROQ_API_KEY").or_else(|_| get_env("groq_api_key"))?;

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", "127.0.0.1:8080"),
            groq_api_key,
            groq_api_url: get_env_or("GROQ_API_URL", DEFAULT_PROVIDER_URL),
            session_ttl_minutes: get_env_parse_or("SESSION_TTL_MINUTES", 60)?,
            generate_rps: get_env_parse_or("GENERATE_RPS", 5)?,
            max_upload_mb: get_env_parse_or("MAX_UPLOAD_MB", 20)?,
            provider_timeout_secs: get_env_parse_or("PROVIDER_TIMEOUT_SECS", 120)?,
        })
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_minutes * 60)
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}
