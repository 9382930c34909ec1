pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::time::Duration;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::services::{ai_service::AIService, session_service::SessionStore};
use reqwest::Client;

#[derive(Clone)]
pub struct AppState {
    pub ai_service: AIService,
    pub sessions: SessionStore,
    pub session_ttl: Duration,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.provider_timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        let ai_service = AIService::new(
            config.groq_api_key.clone(),
            config.groq_api_url.clone(),
            http_client,
        );

        Ok(Self {
            ai_service,
            sessions: SessionStore::new(),
            session_ttl: config.session_ttl(),
        })
    }
}
