use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Ошибка при запросе к API: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Ошибка API: {status}")]
    BadStatus { status: StatusCode, body: String },
    #[error("Ответ API не является JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Read side of the homework API: everything changed since `from_date`.
#[async_trait]
pub trait HomeworkSource: Send + Sync {
    async fn fetch(&self, from_date: i64) -> Result<Value, FetchError>;
}

#[derive(Clone)]
pub struct PracticumClient {
    http: Client,
    endpoint: Url,
    token: String,
}

impl fmt::Debug for PracticumClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PracticumClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl PracticumClient {
    pub fn new(token: String, endpoint: Url, timeout: Duration) -> Result<Self, FetchError> {
        let http = Client::builder()
            .user_agent("homework-watchbot/0.1")
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            endpoint,
            token,
        })
    }

    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let endpoint = cfg.endpoint_url()?;
        Ok(Self::new(
            cfg.practicum.token.clone(),
            endpoint,
            cfg.request_timeout(),
        )?)
    }

    pub fn build_request(&self, from_date: i64) -> Result<reqwest::Request, FetchError> {
        let request = self
            .http
            .get(self.endpoint.clone())
            .header("Authorization", format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .build()?;
        Ok(request)
    }
}

#[async_trait]
impl HomeworkSource for PracticumClient {
    async fn fetch(&self, from_date: i64) -> Result<Value, FetchError> {
        let request = self.build_request(from_date)?;
        debug!(url=%request.url(), "requesting homework statuses");

        let res = self.http.execute(request).await?;

        let status = res.status();
        if status != StatusCode::OK {
            let body = res.text().await.unwrap_or_default();
            return Err(FetchError::BadStatus { status, body });
        }

        let body = res.text().await?;
        let payload: Value = serde_json::from_str(&body)?;
        Ok(payload)
    }
}
