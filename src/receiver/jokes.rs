use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client};

use crate::error::ApiError;

#[async_trait]
pub trait JokeSource: Send + Sync {
    async fn fetch_joke(&self) -> Result<String, ApiError>;
}

/// Plain-text client for icanhazdadjoke.com (or anything speaking the same API).
pub struct DadJokeClient {
    client: Client,
    url: String,
}

impl DadJokeClient {
    pub fn new(url: String) -> Self {
        Self {
            client: Client::new(),
            url,
        }
    }
}

#[async_trait]
impl JokeSource for DadJokeClient {
    async fn fetch_joke(&self) -> Result<String, ApiError> {
        let response = self
            .client
            .get(&self.url)
            .header(ACCEPT, "text/plain")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }

        Ok(response.text().await?.trim().to_string())
    }
}
