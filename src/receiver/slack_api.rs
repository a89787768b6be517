use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::error::ApiError;

/// Slack Web API envelope; every method answers with at least `ok`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ApiResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub warning: Option<String>,
}

#[async_trait]
pub trait SlackApi: Send + Sync {
    async fn call_method(&self, method: &str, args: Value) -> Result<ApiResponse, ApiError>;
}

pub struct SlackClient {
    client: Client,
    bot_token: String,
    base_url: String,
}

impl SlackClient {
    pub fn new(bot_token: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            bot_token,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SlackApi for SlackClient {
    async fn call_method(&self, method: &str, args: Value) -> Result<ApiResponse, ApiError> {
        let response = self
            .client
            .post(format!("{}/{}", self.base_url, method))
            .bearer_auth(&self.bot_token)
            .json(&args)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }

        Ok(response.json::<ApiResponse>().await?)
    }
}

/// Calls a Slack method and only logs the outcome.
///
/// Slack has already been promised an answer by the time this runs, so a
/// failed call must not change it.
pub async fn call_and_log(api: &dyn SlackApi, method: &str, args: Value) {
    match api.call_method(method, args).await {
        Ok(response) if response.ok => {
            if let Some(warning) = response.warning {
                warn!("{} succeeded with warning: {}", method, warning);
            } else {
                info!("{} succeeded", method);
            }
        }
        Ok(response) => {
            error!(
                "{} returned an error: {}",
                method,
                response.error.as_deref().unwrap_or("unknown_error")
            );
        }
        Err(e) => {
            error!("{} failed: {}", method, e);
        }
    }
}
