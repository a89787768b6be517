use std::env;

use crate::error::ConfigError;

const DEFAULT_FOODFIGHT_CHANNEL: &str = "CCJ0UTRMM";
const DEFAULT_SLACK_API_BASE_URL: &str = "https://slack.com/api";
const DEFAULT_DADJOKE_API_URL: &str = "https://icanhazdadjoke.com/";
const DEFAULT_SIGNATURE_MAX_AGE_SECS: i64 = 60 * 5;

/// Process-wide settings, read once when the Lambda starts.
#[derive(Debug, Clone)]
pub struct Config {
    pub signing_secret: String,
    pub bot_token: String,
    pub foodfight_channel: String,
    pub slack_api_base_url: String,
    pub dadjoke_api_url: String,
    pub signature_max_age_secs: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        let optional = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let signature_max_age_secs = match lookup("SLACK_SIGNATURE_MAX_AGE_SECS") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "SLACK_SIGNATURE_MAX_AGE_SECS",
                value,
            })?,
            None => DEFAULT_SIGNATURE_MAX_AGE_SECS,
        };

        Ok(Self {
            signing_secret: required("SLACK_SIGNING_SECRET")?,
            bot_token: required("SLACK_BOT_TOKEN")?,
            foodfight_channel: optional("FOODFIGHT_CHANNEL_ID", DEFAULT_FOODFIGHT_CHANNEL),
            slack_api_base_url: optional("SLACK_API_BASE_URL", DEFAULT_SLACK_API_BASE_URL),
            dadjoke_api_url: optional("DADJOKE_API_URL", DEFAULT_DADJOKE_API_URL),
            signature_max_age_secs,
        })
    }
}
