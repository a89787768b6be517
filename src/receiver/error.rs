use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Raised when a signed body cannot be turned into a typed payload.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("body is not valid form data: {0}")]
    Form(#[from] serde_urlencoded::de::Error),
    #[error("payload field is not valid interaction JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    Status(reqwest::StatusCode),
}

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("submission is missing {block}.{field}")]
    MissingField { block: String, field: String },
}
