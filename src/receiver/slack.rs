use chrono::Utc;
use hmac::{Hmac, Mac};
use lambda_http::http::HeaderMap;
use sha2::Sha256;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

pub const TIMESTAMP_HEADER: &str = "X-Slack-Request-Timestamp";
pub const SIGNATURE_HEADER: &str = "X-Slack-Signature";
const VERSION: &str = "v0";

/// Checks Slack's v0 request signature against the shared signing secret.
#[derive(Clone)]
pub struct SignatureVerifier {
    signing_secret: String,
    max_age_secs: i64,
}

impl SignatureVerifier {
    pub fn new(signing_secret: impl Into<String>, max_age_secs: i64) -> Self {
        Self {
            signing_secret: signing_secret.into(),
            max_age_secs,
        }
    }

    pub fn verify(&self, headers: &HeaderMap, body: &[u8]) -> bool {
        self.verify_at(headers, body, Utc::now().timestamp())
    }

    pub fn verify_at(&self, headers: &HeaderMap, body: &[u8], now: i64) -> bool {
        let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

        let (Some(timestamp), Some(signature)) = (header(TIMESTAMP_HEADER), header(SIGNATURE_HEADER))
        else {
            warn!("Slack signature headers missing");
            return false;
        };

        // Replay protection
        let Ok(request_time) = timestamp.parse::<i64>() else {
            warn!("Unparseable Slack timestamp: {}", timestamp);
            return false;
        };
        if now.abs_diff(request_time) > self.max_age_secs.unsigned_abs() {
            warn!("Slack timestamp {} outside the allowed window", timestamp);
            return false;
        }

        let Some(expected) = signature
            .strip_prefix("v0=")
            .and_then(|hex_sig| hex::decode(hex_sig).ok())
        else {
            warn!("Malformed Slack signature header");
            return false;
        };

        let Ok(mut mac) = HmacSha256::new_from_slice(self.signing_secret.as_bytes()) else {
            return false;
        };
        mac.update(format!("{}:{}:", VERSION, timestamp).as_bytes());
        mac.update(body);

        // verify_slice compares in constant time
        mac.verify_slice(&expected).is_ok()
    }
}

/// Produces the `X-Slack-Signature` value for a body, as Slack would.
#[cfg(test)]
pub fn sign(signing_secret: &str, timestamp: &str, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(format!("{}:{}:", VERSION, timestamp).as_bytes());
    mac.update(body);
    format!("{}={}", VERSION, hex::encode(mac.finalize().into_bytes()))
}
