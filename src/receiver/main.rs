mod blocks;
mod config;
mod decode;
mod error;
mod handlers;
mod jokes;
mod router;
mod slack;
mod slack_api;
mod types;

use std::sync::Arc;

use lambda_http::{http::HeaderMap, run, service_fn, Body, Error, Request, Response};
use tracing::{error, info};

use config::Config;
use jokes::{DadJokeClient, JokeSource};
use router::{CommandRouter, InteractionRouter};
use slack::SignatureVerifier;
use slack_api::{SlackApi, SlackClient};
use types::{DecodedPayload, Reply};

const UNHANDLED_BODY: &str = "TODO: handle Slack commands and interactivity";

/// Everything a request needs, built once per Lambda instance.
struct App {
    verifier: SignatureVerifier,
    commands: CommandRouter,
    interactions: InteractionRouter,
}

impl App {
    fn from_config(config: &Config) -> Self {
        let api: Arc<dyn SlackApi> = Arc::new(SlackClient::new(
            config.bot_token.clone(),
            config.slack_api_base_url.clone(),
        ));
        let jokes: Arc<dyn JokeSource> = Arc::new(DadJokeClient::new(config.dadjoke_api_url.clone()));
        let verifier = SignatureVerifier::new(
            config.signing_secret.clone(),
            config.signature_max_age_secs,
        );

        Self::new(verifier, api, jokes, config.foodfight_channel.clone())
    }

    fn new(
        verifier: SignatureVerifier,
        api: Arc<dyn SlackApi>,
        jokes: Arc<dyn JokeSource>,
        foodfight_channel: String,
    ) -> Self {
        Self {
            verifier,
            commands: handlers::command_router(api.clone(), jokes),
            interactions: handlers::interaction_router(api, foodfight_channel),
        }
    }

    async fn handle(&self, headers: &HeaderMap, body: &[u8]) -> Reply {
        if !self.verifier.verify(headers, body) {
            error!("Invalid request");
            return Reply::bad_request("Invalid request");
        }

        match decode::decode(body) {
            Ok(Some(DecodedPayload::SlashCommand(command))) => self.commands.route(&command).await,
            Ok(Some(DecodedPayload::Interaction(payload))) => self.interactions.route(&payload).await,
            Ok(None) => {
                info!("Request carried neither a command nor a payload");
                Reply::ok(UNHANDLED_BODY)
            }
            Err(e) => {
                error!("Failed to decode Slack request: {}", e);
                Reply::bad_request(format!("Invalid payload: {}", e))
            }
        }
    }
}

async fn function_handler(app: &App, event: Request) -> Result<Response<Body>, Error> {
    // Signatures cover the exact bytes Slack sent
    let body_bytes = event.body().to_vec();
    let reply = app.handle(event.headers(), &body_bytes).await;

    Ok(Response::builder()
        .status(reply.status)
        .header("Content-Type", "text/plain")
        .body(Body::from(reply.body))?)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .without_time()
        .init();

    let config = Config::from_env()?;
    let app = Arc::new(App::from_config(&config));

    run(service_fn(move |event: Request| {
        let app = Arc::clone(&app);
        async move { function_handler(&app, event).await }
    }))
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jokes::testing::StaticJokes;
    use crate::slack::{sign, SIGNATURE_HEADER, TIMESTAMP_HEADER};
    use crate::slack_api::testing::RecordingSlackApi;
    use chrono::Utc;
    use lambda_http::http::StatusCode;

    const SECRET: &str = "test-signing-secret";

    fn app_with(api: Arc<RecordingSlackApi>) -> App {
        App::new(
            SignatureVerifier::new(SECRET, 300),
            api,
            Arc::new(StaticJokes::new(Some("Why did the scarecrow win an award?"))),
            "CFOOD".to_string(),
        )
    }

    fn signed_request(body: &str) -> Request {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = sign(SECRET, &timestamp, body.as_bytes());
        lambda_http::http::Request::builder()
            .method("POST")
            .header("Content-Type", "application/x-www-form-urlencoded")
            .header(TIMESTAMP_HEADER, timestamp)
            .header(SIGNATURE_HEADER, signature)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn interaction_body(payload: serde_json::Value) -> String {
        serde_urlencoded::to_string([("payload", payload.to_string())]).unwrap()
    }

    async fn send(app: &App, request: Request) -> (StatusCode, String) {
        let response = function_handler(app, request).await.unwrap();
        let body = match response.body() {
            Body::Text(text) => text.clone(),
            Body::Empty => String::new(),
            Body::Binary(_) => panic!("Response body is not text"),
        };
        (response.status(), body)
    }

    #[tokio::test]
    async fn foodfight_command_opens_modal() {
        let api = Arc::new(RecordingSlackApi::new());
        let app = app_with(api.clone());

        let request = signed_request("command=/foodfight&text=mayo+is+nasty&trigger_id=T1");
        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "");
        let calls = api.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "views.open");
        assert_eq!(calls[0].1["trigger_id"], "T1");
        let opinion = &calls[0].1["view"]["blocks"][1];
        assert_eq!(opinion["block_id"], "opinion_block");
        assert_eq!(opinion["element"]["initial_value"], "mayo is nasty");
    }

    #[tokio::test]
    async fn unknown_command_is_acknowledged() {
        let api = Arc::new(RecordingSlackApi::new());
        let app = app_with(api.clone());

        let (status, body) = send(&app, signed_request("command=/unknown")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Command /unknown is not recognized");
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn modal_submission_posts_announcement() {
        let api = Arc::new(RecordingSlackApi::new());
        let app = app_with(api.clone());

        let body = interaction_body(serde_json::json!({
            "callback_id": "foodfight-modal",
            "view": { "state": { "values": {
                "opinion_block": { "opinion": { "value": "mayo is nasty" } },
                "spice_level_block": { "spice_level": { "selected_option": { "value": "spicy" } } }
            } } },
            "user": { "id": "U1", "name": "pat" }
        }));
        let (status, reply) = send(&app, signed_request(&body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply, "");
        let calls = api.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "chat.postMessage");
        assert_eq!(calls[0].1["channel"], "CFOOD");
        let text = calls[0].1["text"].as_str().unwrap();
        assert!(text.contains("U1"));
        assert!(text.contains("spicy"));
        assert!(text.contains("mayo is nasty"));
    }

    #[tokio::test]
    async fn bad_signature_is_rejected_without_side_effects() {
        let api = Arc::new(RecordingSlackApi::new());
        let app = app_with(api.clone());

        let mut request = signed_request("command=/foodfight&trigger_id=T1");
        request
            .headers_mut()
            .insert("x-slack-signature", "v0=00".parse().unwrap());
        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Invalid request");
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn unsigned_request_is_rejected() {
        let api = Arc::new(RecordingSlackApi::new());
        let app = app_with(api.clone());

        let request = lambda_http::http::Request::builder()
            .method("POST")
            .body(Body::from("command=/foodfight"))
            .unwrap();
        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Invalid request");
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn unrelated_body_gets_placeholder() {
        let app = app_with(Arc::new(RecordingSlackApi::new()));

        let (status, body) = send(&app, signed_request("token=abc&team_id=T1")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, UNHANDLED_BODY);
    }

    #[tokio::test]
    async fn malformed_payload_is_a_client_error() {
        let api = Arc::new(RecordingSlackApi::new());
        let app = app_with(api.clone());

        let (status, body) = send(&app, signed_request("payload=%7Bnot-json")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.starts_with("Invalid payload"));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn unknown_callback_is_a_client_error() {
        let app = app_with(Arc::new(RecordingSlackApi::new()));

        let body = interaction_body(serde_json::json!({
            "type": "view_submission",
            "view": { "callback_id": "mystery-modal", "state": { "values": {} } },
            "user": { "id": "U1" }
        }));
        let (status, reply) = send(&app, signed_request(&body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(reply, "No handler defined for mystery-modal");
    }

    #[tokio::test]
    async fn dadjoke_command_posts_to_channel() {
        let api = Arc::new(RecordingSlackApi::new());
        let app = app_with(api.clone());

        let (status, body) = send(&app, signed_request("command=%2Fdadjoke&channel_id=C9")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "");
        let calls = api.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1["channel"], "C9");
        assert_eq!(calls[0].1["text"], "Why did the scarecrow win an award?");
    }

    #[tokio::test]
    async fn resubmitted_command_gets_the_same_reply() {
        let api = Arc::new(RecordingSlackApi::new());
        let app = app_with(api.clone());
        let body = "command=/foodfight&text=mayo+is+nasty&trigger_id=T1";

        let first = send(&app, signed_request(body)).await;
        let second = send(&app, signed_request(body)).await;

        assert_eq!(first, second);
        assert_eq!(api.calls().len(), 2);
    }
}
