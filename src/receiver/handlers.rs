use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::blocks::{self, ModalView, SelectOption, TextInput};
use crate::error::HandlerError;
use crate::jokes::JokeSource;
use crate::router::{CommandHandler, CommandRouter, InteractionHandler, InteractionRouter};
use crate::slack_api::{call_and_log, SlackApi};
use crate::types::{InteractionPayload, Reply, SlashCommandPayload};

pub const FOODFIGHT_COMMAND: &str = "/foodfight";
pub const FOODFIGHT_MODAL: &str = "foodfight-modal";
pub const DADJOKE_COMMAND: &str = "/dadjoke";

const OPINION: &str = "opinion";
const SPICE_LEVEL: &str = "spice_level";
const SPICE_LEVELS: [&str; 4] = ["mild", "medium", "spicy", "nuclear"];

pub fn command_router(api: Arc<dyn SlackApi>, jokes: Arc<dyn JokeSource>) -> CommandRouter {
    CommandRouter::new()
        .register(FOODFIGHT_COMMAND, OpenFoodfightModal { api: api.clone() })
        .register(DADJOKE_COMMAND, PostDadJoke { api, jokes })
}

pub fn interaction_router(api: Arc<dyn SlackApi>, channel: String) -> InteractionRouter {
    InteractionRouter::new().register(FOODFIGHT_MODAL, AnnounceFoodfight { api, channel })
}

/// `/foodfight [take]` opens a modal prefilled with the take.
pub struct OpenFoodfightModal {
    api: Arc<dyn SlackApi>,
}

fn foodfight_modal(initial_opinion: &str) -> ModalView {
    ModalView::new(
        FOODFIGHT_MODAL,
        "Start a food fight",
        vec![
            blocks::section("Send your spiciest food takes. We need more drama!"),
            blocks::input(TextInput {
                id: OPINION,
                label: "Deposit your controversial food opinions here.",
                placeholder: "Example: mayonnaise is nasty",
                initial_value: initial_opinion.to_string(),
                hint: Some(
                    "What do you believe about food that people find appalling? Say it with your chest!",
                ),
            }),
            blocks::select(
                SPICE_LEVEL,
                "How spicy is this opinion?",
                "Select a spice level",
                SPICE_LEVELS
                    .iter()
                    .map(|level| SelectOption::new(*level, *level))
                    .collect(),
            ),
        ],
    )
}

#[async_trait]
impl CommandHandler for OpenFoodfightModal {
    async fn handle(&self, payload: &SlashCommandPayload) -> Result<Reply, HandlerError> {
        let args = json!({
            "trigger_id": payload.trigger_id,
            "view": foodfight_modal(&payload.text),
        });
        call_and_log(self.api.as_ref(), "views.open", args).await;

        Ok(Reply::accepted())
    }
}

/// Posts a submitted food-fight take to the shared channel.
pub struct AnnounceFoodfight {
    api: Arc<dyn SlackApi>,
    channel: String,
}

#[async_trait]
impl InteractionHandler for AnnounceFoodfight {
    async fn handle(&self, payload: &InteractionPayload) -> Result<Reply, HandlerError> {
        let (view, user) = match payload {
            InteractionPayload::ModalSubmission { view, user, .. } => (view, user),
            InteractionPayload::Other { kind, .. } => {
                info!(
                    "Ignoring {} interaction on {}",
                    kind.as_deref().unwrap_or("untyped"),
                    FOODFIGHT_MODAL
                );
                return Ok(Reply::accepted());
            }
        };

        let opinion = view.state.text(&blocks::block_id(OPINION), OPINION)?;
        let spice_level = view.state.selected(&blocks::block_id(SPICE_LEVEL), SPICE_LEVEL)?;
        info!("{} submitted a {} take", user.name, spice_level);

        let args = json!({
            "channel": self.channel,
            "text": format!(
                "Oh dang, y'all! :eyes: <@{}> just started a food fight with a {} take:\n\n\n*{}*\n\n...Discuss!",
                user.id, spice_level, opinion
            ),
        });
        call_and_log(self.api.as_ref(), "chat.postMessage", args).await;

        Ok(Reply::accepted())
    }
}

/// `/dadjoke` posts a joke to the channel it was typed in.
pub struct PostDadJoke {
    api: Arc<dyn SlackApi>,
    jokes: Arc<dyn JokeSource>,
}

#[async_trait]
impl CommandHandler for PostDadJoke {
    async fn handle(&self, payload: &SlashCommandPayload) -> Result<Reply, HandlerError> {
        let joke = match self.jokes.fetch_joke().await {
            Ok(joke) => joke,
            Err(e) => {
                warn!("Could not fetch a dad joke: {}", e);
                return Ok(Reply::ok("Sorry, the joke well is dry right now. Try again later!"));
            }
        };

        let args = json!({
            "channel": payload.channel_id,
            "text": joke,
        });
        call_and_log(self.api.as_ref(), "chat.postMessage", args).await;

        Ok(Reply::accepted())
    }
}
