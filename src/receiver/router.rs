use std::collections::HashMap;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::error::HandlerError;
use crate::types::{InteractionPayload, Reply, SlashCommandPayload};

#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, payload: &SlashCommandPayload) -> Result<Reply, HandlerError>;
}

#[async_trait]
pub trait InteractionHandler: Send + Sync {
    async fn handle(&self, payload: &InteractionPayload) -> Result<Reply, HandlerError>;
}

/// Dispatches slash commands by their exact command string.
#[derive(Default)]
pub struct CommandRouter {
    handlers: HashMap<String, Box<dyn CommandHandler>>,
}

impl CommandRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, command: impl Into<String>, handler: impl CommandHandler + 'static) -> Self {
        self.handlers.insert(command.into(), Box::new(handler));
        self
    }

    /// Unknown commands get a 200: Slack retries anything else, and a typo
    /// will not fix itself on retry.
    pub async fn route(&self, payload: &SlashCommandPayload) -> Reply {
        let Some(handler) = self.handlers.get(&payload.command) else {
            info!("Unrecognized command {}", payload.command);
            return Reply::ok(format!("Command {} is not recognized", payload.command));
        };

        info!("Routing command {}", payload.command);
        handler.handle(payload).await.unwrap_or_else(|e| {
            error!("Handler for {} failed: {}", payload.command, e);
            Reply::bad_request(e.to_string())
        })
    }
}

/// Dispatches interactions by callback id.
#[derive(Default)]
pub struct InteractionRouter {
    handlers: HashMap<String, Box<dyn InteractionHandler>>,
}

impl InteractionRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, callback_id: impl Into<String>, handler: impl InteractionHandler + 'static) -> Self {
        self.handlers.insert(callback_id.into(), Box::new(handler));
        self
    }

    /// Unknown callback ids are a 400: the modal and its handler disagree.
    pub async fn route(&self, payload: &InteractionPayload) -> Reply {
        let callback_id = payload.callback_id();
        let Some(handler) = callback_id.and_then(|id| self.handlers.get(id)) else {
            let callback_id = callback_id.unwrap_or("(missing callback_id)");
            warn!("No handler defined for {}", callback_id);
            return Reply::bad_request(format!("No handler defined for {}", callback_id));
        };

        info!(
            "Routing interaction {} from {}",
            callback_id.unwrap_or_default(),
            payload.user().id
        );
        handler.handle(payload).await.unwrap_or_else(|e| {
            error!("Interaction handler failed: {}", e);
            Reply::bad_request(e.to_string())
        })
    }
}
