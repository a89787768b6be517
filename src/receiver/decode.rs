use std::collections::HashMap;

use crate::error::DecodeError;
use crate::types::{DecodedPayload, InteractionPayload, RawInteraction, SlashCommandPayload};

/// Turns a verified form body into a slash command or an interaction.
///
/// `Ok(None)` means the body carries neither a `command` nor a `payload`
/// field, i.e. an event type this endpoint does not handle yet.
pub fn decode(body: &[u8]) -> Result<Option<DecodedPayload>, DecodeError> {
    let params: HashMap<String, String> = serde_urlencoded::from_bytes(body)?;

    if params.get("command").is_some_and(|c| !c.is_empty()) {
        let get = |key: &str| params.get(key).cloned().unwrap_or_default();
        let command = SlashCommandPayload {
            command: get("command"),
            text: get("text"),
            trigger_id: get("trigger_id"),
            channel_id: get("channel_id"),
            user_id: get("user_id"),
            user_name: get("user_name"),
            team_id: get("team_id"),
            response_url: get("response_url"),
        };
        return Ok(Some(DecodedPayload::SlashCommand(command)));
    }

    if let Some(payload) = params.get("payload").filter(|p| !p.is_empty()) {
        let raw: RawInteraction = serde_json::from_str(payload)?;
        return Ok(Some(DecodedPayload::Interaction(InteractionPayload::from(raw))));
    }

    Ok(None)
}
