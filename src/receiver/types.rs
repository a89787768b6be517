use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::HandlerError;

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SlashCommandPayload {
    pub command: String,
    pub text: String,
    pub trigger_id: String,
    pub channel_id: String,
    pub user_id: String,
    pub user_name: String,
    pub team_id: String,
    pub response_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct SlackUser {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct SelectedOption {
    pub value: String,
}

/// One input element's state inside a submitted view.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct FieldValue {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub selected_option: Option<SelectedOption>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ViewState {
    #[serde(default)]
    pub values: HashMap<String, HashMap<String, FieldValue>>,
}

impl ViewState {
    pub fn field(&self, block: &str, field: &str) -> Result<&FieldValue, HandlerError> {
        self.values
            .get(block)
            .and_then(|fields| fields.get(field))
            .ok_or_else(|| HandlerError::MissingField {
                block: block.to_string(),
                field: field.to_string(),
            })
    }

    /// Text typed into a plain-text input.
    pub fn text(&self, block: &str, field: &str) -> Result<&str, HandlerError> {
        self.field(block, field)?
            .value
            .as_deref()
            .ok_or_else(|| HandlerError::MissingField {
                block: block.to_string(),
                field: format!("{field}.value"),
            })
    }

    /// Value of the option picked in a select menu.
    pub fn selected(&self, block: &str, field: &str) -> Result<&str, HandlerError> {
        self.field(block, field)?
            .selected_option
            .as_ref()
            .map(|option| option.value.as_str())
            .ok_or_else(|| HandlerError::MissingField {
                block: block.to_string(),
                field: format!("{field}.selected_option"),
            })
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct SubmittedView {
    #[serde(default)]
    pub callback_id: Option<String>,
    #[serde(default)]
    pub state: ViewState,
}

/// Interaction JSON as Slack sends it, before it is classified.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RawInteraction {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub callback_id: Option<String>,
    #[serde(default)]
    pub view: Option<SubmittedView>,
    #[serde(default)]
    pub user: SlackUser,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InteractionPayload {
    ModalSubmission {
        callback_id: Option<String>,
        view: SubmittedView,
        user: SlackUser,
    },
    Other {
        kind: Option<String>,
        callback_id: Option<String>,
        user: SlackUser,
    },
}

impl From<RawInteraction> for InteractionPayload {
    fn from(raw: RawInteraction) -> Self {
        let is_submission = match raw.kind.as_deref() {
            Some("view_submission") => true,
            None => raw.view.is_some(),
            Some(_) => false,
        };

        match raw.view {
            Some(view) if is_submission => InteractionPayload::ModalSubmission {
                callback_id: raw.callback_id,
                view,
                user: raw.user,
            },
            view => InteractionPayload::Other {
                kind: raw.kind,
                callback_id: raw
                    .callback_id
                    .or_else(|| view.and_then(|v| v.callback_id)),
                user: raw.user,
            },
        }
    }
}

impl InteractionPayload {
    /// The top-level callback id wins; a submitted view's own id is the fallback.
    pub fn callback_id(&self) -> Option<&str> {
        match self {
            InteractionPayload::ModalSubmission {
                callback_id, view, ..
            } => callback_id.as_deref().or(view.callback_id.as_deref()),
            InteractionPayload::Other { callback_id, .. } => callback_id.as_deref(),
        }
    }

    pub fn user(&self) -> &SlackUser {
        match self {
            InteractionPayload::ModalSubmission { user, .. } => user,
            InteractionPayload::Other { user, .. } => user,
        }
    }
}

#[derive(Debug)]
pub enum DecodedPayload {
    SlashCommand(SlashCommandPayload),
    Interaction(InteractionPayload),
}

/// Status and body handed back to Slack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub fn accepted() -> Self {
        Self::ok("")
    }

    pub fn bad_request(body: impl Into<String>) -> Self {
        Self::new(400, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn top_level_callback_id_takes_precedence() {
        let raw: RawInteraction = serde_json::from_value(json!({
            "type": "view_submission",
            "callback_id": "outer",
            "view": { "callback_id": "inner", "state": { "values": {} } },
            "user": { "id": "U1", "name": "pat" }
        }))
        .unwrap();

        assert_eq!(InteractionPayload::from(raw).callback_id(), Some("outer"));
    }

    #[test]
    fn falls_back_to_view_callback_id() {
        let raw: RawInteraction = serde_json::from_value(json!({
            "type": "view_submission",
            "view": { "callback_id": "inner", "state": { "values": {} } },
            "user": { "id": "U1" }
        }))
        .unwrap();

        let payload = InteractionPayload::from(raw);
        assert!(matches!(payload, InteractionPayload::ModalSubmission { .. }));
        assert_eq!(payload.callback_id(), Some("inner"));
    }

    #[test]
    fn block_actions_are_classified_as_other() {
        let raw: RawInteraction = serde_json::from_value(json!({
            "type": "block_actions",
            "view": { "callback_id": "inner" },
            "user": { "id": "U1" }
        }))
        .unwrap();

        let payload = InteractionPayload::from(raw);
        assert!(matches!(payload, InteractionPayload::Other { .. }));
        assert_eq!(payload.callback_id(), Some("inner"));
    }

    #[test]
    fn view_state_lookups_report_missing_paths() {
        let state: ViewState = serde_json::from_value(json!({
            "values": {
                "opinion_block": { "opinion": { "type": "plain_text_input", "value": null } }
            }
        }))
        .unwrap();

        let err = state.text("opinion_block", "opinion").unwrap_err();
        assert_eq!(err.to_string(), "submission is missing opinion_block.opinion.value");
        assert!(state.selected("spice_level_block", "spice_level").is_err());
    }
}
