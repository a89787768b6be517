use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextObject {
    PlainText { text: String },
    Mrkdwn { text: String },
}

impl TextObject {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::PlainText { text: text.into() }
    }

    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Self::Mrkdwn { text: text.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub text: TextObject,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            text: TextObject::plain(label),
            value: value.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputElement {
    PlainTextInput {
        action_id: String,
        placeholder: TextObject,
        #[serde(skip_serializing_if = "Option::is_none")]
        initial_value: Option<String>,
    },
    StaticSelect {
        action_id: String,
        placeholder: TextObject,
        options: Vec<SelectOption>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Section {
        text: TextObject,
    },
    Input {
        block_id: String,
        label: TextObject,
        element: InputElement,
        #[serde(skip_serializing_if = "Option::is_none")]
        hint: Option<TextObject>,
    },
}

/// Block ids derive from the field id so handlers can find the value again.
pub fn block_id(field_id: &str) -> String {
    format!("{field_id}_block")
}

pub fn section(text: impl Into<String>) -> Block {
    Block::Section {
        text: TextObject::mrkdwn(text),
    }
}

pub struct TextInput {
    pub id: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub initial_value: String,
    pub hint: Option<&'static str>,
}

pub fn input(field: TextInput) -> Block {
    Block::Input {
        block_id: block_id(field.id),
        label: TextObject::plain(field.label),
        element: InputElement::PlainTextInput {
            action_id: field.id.to_string(),
            placeholder: TextObject::plain(field.placeholder),
            initial_value: Some(field.initial_value).filter(|v| !v.is_empty()),
        },
        hint: field.hint.map(TextObject::plain),
    }
}

pub fn select(id: &str, label: &str, placeholder: &str, options: Vec<SelectOption>) -> Block {
    Block::Input {
        block_id: block_id(id),
        label: TextObject::plain(label),
        element: InputElement::StaticSelect {
            action_id: id.to_string(),
            placeholder: TextObject::plain(placeholder),
            options,
        },
        hint: None,
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ModalView {
    #[serde(rename = "type")]
    kind: &'static str,
    pub callback_id: String,
    pub title: TextObject,
    pub submit: TextObject,
    pub blocks: Vec<Block>,
}

impl ModalView {
    pub fn new(callback_id: impl Into<String>, title: impl Into<String>, blocks: Vec<Block>) -> Self {
        Self {
            kind: "modal",
            callback_id: callback_id.into(),
            title: TextObject::plain(title),
            submit: TextObject::plain("Submit"),
            blocks,
        }
    }
}
