//! Outgoing message payloads.
//!
//! A message carries a room id plus exactly one body field; which field is
//! populated is decided by the message format at construction time.

use serde::{Deserialize, Serialize};

/// Body encoding for an outgoing message.
///
/// Closed set; the configuration selector strings are `text`, `markup`,
/// and `html`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageFormat {
    #[default]
    #[serde(rename = "text")]
    Plain,
    Markup,
    Html,
}

impl MessageFormat {
    /// Parse a configuration selector, case-insensitively.
    ///
    /// A blank selector means plain text; anything else must be one of
    /// the three recognized values.
    pub fn parse_selector(selector: &str) -> Option<MessageFormat> {
        match selector.to_ascii_lowercase().as_str() {
            "" | "text" => Some(MessageFormat::Plain),
            "markup" => Some(MessageFormat::Markup),
            "html" => Some(MessageFormat::Html),
            _ => None,
        }
    }

    /// The selector string as it appears in configuration
    pub fn as_selector(&self) -> &'static str {
        match self {
            MessageFormat::Plain => "text",
            MessageFormat::Markup => "markup",
            MessageFormat::Html => "html",
        }
    }
}

/// Wire payload for one room.
///
/// Exactly one of the three body fields is set. The constructor match is
/// exhaustive over `MessageFormat`, so adding a format without deciding
/// its body field is a compile error rather than a request with no body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    room_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    markup: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    html: Option<String>,
}

impl Message {
    /// Build the payload for one room from already-rendered body text.
    ///
    /// The room id and body are taken as given; validation and rendering
    /// are the caller's responsibility.
    pub fn build(
        room_id: impl Into<String>,
        body: impl Into<String>,
        format: MessageFormat,
    ) -> Self {
        let mut message = Message {
            room_id: room_id.into(),
            text: None,
            markup: None,
            html: None,
        };
        let body = body.into();
        match format {
            MessageFormat::Plain => message.text = Some(body),
            MessageFormat::Markup => message.markup = Some(body),
            MessageFormat::Html => message.html = Some(body),
        }
        message
    }

    /// The room this message is addressed to
    pub fn room_id(&self) -> &str {
        &self.room_id
    }
}
