//! Render items produced by the transcript assembler.

use serde::Serialize;

use super::message::{ChatMessage, Role};

/// One keyed item before grouping.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ChatItem {
    Message {
        key: String,
        message: ChatMessage,
    },
    /// Assistant output still streaming in; `text` is untrimmed.
    #[serde(rename_all = "camelCase")]
    Stream {
        key: String,
        text: String,
        started_at: i64,
    },
    /// Stream is open but no text has arrived yet.
    ReadingIndicator { key: String },
}

impl ChatItem {
    pub fn key(&self) -> &str {
        match self {
            ChatItem::Message { key, .. }
            | ChatItem::Stream { key, .. }
            | ChatItem::ReadingIndicator { key } => key,
        }
    }
}

/// A message inside a group, with its own render key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedMessage {
    pub key: String,
    pub message: ChatMessage,
}

/// Contiguous run of messages sharing one normalized role. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename = "group", rename_all = "camelCase")]
pub struct MessageGroup {
    pub key: String,
    pub role: Role,
    pub messages: Vec<GroupedMessage>,
    /// First message's timestamp, or the assembly time when it had none.
    pub timestamp: i64,
    pub is_streaming: bool,
}

/// What the render layer receives: grouped history, or a standalone stream/indicator item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RenderItem {
    Item(ChatItem),
    Group(MessageGroup),
}

impl RenderItem {
    pub fn key(&self) -> &str {
        match self {
            RenderItem::Item(item) => item.key(),
            RenderItem::Group(g) => &g.key,
        }
    }

    pub fn as_group(&self) -> Option<&MessageGroup> {
        match self {
            RenderItem::Group(g) => Some(g),
            RenderItem::Item(_) => None,
        }
    }

    pub fn as_item(&self) -> Option<&ChatItem> {
        match self {
            RenderItem::Item(item) => Some(item),
            RenderItem::Group(_) => None,
        }
    }
}
