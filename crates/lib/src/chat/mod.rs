//! Chat view: message records, transcript assembly and grouping, composer state.
//!
//! The transcript is rebuilt from scratch on each render; item keys are derived from message
//! identity so the render layer can diff between builds.

pub mod compose;
mod items;
mod message;
mod transcript;

pub use items::{ChatItem, GroupedMessage, MessageGroup, RenderItem};
pub use message::{message_key, ChatMessage, Role, UNKNOWN_ROLE};
pub use transcript::{
    build_chat_items, build_chat_items_at, group_messages, TranscriptView, HISTORY_NOTICE_KEY,
    HISTORY_RENDER_LIMIT,
};
