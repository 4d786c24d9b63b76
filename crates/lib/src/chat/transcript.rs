//! Transcript assembly: history + tool output + live stream -> keyed, grouped render items.
//!
//! Runs on every render, so it is a single pass over at most `history_limit` history messages
//! plus the tool messages. Input is never mutated; the thinking filter only decides which
//! messages reach the output.

use std::collections::HashSet;

use serde::Deserialize;

use super::items::{ChatItem, GroupedMessage, MessageGroup, RenderItem};
use super::message::{message_key, ChatMessage};

/// History messages rendered at most; older ones are replaced by a notice.
pub const HISTORY_RENDER_LIMIT: usize = 200;

/// Fixed key of the "older messages hidden" notice.
pub const HISTORY_NOTICE_KEY: &str = "chat:history:notice";

/// Everything the assembler needs for one render of a chat session.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptView {
    #[serde(default)]
    pub session_key: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub tool_messages: Vec<ChatMessage>,
    /// `None`: no stream. `Some("")`: stream open, nothing received yet.
    #[serde(default)]
    pub stream: Option<String>,
    #[serde(default)]
    pub stream_started_at: Option<i64>,
    #[serde(default)]
    pub show_thinking: bool,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_history_limit() -> usize {
    HISTORY_RENDER_LIMIT
}

impl TranscriptView {
    pub fn new(session_key: impl Into<String>) -> Self {
        Self {
            session_key: session_key.into(),
            messages: Vec::new(),
            tool_messages: Vec::new(),
            stream: None,
            stream_started_at: None,
            show_thinking: false,
            history_limit: HISTORY_RENDER_LIMIT,
        }
    }
}

/// Build render items using the current time for missing timestamps.
pub fn build_chat_items(view: &TranscriptView) -> Vec<RenderItem> {
    build_chat_items_at(view, chrono::Utc::now().timestamp_millis())
}

/// Build render items; `now_ms` stands in for any timestamp the input lacks.
pub fn build_chat_items_at(view: &TranscriptView, now_ms: i64) -> Vec<RenderItem> {
    let mut items: Vec<ChatItem> = Vec::new();
    let history = &view.messages;
    let limit = view.history_limit.max(1);
    let history_start = history.len().saturating_sub(limit);

    if history_start > 0 {
        items.push(ChatItem::Message {
            key: HISTORY_NOTICE_KEY.to_string(),
            message: ChatMessage::text(
                "system",
                format!(
                    "Showing last {} messages ({} hidden).",
                    limit, history_start
                ),
                Some(now_ms),
            ),
        });
    }

    for (i, msg) in history.iter().enumerate().skip(history_start) {
        if !view.show_thinking && msg.is_tool_result() {
            continue;
        }
        items.push(ChatItem::Message {
            key: message_key(msg, i),
            message: msg.clone(),
        });
    }

    if view.show_thinking {
        for (i, msg) in view.tool_messages.iter().enumerate() {
            items.push(ChatItem::Message {
                key: message_key(msg, i + history.len()),
                message: msg.clone(),
            });
        }
    }

    if let Some(text) = &view.stream {
        let key = match view.stream_started_at {
            Some(ts) => format!("stream:{}:{}", view.session_key, ts),
            None => format!("stream:{}:live", view.session_key),
        };
        if text.trim().is_empty() {
            items.push(ChatItem::ReadingIndicator { key });
        } else {
            items.push(ChatItem::Stream {
                key,
                text: text.clone(),
                started_at: view.stream_started_at.unwrap_or(now_ms),
            });
        }
    }

    warn_duplicate_keys(&items);
    group_messages(items, now_ms)
}

/// Fold consecutive same-role messages into groups; stream and indicator items break groups.
pub fn group_messages(items: Vec<ChatItem>, now_ms: i64) -> Vec<RenderItem> {
    let mut result = Vec::new();
    let mut current: Option<MessageGroup> = None;

    for item in items {
        let (key, message) = match item {
            ChatItem::Message { key, message } => (key, message),
            other => {
                if let Some(group) = current.take() {
                    result.push(RenderItem::Group(group));
                }
                result.push(RenderItem::Item(other));
                continue;
            }
        };

        let role = message.normalized_role.clone();
        if let Some(group) = current.as_mut().filter(|g| g.role == role) {
            group.messages.push(GroupedMessage { key, message });
            continue;
        }
        if let Some(group) = current.take() {
            result.push(RenderItem::Group(group));
        }
        let timestamp = message.timestamp.filter(|ts| *ts != 0).unwrap_or(now_ms);
        current = Some(MessageGroup {
            key: format!("group:{}:{}", role, key),
            role,
            messages: vec![GroupedMessage { key, message }],
            timestamp,
            is_streaming: false,
        });
    }

    if let Some(group) = current {
        result.push(RenderItem::Group(group));
    }
    result
}

/// Duplicate keys only happen when upstream reuses a stable id; they are reported, not fixed.
fn warn_duplicate_keys(items: &[ChatItem]) {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(item.key()) {
            log::warn!("transcript: duplicate render key {}", item.key());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::message::Role;
    use serde_json::json;

    const NOW: i64 = 1_700_000_000_000;

    fn msg(role: &str, id: &str) -> ChatMessage {
        ChatMessage::text(role, format!("{} says {}", role, id), Some(1_000)).with_id(id)
    }

    fn group_roles(out: &[RenderItem]) -> Vec<String> {
        out.iter()
            .filter_map(RenderItem::as_group)
            .map(|g| g.role.to_string())
            .collect()
    }

    #[test]
    fn empty_input_yields_nothing() {
        let view = TranscriptView::new("main");
        assert!(build_chat_items_at(&view, NOW).is_empty());
    }

    #[test]
    fn groups_consecutive_roles() {
        let mut view = TranscriptView::new("main");
        view.messages = vec![
            msg("user", "a"),
            msg("User", "b"),
            msg("assistant", "c"),
            msg("user", "d"),
        ];
        let out = build_chat_items_at(&view, NOW);
        assert_eq!(group_roles(&out), vec!["user", "assistant", "user"]);
        let first = out[0].as_group().unwrap();
        assert_eq!(first.key, "group:user:msg:a");
        assert_eq!(first.messages.len(), 2);
        assert_eq!(first.messages[1].key, "msg:b");
        assert!(!first.is_streaming);
    }

    #[test]
    fn notice_replaces_hidden_history() {
        let mut view = TranscriptView::new("main");
        view.messages = (0..205).map(|i| msg("user", &format!("m{}", i))).collect();
        let out = build_chat_items_at(&view, NOW);

        let notice = out[0].as_group().unwrap();
        assert_eq!(notice.role, Role::System);
        assert_eq!(notice.key, "group:system:chat:history:notice");
        assert_eq!(notice.messages[0].key, HISTORY_NOTICE_KEY);
        assert_eq!(
            notice.messages[0].message.content,
            json!("Showing last 200 messages (5 hidden).")
        );
        assert_eq!(notice.timestamp, NOW);

        let users = out[1].as_group().unwrap();
        assert_eq!(users.messages.len(), 200);
        assert_eq!(users.messages[0].key, "msg:m5");
    }

    #[test]
    fn no_notice_at_limit() {
        let mut view = TranscriptView::new("main");
        view.messages = (0..200).map(|i| msg("user", &format!("m{}", i))).collect();
        let out = build_chat_items_at(&view, NOW);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].as_group().unwrap().messages.len(), 200);
    }

    #[test]
    fn fallback_keys_use_untruncated_index() {
        let mut view = TranscriptView::new("main");
        view.history_limit = 2;
        view.messages = vec![
            ChatMessage::text("user", "a", None),
            ChatMessage::text("user", "b", None),
            ChatMessage::text("user", "c", Some(42)),
        ];
        let out = build_chat_items_at(&view, NOW);
        let users = out[1].as_group().unwrap();
        let keys: Vec<&str> = users.messages.iter().map(|m| m.key.as_str()).collect();
        assert_eq!(keys, vec!["msg:user:1", "msg:user:42:2"]);
        // first message has no timestamp
        assert_eq!(users.timestamp, NOW);
    }

    #[test]
    fn thinking_filter_hides_tool_results() {
        let mut view = TranscriptView::new("main");
        view.messages = vec![
            msg("user", "a"),
            msg("toolResult", "t"),
            msg("assistant", "b"),
        ];
        view.tool_messages = vec![ChatMessage::text("tool", "out", None).with_tool_call_id("call")];

        let hidden = build_chat_items_at(&view, NOW);
        assert_eq!(group_roles(&hidden), vec!["user", "assistant"]);

        view.show_thinking = true;
        let shown = build_chat_items_at(&view, NOW);
        assert_eq!(
            group_roles(&shown),
            vec!["user", "tool-result", "assistant", "tool-result"]
        );
        let last = shown.last().unwrap().as_group().unwrap();
        assert_eq!(last.messages[0].key, "tool:call");
    }

    #[test]
    fn tool_and_function_roles_stay_visible_without_thinking() {
        let mut view = TranscriptView::new("main");
        view.messages = vec![msg("user", "u"), msg("tool", "t"), msg("function", "f")];

        let out = build_chat_items_at(&view, NOW);
        assert_eq!(group_roles(&out), vec!["user", "tool-result"]);
        let tools = out[1].as_group().unwrap();
        let keys: Vec<&str> = tools.messages.iter().map(|m| m.key.as_str()).collect();
        assert_eq!(keys, vec!["msg:t", "msg:f"]);
    }

    #[test]
    fn tool_result_block_hidden_without_thinking() {
        let mut view = TranscriptView::new("main");
        view.messages = vec![
            msg("user", "u"),
            ChatMessage::from_value(&json!({
                "role": "user",
                "id": "b",
                "content": [{ "type": "tool_result", "content": "ok" }]
            })),
        ];
        let out = build_chat_items_at(&view, NOW);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].as_group().unwrap().messages.len(), 1);
    }

    #[test]
    fn zero_history_limit_keeps_latest_message() {
        let mut view = TranscriptView::new("main");
        view.history_limit = 0;
        view.messages = vec![msg("user", "a"), msg("assistant", "b")];
        let out = build_chat_items_at(&view, NOW);
        assert_eq!(out.len(), 2);
        assert_eq!(
            out[0].as_group().unwrap().messages[0].message.content,
            json!("Showing last 1 messages (1 hidden).")
        );
        assert_eq!(out[1].as_group().unwrap().messages[0].key, "msg:b");
    }

    #[test]
    fn tool_fallback_keys_offset_by_history_len() {
        let mut view = TranscriptView::new("main");
        view.show_thinking = true;
        view.messages = vec![ChatMessage::text("tool", "h", None)];
        view.tool_messages = vec![ChatMessage::text("tool", "t", None)];
        let out = build_chat_items_at(&view, NOW);
        let group = out[0].as_group().unwrap();
        let keys: Vec<&str> = group.messages.iter().map(|m| m.key.as_str()).collect();
        assert_eq!(keys, vec!["msg:tool:0", "msg:tool:1"]);
    }

    #[test]
    fn blank_stream_is_reading_indicator() {
        let mut view = TranscriptView::new("main");
        view.messages = vec![msg("user", "a")];
        view.stream = Some("  \n".to_string());
        let out = build_chat_items_at(&view, NOW);
        assert_eq!(out.len(), 2);
        assert_eq!(
            out[1].as_item(),
            Some(&ChatItem::ReadingIndicator {
                key: "stream:main:live".to_string()
            })
        );
    }

    #[test]
    fn stream_keeps_raw_text_and_breaks_groups() {
        let mut view = TranscriptView::new("s1");
        view.stream = Some("  partial".to_string());
        view.stream_started_at = Some(99);
        let out = build_chat_items_at(&view, NOW);
        assert_eq!(
            out,
            vec![RenderItem::Item(ChatItem::Stream {
                key: "stream:s1:99".to_string(),
                text: "  partial".to_string(),
                started_at: 99,
            })]
        );
    }

    #[test]
    fn stream_without_start_uses_now() {
        let mut view = TranscriptView::new("s1");
        view.stream = Some("x".to_string());
        let out = build_chat_items_at(&view, NOW);
        match out[0].as_item() {
            Some(ChatItem::Stream { started_at, key, .. }) => {
                assert_eq!(*started_at, NOW);
                assert_eq!(key, "stream:s1:live");
            }
            other => panic!("expected stream, got {:?}", other),
        }
    }

    #[test]
    fn non_message_items_flush_open_group() {
        let items = vec![
            ChatItem::Message {
                key: "msg:a".into(),
                message: msg("user", "a"),
            },
            ChatItem::ReadingIndicator { key: "r".into() },
            ChatItem::Message {
                key: "msg:b".into(),
                message: msg("user", "b"),
            },
        ];
        let out = group_messages(items, NOW);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].key(), "group:user:msg:a");
        assert_eq!(out[1].key(), "r");
        assert_eq!(out[2].key(), "group:user:msg:b");
    }

    #[test]
    fn serializes_with_kind_tags() {
        let mut view = TranscriptView::new("main");
        view.messages = vec![msg("user", "a")];
        view.stream = Some(String::new());
        view.stream_started_at = Some(7);
        let json = serde_json::to_value(build_chat_items_at(&view, NOW)).unwrap();
        assert_eq!(json[0]["kind"], "group");
        assert_eq!(json[0]["role"], "user");
        assert_eq!(json[0]["isStreaming"], false);
        assert_eq!(json[1]["kind"], "reading-indicator");
        assert_eq!(json[1]["key"], "stream:main:7");
    }
}
