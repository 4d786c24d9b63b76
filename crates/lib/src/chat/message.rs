//! Chat message record as seen by the transcript: validated once from loose JSON.
//!
//! History and tool messages arrive from the gateway as arbitrary JSON objects. They are
//! read field-by-field into a [`ChatMessage`] at the boundary; anything malformed is coerced
//! (unknown role, no timestamp, no id) instead of rejected.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Role used when the record has no string `role`.
pub const UNKNOWN_ROLE: &str = "unknown";

/// Normalized role for grouping. Comparison is case-insensitive on the raw role.
///
/// Grouping only: the thinking toggle uses [`ChatMessage::is_tool_result`], which does not
/// treat `tool` or `function` as tool output.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Assistant,
    System,
    /// Tool output (`toolResult`, `tool_result`, `tool`, `function`).
    ToolResult,
    /// Any other role, lowercased.
    Other(String),
}

impl Role {
    pub fn parse(raw: &str) -> Self {
        let lower = raw.trim().to_lowercase();
        match lower.as_str() {
            "user" => Role::User,
            "assistant" => Role::Assistant,
            "system" => Role::System,
            "toolresult" | "tool_result" | "tool-result" | "tool" | "function" => Role::ToolResult,
            _ => Role::Other(lower),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
            Role::ToolResult => "tool-result",
            Role::Other(s) => s,
        }
    }

    pub fn is_tool_result(&self) -> bool {
        matches!(self, Role::ToolResult)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Role::parse(&s))
    }
}

/// A message in the transcript: raw role as sent, normalized role, identity fields, and opaque content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Role string exactly as received (or "unknown"). Used in fallback keys.
    pub role: String,
    #[serde(skip)]
    pub normalized_role: Role,
    /// Epoch milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    pub content: Value,
}

impl ChatMessage {
    /// Read a message from an arbitrary JSON value. Never fails; non-objects become an
    /// "unknown" message with null content.
    pub fn from_value(value: &Value) -> Self {
        let role = value
            .get("role")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_ROLE)
            .to_string();
        let content = value.get("content").cloned().unwrap_or(Value::Null);
        let tool_call_id = non_empty_str(value, "toolCallId").or_else(|| non_empty_str(value, "tool_call_id"));
        let normalized_role = if has_tool_result_block(&content) {
            Role::ToolResult
        } else {
            Role::parse(&role)
        };
        Self {
            role,
            normalized_role,
            timestamp: value.get("timestamp").and_then(json_millis),
            id: non_empty_str(value, "id"),
            message_id: non_empty_str(value, "messageId"),
            tool_call_id,
            content,
        }
    }

    /// Plain text message with the given role.
    pub fn text(role: impl Into<String>, content: impl Into<String>, timestamp: Option<i64>) -> Self {
        let role = role.into();
        Self {
            normalized_role: Role::parse(&role),
            role,
            timestamp,
            id: None,
            message_id: None,
            tool_call_id: None,
            content: Value::String(content.into()),
        }
    }

    /// Hidden when thinking is off: role `toolResult` (any case) or a `tool_result` content
    /// block. The grouping aliases (`tool`, `function`, `tool_result`) stay visible.
    pub fn is_tool_result(&self) -> bool {
        self.role.to_lowercase() == "toolresult" || has_tool_result_block(&self.content)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into()).filter(|s: &String| !s.is_empty());
        self
    }

    pub fn with_tool_call_id(mut self, id: impl Into<String>) -> Self {
        self.tool_call_id = Some(id.into()).filter(|s: &String| !s.is_empty());
        self
    }
}

impl<'de> Deserialize<'de> for ChatMessage {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(ChatMessage::from_value(&value))
    }
}

/// Stable render key for a message at `index`.
///
/// Priority: `tool:<toolCallId>`, `msg:<id>`, `msg:<messageId>`, then the index-based
/// fallbacks `msg:<role>:<timestamp>:<index>` and `msg:<role>:<index>`.
pub fn message_key(message: &ChatMessage, index: usize) -> String {
    if let Some(id) = &message.tool_call_id {
        return format!("tool:{}", id);
    }
    if let Some(id) = &message.id {
        return format!("msg:{}", id);
    }
    if let Some(id) = &message.message_id {
        return format!("msg:{}", id);
    }
    match message.timestamp {
        Some(ts) => format!("msg:{}:{}:{}", message.role, ts, index),
        None => format!("msg:{}:{}", message.role, index),
    }
}

fn non_empty_str(value: &Value, field: &str) -> Option<String> {
    value
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Only JSON numbers count as timestamps; fractional values keep their integer part.
fn json_millis(v: &Value) -> Option<i64> {
    v.as_i64().or_else(|| v.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
}

fn has_tool_result_block(content: &Value) -> bool {
    let Some(blocks) = content.as_array() else {
        return false;
    };
    blocks.iter().any(|b| {
        b.get("type")
            .and_then(Value::as_str)
            .map(|t| {
                let t = t.to_lowercase();
                t == "tool_result" || t == "toolresult"
            })
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn role_parse_is_case_insensitive() {
        assert_eq!(Role::parse("User"), Role::User);
        assert_eq!(Role::parse("ASSISTANT"), Role::Assistant);
        assert_eq!(Role::parse("toolResult"), Role::ToolResult);
        assert_eq!(Role::parse("tool_result"), Role::ToolResult);
        assert_eq!(Role::parse("Function"), Role::ToolResult);
        assert_eq!(Role::parse("Narrator"), Role::Other("narrator".to_string()));
    }

    #[test]
    fn from_value_coerces_malformed_fields() {
        let m = ChatMessage::from_value(&json!({ "role": 7, "timestamp": "soon", "id": 3 }));
        assert_eq!(m.role, "unknown");
        assert_eq!(m.normalized_role, Role::Other("unknown".to_string()));
        assert_eq!(m.timestamp, None);
        assert_eq!(m.id, None);
        assert_eq!(m.content, Value::Null);

        let m = ChatMessage::from_value(&json!("not an object"));
        assert_eq!(m.role, "unknown");
    }

    #[test]
    fn tool_result_block_marks_role() {
        let m = ChatMessage::from_value(&json!({
            "role": "user",
            "content": [{ "type": "tool_result", "content": "ok" }]
        }));
        assert_eq!(m.normalized_role, Role::ToolResult);
        assert_eq!(m.role, "user");
    }

    #[test]
    fn thinking_classification_is_narrower_than_grouping() {
        let hidden = ["toolResult", "TOOLRESULT"];
        for role in hidden {
            assert!(ChatMessage::text(role, "x", None).is_tool_result(), "{}", role);
        }
        for role in ["tool", "function", "tool_result", "tool-result", "user"] {
            let m = ChatMessage::text(role, "x", None);
            assert!(!m.is_tool_result(), "{}", role);
        }
        assert!(ChatMessage::text("function", "x", None).normalized_role.is_tool_result());

        let block = ChatMessage::from_value(&json!({
            "role": "user",
            "content": [{ "type": "tool_result", "content": "ok" }]
        }));
        assert!(block.is_tool_result());
    }

    #[test]
    fn key_priority() {
        let both = ChatMessage::from_value(&json!({
            "role": "toolResult", "toolCallId": "call_1", "id": "m1", "timestamp": 5
        }));
        assert_eq!(message_key(&both, 0), "tool:call_1");

        let ids = ChatMessage::from_value(&json!({ "role": "user", "id": "m1", "messageId": "x" }));
        assert_eq!(message_key(&ids, 4), "msg:m1");

        let mid = ChatMessage::from_value(&json!({ "role": "user", "id": "", "messageId": "x" }));
        assert_eq!(message_key(&mid, 4), "msg:x");

        let ts = ChatMessage::from_value(&json!({ "role": "User", "timestamp": 1700 }));
        assert_eq!(message_key(&ts, 2), "msg:User:1700:2");

        let bare = ChatMessage::from_value(&json!({}));
        assert_eq!(message_key(&bare, 9), "msg:unknown:9");
    }

    #[test]
    fn tool_call_key_ignores_index() {
        let m = ChatMessage::text("tool", "out", Some(1)).with_tool_call_id("abc");
        assert_eq!(message_key(&m, 0), message_key(&m, 321));
        assert_eq!(message_key(&m, 0), "tool:abc");
    }

    #[test]
    fn deserialize_goes_through_boundary() {
        let m: ChatMessage =
            serde_json::from_str(r#"{"role":"assistant","tool_call_id":"c9","content":"hi"}"#)
                .unwrap();
        assert_eq!(m.tool_call_id.as_deref(), Some("c9"));
        assert_eq!(m.normalized_role, Role::Assistant);
    }
}
