//! Composer and status-line state for the chat view: placeholder text, button labels,
//! the compaction toast, and queued message labels.

use serde::{Deserialize, Serialize};

use crate::i18n::Translator;

/// How long "Context compacted" stays visible after compaction finishes.
pub const COMPACTION_TOAST_DURATION_MS: i64 = 5000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompactionStatus {
    pub active: bool,
    pub started_at: Option<i64>,
    pub completed_at: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeTone {
    Info,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub tone: NoticeTone,
    pub text: String,
}

/// Notice for the compaction indicator, if one should be visible at `now_ms`.
pub fn compaction_notice(
    status: Option<&CompactionStatus>,
    now_ms: i64,
    tr: &Translator,
) -> Option<Notice> {
    let status = status?;
    if status.active {
        return Some(Notice {
            tone: NoticeTone::Info,
            text: tr.t("Compacting context..."),
        });
    }
    let completed = status.completed_at.filter(|t| *t != 0)?;
    if now_ms - completed < COMPACTION_TOAST_DURATION_MS {
        return Some(Notice {
            tone: NoticeTone::Success,
            text: tr.t("Context compacted"),
        });
    }
    None
}

/// Image pasted into the composer, held as a data URL until send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatAttachment {
    pub id: String,
    pub data_url: String,
    pub mime_type: String,
}

impl ChatAttachment {
    pub fn new(data_url: impl Into<String>, mime_type: impl Into<String>, now_ms: i64) -> Self {
        Self {
            id: attachment_id(now_ms),
            data_url: data_url.into(),
            mime_type: mime_type.into(),
        }
    }
}

/// `att-<ms>-<7 random chars>`.
pub fn attachment_id(now_ms: i64) -> String {
    let rand = uuid::Uuid::new_v4().simple().to_string();
    format!("att-{}-{}", now_ms, &rand[..7])
}

/// Only image clipboard entries become attachments.
pub fn is_pasteable_image(mime_type: &str) -> bool {
    mime_type.starts_with("image/")
}

/// Message waiting to be sent while the assistant is busy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatQueueItem {
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub attachments: Vec<ChatAttachment>,
}

pub fn queue_item_label(item: &ChatQueueItem, tr: &Translator) -> String {
    if !item.text.is_empty() {
        return item.text.clone();
    }
    if item.attachments.is_empty() {
        return String::new();
    }
    tr.t_with(
        "Image ({count})",
        &[("count", item.attachments.len().to_string().as_str())],
    )
}

/// Inputs deciding the composer's text and buttons.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComposeState {
    pub connected: bool,
    pub sending: bool,
    pub stream_active: bool,
    pub can_abort: bool,
    pub attachment_count: usize,
}

impl ComposeState {
    pub fn is_busy(&self) -> bool {
        self.sending || self.stream_active
    }

    pub fn placeholder(&self, tr: &Translator) -> String {
        if !self.connected {
            tr.t("Connect to the gateway to start chatting…")
        } else if self.attachment_count > 0 {
            tr.t("Add a message or paste more images...")
        } else {
            tr.t("Message (↩ to send, Shift+↩ for line breaks, paste images)")
        }
    }

    /// Primary button: queue while busy, otherwise send.
    pub fn send_label(&self) -> &'static str {
        if self.is_busy() {
            "Queue"
        } else {
            "Send"
        }
    }

    /// Secondary button: stop the running turn when possible, otherwise start a new session.
    pub fn secondary_label(&self) -> &'static str {
        if self.can_abort {
            "Stop"
        } else {
            "New session"
        }
    }

    pub fn secondary_enabled(&self) -> bool {
        self.connected && (self.can_abort || !self.sending)
    }

    pub fn queued_title(&self, queued: usize, tr: &Translator) -> String {
        tr.t_with("Queued ({count})", &[("count", queued.to_string().as_str())])
    }
}
