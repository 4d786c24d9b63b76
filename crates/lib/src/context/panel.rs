//! View model for the context sidebar: tabs, editor text, and which buttons are enabled.

use super::controller::ContextState;
use crate::format::format_ago;
use crate::i18n::Translator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextTab {
    pub name: String,
    pub title: String,
    pub subtitle: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextPanel {
    pub tabs: Vec<ContextTab>,
    pub active_name: String,
    pub draft: String,
    pub dirty: bool,
    /// "Last updated 5m ago", when the file has a modification time.
    pub last_updated: Option<String>,
    pub error: Option<String>,
    pub loading: bool,
    pub placeholder: String,
    pub save_label: String,
    pub can_reload: bool,
    pub can_reset: bool,
    pub can_save: bool,
}

/// Build the sidebar view. `None` when there is nothing to show (render the empty state).
pub fn context_panel(state: &ContextState, tr: &Translator, now_ms: i64) -> Option<ContextPanel> {
    let entries = state.entries();
    let first = entries.first()?;
    let active_name = state.active.as_deref().unwrap_or(first.name.as_str());
    let active = entries
        .iter()
        .find(|e| e.name == active_name)
        .unwrap_or(first);

    let tabs = entries
        .iter()
        .map(|e| ContextTab {
            name: e.name.clone(),
            title: tr.t(e.label_key),
            subtitle: tr.t_with(e.description_key, &[("file", e.name.as_str())]),
            active: e.name == active.name,
        })
        .collect();

    let dirty = state.is_dirty(&active.name);
    let last_updated = active.updated_at_ms.map(|ms| {
        let time = format_ago(ms, now_ms);
        tr.t_with("Last updated {time}", &[("time", time.as_str())])
    });

    Some(ContextPanel {
        tabs,
        active_name: active.name.clone(),
        draft: state.draft(&active.name).to_string(),
        dirty,
        last_updated,
        error: state.error.clone(),
        loading: state.loading,
        placeholder: tr.t("No context file yet."),
        save_label: if state.saving {
            tr.t("Saving…")
        } else {
            tr.t("Save")
        },
        can_reload: !state.loading,
        can_reset: !state.loading && dirty,
        can_save: !state.loading && !state.saving && dirty,
    })
}
