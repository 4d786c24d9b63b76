//! Context sidebar state: file listing, loaded contents, and unsaved drafts per file.

use std::collections::HashMap;
use std::sync::Arc;

use super::entries::{resolve_context_entries, ContextEntry};
use super::protocol::AgentsFilesListResult;
use super::store::ContextStore;

/// Options for [`ContextState::load_file_content`].
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    /// Reload even when the content is already cached.
    pub force: bool,
    /// Keep a draft the user has edited instead of replacing it with the loaded content.
    pub preserve_draft: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            force: false,
            preserve_draft: true,
        }
    }
}

/// Controller state. Errors from the store are kept as display text in `error`.
#[derive(Default)]
pub struct ContextState {
    store: Option<Arc<dyn ContextStore>>,
    pub connected: bool,
    pub loading: bool,
    pub saving: bool,
    pub error: Option<String>,
    pub files: Option<AgentsFilesListResult>,
    /// Last known saved content per file name.
    pub contents: HashMap<String, String>,
    /// Editor text per file name.
    pub drafts: HashMap<String, String>,
    pub active: Option<String>,
}

impl ContextState {
    pub fn new(store: Arc<dyn ContextStore>) -> Self {
        Self {
            store: Some(store),
            connected: true,
            ..Default::default()
        }
    }

    /// Mark the gateway as gone. The store is kept for [`connect`](Self::connect); until then
    /// list/get/save are skipped. Cached content and drafts stay.
    pub fn disconnect(&mut self) {
        self.connected = false;
    }

    pub fn connect(&mut self, store: Arc<dyn ContextStore>) {
        self.store = Some(store);
        self.connected = true;
    }

    fn ready_store(&self) -> Option<Arc<dyn ContextStore>> {
        if !self.connected {
            return None;
        }
        self.store.clone()
    }

    pub fn entries(&self) -> Vec<ContextEntry> {
        resolve_context_entries(self.files.as_ref())
    }

    /// Fetch the file listing. Clears the active file if it is no longer listed.
    pub async fn load_files(&mut self, agent_id: &str) {
        let Some(store) = self.ready_store() else {
            log::debug!("context: list skipped, not connected");
            return;
        };
        if self.loading {
            log::debug!("context: list skipped, load in progress");
            return;
        }
        self.loading = true;
        self.error = None;
        match store.list(agent_id).await {
            Ok(Some(list)) => {
                if let Some(active) = &self.active {
                    if !list.contains(active) {
                        self.active = None;
                    }
                }
                self.files = Some(list);
            }
            Ok(None) => {}
            Err(e) => {
                log::warn!("context: listing files for {} failed: {}", agent_id, e);
                self.error = Some(e.to_string());
            }
        }
        self.loading = false;
    }

    /// Fetch one file's content and update the listing, base content and (maybe) the draft.
    pub async fn load_file_content(&mut self, agent_id: &str, name: &str, opts: LoadOptions) {
        let Some(store) = self.ready_store() else {
            log::debug!("context: get {} skipped, not connected", name);
            return;
        };
        if self.loading {
            log::debug!("context: get {} skipped, load in progress", name);
            return;
        }
        if !opts.force && self.contents.contains_key(name) {
            return;
        }
        self.loading = true;
        self.error = None;
        match store.get(agent_id, name).await {
            Ok(Some(res)) => {
                if let Some(file) = res.file {
                    let content = file.content.clone().unwrap_or_default();
                    let previous_base = self.contents.get(name).cloned().unwrap_or_default();
                    let keep_draft = opts.preserve_draft
                        && self
                            .drafts
                            .get(name)
                            .is_some_and(|draft| *draft != previous_base);
                    if let Some(files) = self.files.as_mut() {
                        files.merge_entry(file);
                    }
                    self.contents.insert(name.to_string(), content.clone());
                    if !keep_draft {
                        self.drafts.insert(name.to_string(), content);
                    }
                }
            }
            Ok(None) => {}
            Err(e) => {
                log::warn!("context: loading {} for {} failed: {}", name, agent_id, e);
                self.error = Some(e.to_string());
            }
        }
        self.loading = false;
    }

    /// Save `content` as the file's new content. On success it becomes both base and draft.
    pub async fn save_file(&mut self, agent_id: &str, name: &str, content: &str) {
        let Some(store) = self.ready_store() else {
            log::debug!("context: save {} skipped, not connected", name);
            return;
        };
        if self.saving {
            log::debug!("context: save {} skipped, save in progress", name);
            return;
        }
        self.saving = true;
        self.error = None;
        match store.set(agent_id, name, content).await {
            Ok(Some(res)) => {
                if let Some(file) = res.file {
                    if let Some(files) = self.files.as_mut() {
                        files.merge_entry(file);
                    }
                    self.contents.insert(name.to_string(), content.to_string());
                    self.drafts.insert(name.to_string(), content.to_string());
                }
            }
            Ok(None) => {}
            Err(e) => {
                log::warn!("context: saving {} for {} failed: {}", name, agent_id, e);
                self.error = Some(e.to_string());
            }
        }
        self.saving = false;
    }

    /// Save the current draft of `name`.
    pub async fn save_draft(&mut self, agent_id: &str, name: &str) {
        let draft = self.draft(name).to_string();
        self.save_file(agent_id, name, &draft).await;
    }

    pub fn select(&mut self, name: impl Into<String>) {
        self.active = Some(name.into());
    }

    pub fn set_draft(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.drafts.insert(name.into(), value.into());
    }

    /// Put the draft back to the last loaded content.
    pub fn reset_draft(&mut self, name: &str) {
        let base = self.base(name).to_string();
        self.drafts.insert(name.to_string(), base);
    }

    pub fn draft(&self, name: &str) -> &str {
        self.drafts.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn base(&self, name: &str) -> &str {
        self.contents.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn is_dirty(&self, name: &str) -> bool {
        self.draft(name) != self.base(name)
    }
}
