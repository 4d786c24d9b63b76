//! The three context files shown in the chat sidebar and how they map onto workspace files.

use serde::Serialize;

use super::protocol::{AgentFileEntry, AgentsFilesListResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContextId {
    LongTerm,
    ShortTerm,
    Preferences,
}

/// A context slot resolved against the agent's file listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextEntry {
    pub id: ContextId,
    /// Translation key for the tab title.
    pub label_key: &'static str,
    /// Translation key for the tab subtitle; takes a `{file}` param.
    pub description_key: &'static str,
    pub name: String,
    pub missing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at_ms: Option<i64>,
}

struct ContextDefinition {
    id: ContextId,
    label_key: &'static str,
    description_key: &'static str,
    /// Accepted file names, most preferred first.
    names: &'static [&'static str],
    default_name: &'static str,
}

const CONTEXT_DEFINITIONS: &[ContextDefinition] = &[
    ContextDefinition {
        id: ContextId::LongTerm,
        label_key: "Long-term memory",
        description_key: "Stored in {file}",
        names: &["MEMORY.md", "memory.md"],
        default_name: "MEMORY.md",
    },
    ContextDefinition {
        id: ContextId::ShortTerm,
        label_key: "Short-term memory",
        description_key: "Stored in {file}",
        names: &["HEARTBEAT.md"],
        default_name: "HEARTBEAT.md",
    },
    ContextDefinition {
        id: ContextId::Preferences,
        label_key: "User preferences",
        description_key: "Stored in {file}",
        names: &["USER.md"],
        default_name: "USER.md",
    },
];

fn resolve_file_entry<'a>(
    list: Option<&'a AgentsFilesListResult>,
    names: &[&str],
) -> Option<&'a AgentFileEntry> {
    let list = list?;
    names
        .iter()
        .find_map(|name| list.files.iter().find(|f| f.name == *name))
}

/// One entry per context slot, in fixed order. Slots without a listed file use the default
/// name and are marked missing.
pub fn resolve_context_entries(list: Option<&AgentsFilesListResult>) -> Vec<ContextEntry> {
    CONTEXT_DEFINITIONS
        .iter()
        .map(|def| match resolve_file_entry(list, def.names) {
            Some(entry) => ContextEntry {
                id: def.id,
                label_key: def.label_key,
                description_key: def.description_key,
                name: entry.name.clone(),
                missing: entry.missing,
                size: entry.size,
                updated_at_ms: entry.updated_at_ms,
            },
            None => ContextEntry {
                id: def.id,
                label_key: def.label_key,
                description_key: def.description_key,
                name: def.default_name.to_string(),
                missing: true,
                size: None,
                updated_at_ms: None,
            },
        })
        .collect()
}
