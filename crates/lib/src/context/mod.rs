//! Agent context files (long-term memory, short-term memory, user preferences).
//!
//! Files live in the agent workspace behind the gateway; this module resolves which file backs
//! each slot, loads and saves them through a [`ContextStore`], and keeps editor drafts.

mod controller;
mod entries;
mod panel;
mod protocol;
mod store;

pub use controller::{ContextState, LoadOptions};
pub use entries::{resolve_context_entries, ContextEntry, ContextId};
pub use panel::{context_panel, ContextPanel, ContextTab};
pub use protocol::{
    AgentFileEntry, AgentsFileResult, AgentsFilesListResult, FilesGetParams, FilesListParams,
    FilesSetParams, WsRequest, WsResponse, METHOD_FILES_GET, METHOD_FILES_LIST, METHOD_FILES_SET,
};
pub use store::{ContextError, ContextStore, GatewayClient, GatewayContextStore, MemoryContextStore};
