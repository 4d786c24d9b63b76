//! Context file stores: the gateway-backed store and an in-process one.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::protocol::{
    AgentFileEntry, AgentsFileResult, AgentsFilesListResult, FilesGetParams, FilesListParams,
    FilesSetParams, WsRequest, WsResponse, METHOD_FILES_GET, METHOD_FILES_LIST, METHOD_FILES_SET,
};

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("gateway request failed: {0}")]
    Request(String),
    #[error("gateway api error: {0}")]
    Api(String),
    #[error("invalid gateway payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Named text files in an agent workspace. `None` results mean "nothing to apply".
#[async_trait]
pub trait ContextStore: Send + Sync {
    async fn list(&self, agent_id: &str) -> Result<Option<AgentsFilesListResult>, ContextError>;

    async fn get(&self, agent_id: &str, name: &str)
        -> Result<Option<AgentsFileResult>, ContextError>;

    async fn set(
        &self,
        agent_id: &str,
        name: &str,
        content: &str,
    ) -> Result<Option<AgentsFileResult>, ContextError>;
}

/// Request/response transport to the gateway (WebSocket in the dashboard).
#[async_trait]
pub trait GatewayClient: Send + Sync {
    async fn request(&self, request: WsRequest) -> Result<WsResponse, ContextError>;
}

#[async_trait]
impl<C: GatewayClient + ?Sized> GatewayClient for Arc<C> {
    async fn request(&self, request: WsRequest) -> Result<WsResponse, ContextError> {
        (**self).request(request).await
    }
}

/// [`ContextStore`] over the gateway's `agents.files.*` methods.
pub struct GatewayContextStore<C> {
    client: C,
    next_id: AtomicU64,
}

impl<C: GatewayClient> GatewayContextStore<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            next_id: AtomicU64::new(1),
        }
    }

    async fn call<P, R>(&self, method: &str, params: P) -> Result<Option<R>, ContextError>
    where
        P: serde::Serialize + Send,
        R: serde::de::DeserializeOwned + Send,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed).to_string();
        let req = WsRequest::new(id, method, serde_json::to_value(params)?);
        let res = self.client.request(req).await?;
        if !res.ok {
            return Err(ContextError::Api(
                res.error.unwrap_or_else(|| format!("{} failed", method)),
            ));
        }
        match res.payload {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(payload) => Ok(Some(serde_json::from_value(payload)?)),
        }
    }
}

#[async_trait]
impl<C: GatewayClient> ContextStore for GatewayContextStore<C> {
    async fn list(&self, agent_id: &str) -> Result<Option<AgentsFilesListResult>, ContextError> {
        self.call(
            METHOD_FILES_LIST,
            FilesListParams {
                agent_id: agent_id.to_string(),
            },
        )
        .await
    }

    async fn get(
        &self,
        agent_id: &str,
        name: &str,
    ) -> Result<Option<AgentsFileResult>, ContextError> {
        self.call(
            METHOD_FILES_GET,
            FilesGetParams {
                agent_id: agent_id.to_string(),
                name: name.to_string(),
            },
        )
        .await
    }

    async fn set(
        &self,
        agent_id: &str,
        name: &str,
        content: &str,
    ) -> Result<Option<AgentsFileResult>, ContextError> {
        self.call(
            METHOD_FILES_SET,
            FilesSetParams {
                agent_id: agent_id.to_string(),
                name: name.to_string(),
                content: content.to_string(),
            },
        )
        .await
    }
}

#[derive(Debug, Clone)]
struct StoredFile {
    content: String,
    updated_at_ms: i64,
}

/// In-memory store: agent id -> file name -> content. Unknown agents have no files.
pub struct MemoryContextStore {
    inner: Arc<RwLock<HashMap<String, BTreeMap<String, StoredFile>>>>,
}

impl Default for MemoryContextStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryContextStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Put a file directly, bypassing `set` (seeding).
    pub async fn insert(
        &self,
        agent_id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
        updated_at_ms: i64,
    ) {
        self.inner
            .write()
            .await
            .entry(agent_id.into())
            .or_default()
            .insert(
                name.into(),
                StoredFile {
                    content: content.into(),
                    updated_at_ms,
                },
            );
    }

    fn entry(name: &str, file: &StoredFile, with_content: bool) -> AgentFileEntry {
        AgentFileEntry {
            name: name.to_string(),
            path: None,
            missing: false,
            size: Some(file.content.len() as u64),
            updated_at_ms: Some(file.updated_at_ms),
            content: with_content.then(|| file.content.clone()),
        }
    }
}

#[async_trait]
impl ContextStore for MemoryContextStore {
    async fn list(&self, agent_id: &str) -> Result<Option<AgentsFilesListResult>, ContextError> {
        let g = self.inner.read().await;
        let files: Vec<AgentFileEntry> = g
            .get(agent_id)
            .map(|files| {
                files
                    .iter()
                    .map(|(name, f)| Self::entry(name, f, false))
                    .collect()
            })
            .unwrap_or_default();
        Ok(Some(AgentsFilesListResult {
            agent_id: agent_id.to_string(),
            workspace: None,
            files,
        }))
    }

    async fn get(
        &self,
        agent_id: &str,
        name: &str,
    ) -> Result<Option<AgentsFileResult>, ContextError> {
        let g = self.inner.read().await;
        let file = match g.get(agent_id).and_then(|files| files.get(name)) {
            Some(f) => Self::entry(name, f, true),
            None => AgentFileEntry {
                name: name.to_string(),
                missing: true,
                ..Default::default()
            },
        };
        Ok(Some(AgentsFileResult {
            agent_id: agent_id.to_string(),
            workspace: None,
            file: Some(file),
        }))
    }

    async fn set(
        &self,
        agent_id: &str,
        name: &str,
        content: &str,
    ) -> Result<Option<AgentsFileResult>, ContextError> {
        let stored = StoredFile {
            content: content.to_string(),
            updated_at_ms: crate::format::now_ms(),
        };
        let file = Self::entry(name, &stored, true);
        self.inner
            .write()
            .await
            .entry(agent_id.to_string())
            .or_default()
            .insert(name.to_string(), stored);
        Ok(Some(AgentsFileResult {
            agent_id: agent_id.to_string(),
            workspace: None,
            file: Some(file),
        }))
    }
}
