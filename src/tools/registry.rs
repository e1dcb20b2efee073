//! Tool registry
//!
//! Concurrent-safe catalog mapping tool ids to instances. Registrations
//! and removals take the write lock; lookups and snapshots take the read
//! lock, so concurrent readers never block each other. The lock is never
//! held across a call into tool code.

use crate::errors::{Result, ToolError};
use crate::tools::types::Tool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

#[derive(Default)]
pub struct ToolRegistry {
    tools: RwLock<HashMap<String, Arc<dyn Tool>>>,
}

impl ToolRegistry {
    /// Create a new empty tool registry
    pub fn new() -> Self {
        Self {
            tools: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new tool.
    ///
    /// Fails without mutating state when the tool's id is empty or already
    /// taken.
    pub async fn register(&self, tool: Arc<dyn Tool>) -> Result<()> {
        let id = tool.descriptor().id;
        if id.is_empty() {
            return Err(ToolError::DuplicateId(id));
        }

        let mut tools = self.tools.write().await;
        if tools.contains_key(&id) {
            return Err(ToolError::DuplicateId(id));
        }

        tools.insert(id.clone(), tool);
        drop(tools);

        info!(tool_id = %id, "registered tool");
        Ok(())
    }

    /// Get the tool registered under the given id
    pub async fn get(&self, id: &str) -> Result<Arc<dyn Tool>> {
        self.tools
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| ToolError::ToolNotFound(id.to_string()))
    }

    /// Snapshot of all registered tools, in no particular order
    pub async fn list(&self) -> Vec<Arc<dyn Tool>> {
        self.tools.read().await.values().cloned().collect()
    }

    /// Remove the tool registered under the given id
    pub async fn unregister(&self, id: &str) -> Result<()> {
        let removed = self.tools.write().await.remove(id);
        if removed.is_none() {
            return Err(ToolError::ToolNotFound(id.to_string()));
        }

        info!(tool_id = %id, "unregistered tool");
        Ok(())
    }

    /// Number of registered tools
    pub async fn len(&self) -> usize {
        self.tools.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tools.read().await.is_empty()
    }
}
