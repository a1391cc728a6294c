//! Project and conversation persistence
//!
//! Storage is a capability trait so the lifecycle service can be tested
//! against in-memory stores and production can plug in a durable backend.
//! Conversations are keyed by project id (1:1 with projects).

use crate::error::PlatformError;
use crate::model::{ConversationRecord, ProjectDescriptor};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<ProjectDescriptor>, PlatformError>;
    async fn put(&self, project: ProjectDescriptor) -> Result<(), PlatformError>;
    async fn delete(&self, id: Uuid) -> Result<bool, PlatformError>;
    async fn list(&self) -> Result<Vec<ProjectDescriptor>, PlatformError>;
}

#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn get(&self, project_id: Uuid) -> Result<Option<ConversationRecord>, PlatformError>;
    async fn put(&self, conversation: ConversationRecord) -> Result<(), PlatformError>;
    async fn delete(&self, project_id: Uuid) -> Result<bool, PlatformError>;
}

/// In-memory project store backed by a `RwLock<HashMap>`
#[derive(Debug, Default)]
pub struct InMemoryProjectStore {
    projects: RwLock<HashMap<Uuid, ProjectDescriptor>>,
}

impl InMemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectStore for InMemoryProjectStore {
    async fn get(&self, id: Uuid) -> Result<Option<ProjectDescriptor>, PlatformError> {
        Ok(self.projects.read().unwrap().get(&id).cloned())
    }

    async fn put(&self, project: ProjectDescriptor) -> Result<(), PlatformError> {
        self.projects.write().unwrap().insert(project.id, project);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, PlatformError> {
        Ok(self.projects.write().unwrap().remove(&id).is_some())
    }

    async fn list(&self) -> Result<Vec<ProjectDescriptor>, PlatformError> {
        let mut projects: Vec<_> = self.projects.read().unwrap().values().cloned().collect();
        projects.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(projects)
    }
}

/// In-memory conversation store, keyed by project id
#[derive(Debug, Default)]
pub struct InMemoryConversationStore {
    conversations: RwLock<HashMap<Uuid, ConversationRecord>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn get(&self, project_id: Uuid) -> Result<Option<ConversationRecord>, PlatformError> {
        Ok(self
            .conversations
            .read()
            .unwrap()
            .get(&project_id)
            .cloned())
    }

    async fn put(&self, conversation: ConversationRecord) -> Result<(), PlatformError> {
        self.conversations
            .write()
            .unwrap()
            .insert(conversation.project_id, conversation);
        Ok(())
    }

    async fn delete(&self, project_id: Uuid) -> Result<bool, PlatformError> {
        Ok(self
            .conversations
            .write()
            .unwrap()
            .remove(&project_id)
            .is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_project_store_roundtrip() {
        let store = InMemoryProjectStore::new();
        let project = ProjectDescriptor::new("Todo", "a todo app");
        let id = project.id;

        store.put(project).await.unwrap();
        let loaded = store.get(id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Todo");

        assert!(store.delete(id).await.unwrap());
        assert!(store.get(id).await.unwrap().is_none());
        assert!(!store.delete(id).await.unwrap());
    }

    #[tokio::test]
    async fn test_project_list_ordered_by_creation() {
        let store = InMemoryProjectStore::new();
        let first = ProjectDescriptor::new("A", "first");
        let second = ProjectDescriptor::new("B", "second");
        store.put(second.clone()).await.unwrap();
        store.put(first.clone()).await.unwrap();

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed[0].created_at <= listed[1].created_at);
    }

    #[tokio::test]
    async fn test_conversation_store_keyed_by_project() {
        let store = InMemoryConversationStore::new();
        let project_id = Uuid::new_v4();
        let conversation = ConversationRecord::new(project_id);

        store.put(conversation).await.unwrap();
        assert!(store.get(project_id).await.unwrap().is_some());
        assert!(store.get(Uuid::new_v4()).await.unwrap().is_none());

        assert!(store.delete(project_id).await.unwrap());
        assert!(store.get(project_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = InMemoryProjectStore::new();
        let mut project = ProjectDescriptor::new("Todo", "a todo app");
        let id = project.id;
        store.put(project.clone()).await.unwrap();

        project.name = "Renamed".to_string();
        store.put(project).await.unwrap();

        assert_eq!(store.get(id).await.unwrap().unwrap().name, "Renamed");
        assert_eq!(store.list().await.unwrap().len(), 1);
    }
}
