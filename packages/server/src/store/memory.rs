//! In-memory storage implementation for testing and development.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use super::{ContentPatch, ContentRecord, ContentStore, NewContent, StoreResult};

/// In-memory store for content records.
///
/// Useful for testing and development. Not suitable for production as
/// data is lost on restart.
#[derive(Default)]
pub struct MemoryContentStore {
    records: RwLock<HashMap<Uuid, ContentRecord>>,
}

impl MemoryContentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn record_count(&self) -> usize {
        self.records.read().unwrap().len()
    }

    /// Clear all stored data.
    pub fn clear(&self) {
        self.records.write().unwrap().clear();
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn create(&self, draft: NewContent) -> StoreResult<ContentRecord> {
        let now = Utc::now();
        let record = ContentRecord {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            kind: draft.kind,
            provider: draft.provider,
            input_text: draft.input_text,
            reference_posts: draft.reference_posts,
            idea: draft.idea,
            posts: draft.posts,
        };

        self.records
            .write()
            .unwrap()
            .insert(record.id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: Uuid) -> StoreResult<Option<ContentRecord>> {
        Ok(self.records.read().unwrap().get(&id).cloned())
    }

    async fn merge_update(&self, id: Uuid, patch: ContentPatch) -> StoreResult<bool> {
        let mut records = self.records.write().unwrap();
        let Some(record) = records.get_mut(&id) else {
            return Ok(false);
        };

        if let Some(kind) = patch.kind {
            record.kind = kind;
        }
        if let Some(provider) = patch.provider {
            record.provider = provider;
        }
        if let Some(input_text) = patch.input_text {
            record.input_text = input_text;
        }
        if let Some(reference_posts) = patch.reference_posts {
            record.reference_posts = reference_posts;
        }
        if let Some(idea) = patch.idea {
            record.idea = Some(idea);
        }
        if let Some(posts) = patch.posts {
            record.posts = posts;
        }
        record.updated_at = Utc::now();

        Ok(true)
    }

    async fn append_post(&self, id: Uuid, text: &str) -> StoreResult<bool> {
        let mut records = self.records.write().unwrap();
        let Some(record) = records.get_mut(&id) else {
            return Ok(false);
        };

        record.posts.push(text.to_string());
        record.updated_at = Utc::now();
        Ok(true)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.records.write().unwrap().remove(&id).is_some())
    }

    async fn list(&self, skip: i64, limit: i64) -> StoreResult<Vec<ContentRecord>> {
        let records = self.records.read().unwrap();

        let mut all: Vec<ContentRecord> = records.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(all
            .into_iter()
            .skip(skip.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ContentKind;
    use std::sync::Arc;

    fn draft(kind: ContentKind) -> NewContent {
        NewContent {
            kind,
            provider: "gemini".into(),
            input_text: "rockets".into(),
            reference_posts: vec![],
            idea: Some("Title: Reusable rockets".into()),
            posts: vec![],
        }
    }

    #[tokio::test]
    async fn test_record_crud() {
        let store = MemoryContentStore::new();

        let record = store.create(draft(ContentKind::Idea)).await.unwrap();
        assert_eq!(store.record_count(), 1);

        let fetched = store.get(record.id).await.unwrap().unwrap();
        assert_eq!(fetched.input_text, "rockets");
        assert!(fetched.posts.is_empty());

        assert!(store.delete(record.id).await.unwrap());
        assert!(!store.delete(record.id).await.unwrap());
        assert!(store.get(record.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_merge_update_is_shallow() {
        let store = MemoryContentStore::new();
        let record = store.create(draft(ContentKind::Idea)).await.unwrap();

        let patch = ContentPatch {
            idea: Some("edited idea".into()),
            ..Default::default()
        };
        assert!(store.merge_update(record.id, patch).await.unwrap());

        let updated = store.get(record.id).await.unwrap().unwrap();
        assert_eq!(updated.idea.as_deref(), Some("edited idea"));
        // untouched fields survive
        assert_eq!(updated.input_text, "rockets");
        assert_eq!(updated.provider, "gemini");
        assert!(updated.updated_at >= record.updated_at);
    }

    #[tokio::test]
    async fn test_merge_update_missing_id_returns_false() {
        let store = MemoryContentStore::new();
        let patch = ContentPatch {
            idea: Some("x".into()),
            ..Default::default()
        };
        assert!(!store.merge_update(Uuid::new_v4(), patch).await.unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_appends_lose_nothing() {
        let store = Arc::new(MemoryContentStore::new());
        let record = store.create(draft(ContentKind::Idea)).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            let id = record.id;
            handles.push(tokio::spawn(async move {
                store.append_post(id, &format!("post {}", i)).await.unwrap()
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap());
        }

        let updated = store.get(record.id).await.unwrap().unwrap();
        assert_eq!(updated.posts.len(), 16);
    }

    #[tokio::test]
    async fn test_list_most_recent_first() {
        let store = MemoryContentStore::new();
        for _ in 0..5 {
            store.create(draft(ContentKind::Idea)).await.unwrap();
            // distinct created_at values
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }

        let page = store.list(0, 3).await.unwrap();
        assert_eq!(page.len(), 3);
        assert!(page[0].created_at >= page[1].created_at);
        assert!(page[1].created_at >= page[2].created_at);

        let rest = store.list(3, 10).await.unwrap();
        assert_eq!(rest.len(), 2);
    }
}
