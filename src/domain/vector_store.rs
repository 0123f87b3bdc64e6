//! Vector store backend trait
//!
//! The similarity scores a backend returns are treated as an opaque ordering
//! signal; this crate filters on them but never recomputes or re-ranks.

use std::fmt::Debug;

use async_trait::async_trait;

use super::error::PipelineError;
use super::fragment::{FragmentPayload, ScopeFilter};

/// Declared shape of an existing collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionInfo {
    pub points_count: usize,
    pub dimensions: usize,
}

/// One vector plus payload, ready for upsert.
#[derive(Debug, Clone)]
pub struct VectorRecord {
    pub id: String,
    pub vector: Vec<f32>,
    pub payload: FragmentPayload,
}

impl VectorRecord {
    pub fn new(id: impl Into<String>, vector: Vec<f32>, payload: FragmentPayload) -> Self {
        Self {
            id: id.into(),
            vector,
            payload,
        }
    }
}

/// A raw nearest-neighbor hit in backend relevance order.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub id: String,
    pub score: f32,
    pub payload: FragmentPayload,
}

/// Provider trait for the vector store backend (Qdrant in production).
///
/// Reads are the hot path for this crate; upsert and delete exist for the
/// ingestion and administration layers that share the store.
#[async_trait]
pub trait VectorStore: Send + Sync + Debug {
    /// Describe a collection, or `None` when it does not exist.
    async fn describe_collection(
        &self,
        collection: &str,
    ) -> Result<Option<CollectionInfo>, PipelineError>;

    /// Create a collection with the given vector dimension.
    async fn create_collection(
        &self,
        collection: &str,
        dimensions: usize,
    ) -> Result<(), PipelineError>;

    /// Create a keyword payload index used for scope filtering.
    async fn create_field_index(
        &self,
        collection: &str,
        field: &str,
    ) -> Result<(), PipelineError>;

    /// Nearest-neighbor search restricted to the given scope. No score
    /// cutoff is applied here; thresholding is the caller's job.
    async fn search(
        &self,
        collection: &str,
        vector: Vec<f32>,
        scope: &ScopeFilter,
        limit: usize,
    ) -> Result<Vec<SearchHit>, PipelineError>;

    /// Insert or replace records.
    async fn upsert(
        &self,
        collection: &str,
        records: Vec<VectorRecord>,
    ) -> Result<(), PipelineError>;

    /// Delete points by id.
    async fn delete_points(
        &self,
        collection: &str,
        ids: Vec<String>,
    ) -> Result<(), PipelineError>;

    /// Delete every point matching a scope filter.
    async fn delete_by_scope(
        &self,
        collection: &str,
        scope: &ScopeFilter,
    ) -> Result<(), PipelineError>;
}

#[cfg(test)]
pub mod mock {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    #[derive(Debug, Default)]
    struct MockCollection {
        dimensions: usize,
        records: Vec<VectorRecord>,
    }

    /// In-memory vector store with call counters for provisioning assertions.
    ///
    /// Search returns either the fixed hit list or the stored records in
    /// insertion order with a constant score; relevance ordering is the real
    /// backend's concern, not the mock's.
    #[derive(Debug, Default)]
    pub struct MockVectorStore {
        collections: Mutex<HashMap<String, MockCollection>>,
        fixed_hits: Mutex<Option<Vec<SearchHit>>>,
        create_collection_calls: AtomicUsize,
        create_index_calls: AtomicUsize,
        search_calls: AtomicUsize,
        fail_search: Mutex<Option<String>>,
    }

    impl MockVectorStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-create a collection with a declared dimension.
        pub fn with_collection(self, name: impl Into<String>, dimensions: usize) -> Self {
            self.collections.lock().unwrap().insert(
                name.into(),
                MockCollection {
                    dimensions,
                    records: Vec::new(),
                },
            );
            self
        }

        /// Return these hits from every search, regardless of query.
        pub fn with_search_hits(self, hits: Vec<SearchHit>) -> Self {
            *self.fixed_hits.lock().unwrap() = Some(hits);
            self
        }

        /// Make search fail with a backend-unavailable error.
        pub fn with_search_failure(self, message: impl Into<String>) -> Self {
            *self.fail_search.lock().unwrap() = Some(message.into());
            self
        }

        pub fn create_collection_calls(&self) -> usize {
            self.create_collection_calls.load(Ordering::SeqCst)
        }

        pub fn create_index_calls(&self) -> usize {
            self.create_index_calls.load(Ordering::SeqCst)
        }

        pub fn search_calls(&self) -> usize {
            self.search_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl VectorStore for MockVectorStore {
        async fn describe_collection(
            &self,
            collection: &str,
        ) -> Result<Option<CollectionInfo>, PipelineError> {
            let collections = self.collections.lock().unwrap();

            Ok(collections.get(collection).map(|c| CollectionInfo {
                points_count: c.records.len(),
                dimensions: c.dimensions,
            }))
        }

        async fn create_collection(
            &self,
            collection: &str,
            dimensions: usize,
        ) -> Result<(), PipelineError> {
            self.create_collection_calls.fetch_add(1, Ordering::SeqCst);
            self.collections.lock().unwrap().insert(
                collection.to_string(),
                MockCollection {
                    dimensions,
                    records: Vec::new(),
                },
            );
            Ok(())
        }

        async fn create_field_index(
            &self,
            _collection: &str,
            _field: &str,
        ) -> Result<(), PipelineError> {
            self.create_index_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn search(
            &self,
            collection: &str,
            _vector: Vec<f32>,
            scope: &ScopeFilter,
            limit: usize,
        ) -> Result<Vec<SearchHit>, PipelineError> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);

            if let Some(ref message) = *self.fail_search.lock().unwrap() {
                return Err(PipelineError::search_backend_unavailable(message.clone()));
            }

            if let Some(ref hits) = *self.fixed_hits.lock().unwrap() {
                return Ok(hits.iter().take(limit).cloned().collect());
            }

            let collections = self.collections.lock().unwrap();
            let Some(stored) = collections.get(collection) else {
                return Ok(Vec::new());
            };

            let (field, value) = scope.field_match();
            let hits = stored
                .records
                .iter()
                .filter(|r| match field {
                    "businessId" => r.payload.business_id == value,
                    _ => r.payload.widget_id == value,
                })
                .take(limit)
                .map(|r| SearchHit {
                    id: r.id.clone(),
                    score: 0.9,
                    payload: r.payload.clone(),
                })
                .collect();

            Ok(hits)
        }

        async fn upsert(
            &self,
            collection: &str,
            records: Vec<VectorRecord>,
        ) -> Result<(), PipelineError> {
            let mut collections = self.collections.lock().unwrap();
            let entry = collections.entry(collection.to_string()).or_default();
            entry.records.extend(records);
            Ok(())
        }

        async fn delete_points(
            &self,
            collection: &str,
            ids: Vec<String>,
        ) -> Result<(), PipelineError> {
            let mut collections = self.collections.lock().unwrap();

            if let Some(stored) = collections.get_mut(collection) {
                stored.records.retain(|r| !ids.contains(&r.id));
            }
            Ok(())
        }

        async fn delete_by_scope(
            &self,
            collection: &str,
            scope: &ScopeFilter,
        ) -> Result<(), PipelineError> {
            let mut collections = self.collections.lock().unwrap();

            if let Some(stored) = collections.get_mut(collection) {
                let (field, value) = scope.field_match();
                stored.records.retain(|r| match field {
                    "businessId" => r.payload.business_id != value,
                    _ => r.payload.widget_id != value,
                });
            }
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn payload(business: &str, widget: &str) -> FragmentPayload {
            FragmentPayload::new(business, widget, "item-1", "Doc", "text", "content")
        }

        #[tokio::test]
        async fn test_mock_store_upsert_and_search() {
            let store = MockVectorStore::new().with_collection("kb", 4);

            store
                .upsert(
                    "kb",
                    vec![VectorRecord::new("p1", vec![0.0; 4], payload("biz-1", "wid-1"))],
                )
                .await
                .unwrap();

            let scope = ScopeFilter::for_widget("wid-1").with_business("biz-1");
            let hits = store.search("kb", vec![0.0; 4], &scope, 5).await.unwrap();

            assert_eq!(hits.len(), 1);
            assert_eq!(store.search_calls(), 1);
        }

        #[tokio::test]
        async fn test_mock_store_scope_isolation() {
            let store = MockVectorStore::new().with_collection("kb", 4);

            store
                .upsert(
                    "kb",
                    vec![VectorRecord::new("p1", vec![0.0; 4], payload("biz-1", "wid-1"))],
                )
                .await
                .unwrap();

            let other = ScopeFilter::for_widget("wid-9").with_business("biz-9");
            let hits = store.search("kb", vec![0.0; 4], &other, 5).await.unwrap();

            assert!(hits.is_empty());
        }

        #[tokio::test]
        async fn test_mock_store_delete_by_scope() {
            let store = MockVectorStore::new().with_collection("kb", 4);
            store
                .upsert(
                    "kb",
                    vec![
                        VectorRecord::new("p1", vec![0.0; 4], payload("biz-1", "wid-1")),
                        VectorRecord::new("p2", vec![0.0; 4], payload("biz-2", "wid-2")),
                    ],
                )
                .await
                .unwrap();

            let scope = ScopeFilter::for_widget("wid-1").with_business("biz-1");
            store.delete_by_scope("kb", &scope).await.unwrap();

            let info = store.describe_collection("kb").await.unwrap().unwrap();
            assert_eq!(info.points_count, 1);
        }
    }
}
