//! In-memory backend.
//!
//! Reference implementation of the port semantics and the backend tests run
//! against. Conditional writes happen under the map's per-entry lock, which
//! is what makes two racing updates resolve to exactly one winner.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures_util::{stream, StreamExt};
use uuid::Uuid;

use crate::document::{Etag, RawDocument};
use crate::error::StoreError;
use crate::partition::PartitionKey;
use crate::ports::{DocumentStore, DocumentStream, WritePrecondition};
use crate::query::DocumentQuery;

type Key = (String, Uuid);

/// In-memory document container keyed by (partition key, id)
#[derive(Default)]
pub struct MemoryStore {
    documents: DashMap<Key, RawDocument>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(id: Uuid, partition_key: &PartitionKey) -> Key {
        (partition_key.as_str().to_string(), id)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn read(
        &self,
        id: Uuid,
        partition_key: &PartitionKey,
    ) -> Result<Option<RawDocument>, StoreError> {
        Ok(self
            .documents
            .get(&Self::key(id, partition_key))
            .map(|entry| entry.value().clone()))
    }

    async fn write(
        &self,
        document: &RawDocument,
        precondition: WritePrecondition,
    ) -> Result<Etag, StoreError> {
        let key = Self::key(document.id, &document.partition_key);
        match self.documents.entry(key) {
            Entry::Occupied(mut occupied) => match precondition {
                WritePrecondition::MustBeNew => Err(StoreError::already_exists(
                    document.entity_type,
                    document.id,
                )),
                WritePrecondition::IfMatch(expected) => {
                    let current = occupied.get();
                    if current.etag.as_ref() != Some(&expected) {
                        tracing::warn!(id = %document.id, "rejected stale write");
                        return Err(StoreError::version_conflict(document.id));
                    }
                    let etag = Etag::generate();
                    let mut stored = document.clone();
                    stored.etag = Some(etag.clone());
                    // created_at is envelope-owned and survives updates
                    stored.created_at = current.created_at;
                    occupied.insert(stored);
                    Ok(etag)
                }
            },
            Entry::Vacant(vacant) => match precondition {
                WritePrecondition::MustBeNew => {
                    let etag = Etag::generate();
                    let mut stored = document.clone();
                    stored.etag = Some(etag.clone());
                    vacant.insert(stored);
                    Ok(etag)
                }
                WritePrecondition::IfMatch(_) => Err(StoreError::not_found(
                    document.entity_type,
                    document.id,
                )),
            },
        }
    }

    async fn delete(&self, id: Uuid, partition_key: &PartitionKey) -> Result<(), StoreError> {
        self.documents.remove(&Self::key(id, partition_key));
        Ok(())
    }

    async fn query(&self, query: DocumentQuery) -> Result<DocumentStream, StoreError> {
        let mut matches: Vec<RawDocument> = self
            .documents
            .iter()
            .filter(|entry| query.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        if let Some(limit) = query.max_results() {
            matches.truncate(limit);
        }
        Ok(stream::iter(matches.into_iter().map(Ok)).boxed())
    }
}
