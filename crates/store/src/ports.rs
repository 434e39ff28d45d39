//! Backend port traits.
//!
//! Any store offering point lookup by (id, partition key), conditional write
//! with a version token, and a partition-scoped filtered query can sit behind
//! [`DocumentStore`]. The repository holds no state of its own; concurrency
//! safety comes entirely from the precondition contract here.

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use uuid::Uuid;

use crate::document::{Etag, RawDocument};
use crate::error::StoreError;
use crate::partition::PartitionKey;
use crate::query::DocumentQuery;

/// A finite, non-restartable sequence of query results in backend-defined order
pub type DocumentStream = BoxStream<'static, Result<RawDocument, StoreError>>;

/// Precondition for a conditional write
#[derive(Debug, Clone, PartialEq)]
pub enum WritePrecondition {
    /// The document must not exist yet (create)
    MustBeNew,
    /// The stored etag must equal this token (update)
    IfMatch(Etag),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Point lookup. `None` when no document exists under the key pair.
    async fn read(
        &self,
        id: Uuid,
        partition_key: &PartitionKey,
    ) -> Result<Option<RawDocument>, StoreError>;

    /// Conditional write. The input etag on `document` is ignored; the
    /// returned token is the stored one after this write.
    ///
    /// Fails with `AlreadyExists` when `MustBeNew` finds a document, with
    /// `VersionConflict` when `IfMatch` finds a different token, and with
    /// `NotFound` when `IfMatch` finds nothing. On failure the stored
    /// document is unchanged.
    async fn write(
        &self,
        document: &RawDocument,
        precondition: WritePrecondition,
    ) -> Result<Etag, StoreError>;

    /// Idempotent removal: deleting an absent document succeeds.
    async fn delete(&self, id: Uuid, partition_key: &PartitionKey) -> Result<(), StoreError>;

    /// Filtered read scoped by the query. Finite; order is backend-defined.
    async fn query(&self, query: DocumentQuery) -> Result<DocumentStream, StoreError>;
}
