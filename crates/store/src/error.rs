//! Error taxonomy for store operations.
//!
//! Backend-specific failures are wrapped into this fixed set and surfaced to
//! the caller; nothing is retried inside the repository, so a returned error
//! is final for that call.

use uuid::Uuid;

use crate::entity::EntityType;

/// Store operation errors with context for debugging.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Document not found under the given id and partition key.
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: EntityType, id: Uuid },

    /// Create collided with an existing document id in the partition.
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists { entity_type: EntityType, id: Uuid },

    /// The supplied version token is stale; the caller must re-read and retry.
    #[error("version conflict on document {id}: etag is no longer current")]
    VersionConflict { id: Uuid },

    /// Transport or throttling failure from the backend - includes the
    /// operation name for tracing.
    #[error("store unavailable in {operation}: {message}")]
    Unavailable {
        operation: &'static str,
        message: String,
    },

    /// Partition-key derivation or parsing produced an empty or malformed key.
    #[error("invalid partition key: {0}")]
    InvalidPartitionKey(String),

    /// Body encode failure or a corrupt stored document.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    pub fn not_found(entity_type: EntityType, id: Uuid) -> Self {
        Self::NotFound { entity_type, id }
    }

    pub fn already_exists(entity_type: EntityType, id: Uuid) -> Self {
        Self::AlreadyExists { entity_type, id }
    }

    pub fn version_conflict(id: Uuid) -> Self {
        Self::VersionConflict { id }
    }

    /// Create an Unavailable error with operation context.
    pub fn unavailable(operation: &'static str, message: impl ToString) -> Self {
        Self::Unavailable {
            operation,
            message: message.to_string(),
        }
    }

    pub fn invalid_partition_key(message: impl ToString) -> Self {
        Self::InvalidPartitionKey(message.to_string())
    }

    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_version_conflict(&self) -> bool {
        matches!(self, Self::VersionConflict { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_entity_type() {
        let id = Uuid::new_v4();
        let err = StoreError::not_found(EntityType::Trip, id);
        assert!(err.is_not_found());
        assert!(err.to_string().contains("trip not found"));
        assert!(err.to_string().contains(&id.to_string()));
    }

    #[test]
    fn unavailable_carries_operation_context() {
        let err = StoreError::unavailable("query", "connection reset");
        assert_eq!(
            err.to_string(),
            "store unavailable in query: connection reset"
        );
    }
}
