//! Document envelope types.
//!
//! [`RawDocument`] is the wire shape crossing the backend port; [`Document`]
//! is the typed envelope handed to callers. Envelope fields on `Document` are
//! private so the id, partition key, and timestamps stay repository-owned -
//! callers mutate the payload only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::{Entity, EntityType};
use crate::error::StoreError;
use crate::partition::PartitionKey;

/// Opaque version token assigned by the backend on every write
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Etag(String);

impl Etag {
    /// Mint a fresh token. Backends call this on every successful write.
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Etag {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for Etag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The generic document shape stored in the unified container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    pub id: Uuid,
    pub partition_key: PartitionKey,
    pub entity_type: EntityType,
    /// Absent only on a not-yet-persisted create request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<Etag>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub body: serde_json::Value,
}

/// A persisted entity with its envelope.
///
/// Only the body is mutable; envelope fields are assigned by the repository
/// and read-only here.
#[derive(Debug, Clone, PartialEq)]
pub struct Document<E> {
    id: Uuid,
    partition_key: PartitionKey,
    etag: Etag,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    body: E,
}

impl<E: Entity> Document<E> {
    pub(crate) fn assemble(
        id: Uuid,
        partition_key: PartitionKey,
        etag: Etag,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        body: E,
    ) -> Self {
        Self {
            id,
            partition_key,
            etag,
            created_at,
            updated_at,
            body,
        }
    }

    pub(crate) fn from_raw(raw: RawDocument) -> Result<Self, StoreError> {
        if raw.entity_type != E::ENTITY_TYPE {
            return Err(StoreError::serialization(format!(
                "document {} is a {}, expected {}",
                raw.id,
                raw.entity_type,
                E::ENTITY_TYPE
            )));
        }
        let etag = raw.etag.ok_or_else(|| {
            StoreError::serialization(format!("stored document {} is missing its etag", raw.id))
        })?;
        let body: E = serde_json::from_value(raw.body)
            .map_err(|e| StoreError::serialization(format!("document {}: {e}", raw.id)))?;
        Ok(Self {
            id: raw.id,
            partition_key: raw.partition_key,
            etag,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
            body,
        })
    }

    pub(crate) fn to_raw(&self) -> Result<RawDocument, StoreError> {
        let body = serde_json::to_value(&self.body)
            .map_err(|e| StoreError::serialization(format!("document {}: {e}", self.id)))?;
        Ok(RawDocument {
            id: self.id,
            partition_key: self.partition_key.clone(),
            entity_type: E::ENTITY_TYPE,
            etag: Some(self.etag.clone()),
            created_at: self.created_at,
            updated_at: self.updated_at,
            body,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn partition_key(&self) -> &PartitionKey {
        &self.partition_key
    }

    pub fn etag(&self) -> &Etag {
        &self.etag
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn body(&self) -> &E {
        &self.body
    }

    /// Mutable access to the payload. The envelope stays untouched; persist
    /// changes with `DocumentRepository::update`.
    pub fn body_mut(&mut self) -> &mut E {
        &mut self.body
    }

    pub fn into_body(self) -> E {
        self.body
    }
}
