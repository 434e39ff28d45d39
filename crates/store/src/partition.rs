//! Partition keys and their derivation.
//!
//! The key scheme colocates every entity with its owning aggregate:
//! `user_<user_id>`, `family_<family_id>`, `trip_<trip_id>`. Derivation is a
//! pure function and lives here only - changing the scheme means migrating
//! every stored document, so nothing else is allowed to build key strings.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tripbldr_domain::{FamilyId, TripId, UserId};

use crate::error::StoreError;

/// The owning aggregate a document is colocated with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartitionGroup {
    User(UserId),
    Family(FamilyId),
    Trip(TripId),
}

impl PartitionGroup {
    fn prefix(self) -> &'static str {
        match self {
            Self::User(_) => "user",
            Self::Family(_) => "family",
            Self::Trip(_) => "trip",
        }
    }

    fn grouping_id(self) -> Uuid {
        match self {
            Self::User(id) => id.to_uuid(),
            Self::Family(id) => id.to_uuid(),
            Self::Trip(id) => id.to_uuid(),
        }
    }
}

/// A validated partition key.
///
/// Constructed by [`PartitionKey::derive`] at creation time, or by
/// [`PartitionKey::parse`] when a key read back from a backend must be
/// re-validated. Immutable for the lifetime of the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PartitionKey(String);

impl PartitionKey {
    /// Derive the partition key for an owning aggregate. Pure and
    /// deterministic: the same group always yields the same key.
    pub fn derive(group: PartitionGroup) -> Result<Self, StoreError> {
        let id = group.grouping_id();
        if id.is_nil() {
            return Err(StoreError::invalid_partition_key(format!(
                "nil grouping id for prefix '{}'",
                group.prefix()
            )));
        }
        Ok(Self(format!("{}_{}", group.prefix(), id)))
    }

    pub fn for_user(user_id: UserId) -> Result<Self, StoreError> {
        Self::derive(PartitionGroup::User(user_id))
    }

    pub fn for_family(family_id: FamilyId) -> Result<Self, StoreError> {
        Self::derive(PartitionGroup::Family(family_id))
    }

    pub fn for_trip(trip_id: TripId) -> Result<Self, StoreError> {
        Self::derive(PartitionGroup::Trip(trip_id))
    }

    /// Re-validate a key string coming back from a backend.
    pub fn parse(value: &str) -> Result<Self, StoreError> {
        let (prefix, id) = value.split_once('_').ok_or_else(|| {
            StoreError::invalid_partition_key(format!("missing separator in '{value}'"))
        })?;
        if !matches!(prefix, "user" | "family" | "trip") {
            return Err(StoreError::invalid_partition_key(format!(
                "unknown prefix '{prefix}' in '{value}'"
            )));
        }
        let parsed = Uuid::parse_str(id).map_err(|_| {
            StoreError::invalid_partition_key(format!("malformed grouping id in '{value}'"))
        })?;
        if parsed.is_nil() {
            return Err(StoreError::invalid_partition_key(format!(
                "nil grouping id in '{value}'"
            )));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PartitionKey {
    type Error = StoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PartitionKey> for String {
    fn from(value: PartitionKey) -> Self {
        value.0
    }
}
