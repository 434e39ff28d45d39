//! Query builder for filtered reads.
//!
//! A query is always scoped to one entity type and, whenever possible, one
//! partition. Cross-partition queries fan out over the whole container and
//! are the expensive path, so they take a separate constructor - the choice
//! is visible at every call site.

use serde_json::Value;

use crate::document::RawDocument;
use crate::entity::EntityType;
use crate::partition::PartitionKey;

/// Equality and membership predicates over top-level body fields
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq { field: String, value: Value },
    In { field: String, values: Vec<Value> },
}

impl Filter {
    /// `field == value`
    pub fn is(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// `field ∈ values`
    pub fn one_of(field: impl Into<String>, values: impl IntoIterator<Item = Value>) -> Self {
        Self::In {
            field: field.into(),
            values: values.into_iter().collect(),
        }
    }

    fn matches(&self, body: &Value) -> bool {
        match self {
            Self::Eq { field, value } => body.get(field) == Some(value),
            Self::In { field, values } => body
                .get(field)
                .is_some_and(|actual| values.iter().any(|v| v == actual)),
        }
    }
}

/// A filtered read over one entity type.
///
/// Both backends evaluate [`DocumentQuery::matches`] for the filter
/// predicates, so filter semantics cannot drift between them. Result order is
/// backend-defined.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentQuery {
    entity_type: EntityType,
    partition_key: Option<PartitionKey>,
    filters: Vec<Filter>,
    limit: Option<usize>,
}

impl DocumentQuery {
    /// A single-partition query: the cheap path. Callers are expected to know
    /// the partition key whenever possible.
    pub fn in_partition(entity_type: EntityType, partition_key: PartitionKey) -> Self {
        Self {
            entity_type,
            partition_key: Some(partition_key),
            filters: Vec::new(),
            limit: None,
        }
    }

    /// A container-wide query: the expensive path. Use only when the
    /// partition cannot be known up front (e.g. resolving an invitation
    /// token).
    pub fn cross_partition(entity_type: EntityType) -> Self {
        Self {
            entity_type,
            partition_key: None,
            filters: Vec::new(),
            limit: None,
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    pub fn partition_key(&self) -> Option<&PartitionKey> {
        self.partition_key.as_ref()
    }

    pub fn max_results(&self) -> Option<usize> {
        self.limit
    }

    /// Whether a stored document satisfies the type, partition, and filter
    /// predicates of this query. The limit is applied by the backend.
    pub fn matches(&self, raw: &RawDocument) -> bool {
        if raw.entity_type != self.entity_type {
            return false;
        }
        if let Some(partition_key) = &self.partition_key {
            if &raw.partition_key != partition_key {
                return false;
            }
        }
        self.filters.iter().all(|f| f.matches(&raw.body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    use crate::document::Etag;
    use tripbldr_domain::TripId;

    fn raw(entity_type: EntityType, partition_key: &PartitionKey, body: Value) -> RawDocument {
        RawDocument {
            id: Uuid::new_v4(),
            partition_key: partition_key.clone(),
            entity_type,
            etag: Some(Etag::generate()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            body,
        }
    }

    #[test]
    fn filters_apply_to_top_level_body_fields() {
        let pk = PartitionKey::for_trip(TripId::new()).expect("derive");
        let doc = raw(
            EntityType::Message,
            &pk,
            json!({"room_id": "general", "redacted": false}),
        );

        let hit = DocumentQuery::in_partition(EntityType::Message, pk.clone())
            .filter(Filter::is("room_id", "general"));
        assert!(hit.matches(&doc));

        let miss = DocumentQuery::in_partition(EntityType::Message, pk.clone())
            .filter(Filter::is("room_id", "logistics"));
        assert!(!miss.matches(&doc));

        let membership = DocumentQuery::in_partition(EntityType::Message, pk)
            .filter(Filter::one_of(
                "room_id",
                [json!("general"), json!("logistics")],
            ));
        assert!(membership.matches(&doc));
    }

    #[test]
    fn partition_scope_and_entity_type_are_enforced() {
        let pk = PartitionKey::for_trip(TripId::new()).expect("derive");
        let other_pk = PartitionKey::for_trip(TripId::new()).expect("derive");
        let doc = raw(EntityType::Message, &pk, json!({}));

        assert!(!DocumentQuery::in_partition(EntityType::Message, other_pk).matches(&doc));
        assert!(!DocumentQuery::cross_partition(EntityType::Poll).matches(&doc));
        assert!(DocumentQuery::cross_partition(EntityType::Message).matches(&doc));
    }

    #[test]
    fn missing_fields_never_match() {
        let pk = PartitionKey::for_trip(TripId::new()).expect("derive");
        let doc = raw(EntityType::Message, &pk, json!({"room_id": "general"}));
        let q = DocumentQuery::in_partition(EntityType::Message, pk)
            .filter(Filter::is("sender", "ana"));
        assert!(!q.matches(&doc));
    }
}
