//! The unified document repository.
//!
//! A stateless mapping layer between typed entities and the generic document
//! shape of the backend. The repository assigns ids, partition keys, and
//! timestamps; optimistic concurrency is delegated to the backend's
//! precondition contract. Errors are surfaced, never retried here.

use std::sync::Arc;

use futures_util::stream::BoxStream;
use futures_util::{StreamExt, TryStreamExt};
use uuid::Uuid;

use tripbldr_domain::{
    FamilyId, Invitation, Itinerary, Message, Poll, RoomId, TravelPreference, Trip, TripId, UserId,
};

use crate::clock::{ClockPort, SystemClock};
use crate::document::{Document, RawDocument};
use crate::entity::{Entity, EntityType};
use crate::error::StoreError;
use crate::partition::PartitionKey;
use crate::ports::{DocumentStore, WritePrecondition};
use crate::query::{DocumentQuery, Filter};

/// A finite stream of typed documents
pub type TypedDocumentStream<E> = BoxStream<'static, Result<Document<E>, StoreError>>;

/// Unified repository over the multi-entity container
pub struct DocumentRepository {
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn ClockPort>,
}

impl DocumentRepository {
    pub fn new(store: Arc<dyn DocumentStore>, clock: Arc<dyn ClockPort>) -> Self {
        Self { store, clock }
    }

    pub fn with_system_clock(store: Arc<dyn DocumentStore>) -> Self {
        Self::new(store, Arc::new(SystemClock))
    }

    /// Persist a new entity. The id comes from the payload's own typed id;
    /// the partition key and timestamps are assigned here.
    pub async fn create<E: Entity>(&self, body: E) -> Result<Document<E>, StoreError> {
        let id = body.document_id();
        let partition_key = PartitionKey::derive(body.partition_group())?;
        let now = self.clock.now();
        let raw = RawDocument {
            id,
            partition_key: partition_key.clone(),
            entity_type: E::ENTITY_TYPE,
            etag: None,
            created_at: now,
            updated_at: now,
            body: serde_json::to_value(&body)
                .map_err(|e| StoreError::serialization(format!("document {id}: {e}")))?,
        };
        let etag = self.store.write(&raw, WritePrecondition::MustBeNew).await?;
        tracing::debug!(%id, %partition_key, entity_type = %E::ENTITY_TYPE, "created document");
        Ok(Document::assemble(id, partition_key, etag, now, now, body))
    }

    /// Point lookup. Both the id and the partition key it was created under
    /// are required; there is no lookup without a partition key.
    pub async fn get<E: Entity>(
        &self,
        id: Uuid,
        partition_key: &PartitionKey,
    ) -> Result<Document<E>, StoreError> {
        let raw = self
            .store
            .read(id, partition_key)
            .await?
            .ok_or_else(|| StoreError::not_found(E::ENTITY_TYPE, id))?;
        if raw.entity_type != E::ENTITY_TYPE {
            // A document of another type under this key is not this entity
            return Err(StoreError::not_found(E::ENTITY_TYPE, id));
        }
        Document::from_raw(raw)
    }

    /// Persist a modified payload. The document's etag must still be current;
    /// a stale token yields `VersionConflict` and the caller must re-read and
    /// retry - there is no merge and no retry here.
    pub async fn update<E: Entity>(&self, document: &Document<E>) -> Result<Document<E>, StoreError> {
        let now = self.clock.now();
        let mut raw = document.to_raw()?;
        raw.updated_at = now;
        let etag = self
            .store
            .write(&raw, WritePrecondition::IfMatch(document.etag().clone()))
            .await?;
        tracing::debug!(
            id = %document.id(),
            partition_key = %document.partition_key(),
            entity_type = %E::ENTITY_TYPE,
            "updated document"
        );
        Ok(Document::assemble(
            document.id(),
            document.partition_key().clone(),
            etag,
            document.created_at(),
            now,
            document.body().clone(),
        ))
    }

    /// Permanent removal. Idempotent: deleting an absent id succeeds.
    pub async fn delete(&self, id: Uuid, partition_key: &PartitionKey) -> Result<(), StoreError> {
        self.store.delete(id, partition_key).await?;
        tracing::debug!(%id, %partition_key, "deleted document");
        Ok(())
    }

    /// Filtered read. Returns a finite, non-restartable stream in
    /// backend-defined order.
    pub async fn query<E: Entity>(
        &self,
        query: DocumentQuery,
    ) -> Result<TypedDocumentStream<E>, StoreError> {
        if query.entity_type() != E::ENTITY_TYPE {
            return Err(StoreError::serialization(format!(
                "query over {} cannot yield {} documents",
                query.entity_type(),
                E::ENTITY_TYPE
            )));
        }
        let stream = self.store.query(query).await?;
        Ok(stream
            .map(|result| result.and_then(Document::<E>::from_raw))
            .boxed())
    }

    async fn collect<E: Entity>(
        &self,
        query: DocumentQuery,
    ) -> Result<Vec<Document<E>>, StoreError> {
        self.query::<E>(query).await?.try_collect().await
    }
}

/// Typed lookups used by the API and worker layers. Single-partition wherever
/// the owning aggregate is known; the cross-partition ones are the documented
/// expensive path.
impl DocumentRepository {
    /// Chat history of one room, single partition.
    pub async fn messages_in_room(
        &self,
        trip_id: TripId,
        room_id: RoomId,
    ) -> Result<Vec<Document<Message>>, StoreError> {
        let partition_key = PartitionKey::for_trip(trip_id)?;
        self.collect(
            DocumentQuery::in_partition(EntityType::Message, partition_key)
                .filter(Filter::is("room_id", room_id.to_string())),
        )
        .await
    }

    /// All invitations of a family, single partition.
    pub async fn invitations_for_family(
        &self,
        family_id: FamilyId,
    ) -> Result<Vec<Document<Invitation>>, StoreError> {
        let partition_key = PartitionKey::for_family(family_id)?;
        self.collect(DocumentQuery::in_partition(
            EntityType::Invitation,
            partition_key,
        ))
        .await
    }

    /// Resolve an invitation from its emailed token. The partition cannot be
    /// known from the token, so this fans out over the container.
    pub async fn invitation_by_token(
        &self,
        token: &str,
    ) -> Result<Option<Document<Invitation>>, StoreError> {
        let mut matches = self
            .collect::<Invitation>(
                DocumentQuery::cross_partition(EntityType::Invitation)
                    .filter(Filter::is("token", token))
                    .limit(1),
            )
            .await?;
        Ok(matches.pop())
    }

    /// Trips organized by a user. Trips partition by their own id, so this
    /// fans out over the container.
    pub async fn trips_organized_by(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Document<Trip>>, StoreError> {
        self.collect(
            DocumentQuery::cross_partition(EntityType::Trip)
                .filter(Filter::is("organizer_user_id", user_id.to_string())),
        )
        .await
    }

    /// General and trip-scoped preferences of a user, single partition.
    pub async fn preferences_of_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Document<TravelPreference>>, StoreError> {
        let partition_key = PartitionKey::for_user(user_id)?;
        self.collect(DocumentQuery::in_partition(
            EntityType::Preference,
            partition_key,
        ))
        .await
    }

    /// Polls attached to a trip, single partition.
    pub async fn polls_for_trip(&self, trip_id: TripId) -> Result<Vec<Document<Poll>>, StoreError> {
        let partition_key = PartitionKey::for_trip(trip_id)?;
        self.collect(DocumentQuery::in_partition(EntityType::Poll, partition_key))
            .await
    }

    /// Itineraries of a trip, single partition.
    pub async fn itineraries_for_trip(
        &self,
        trip_id: TripId,
    ) -> Result<Vec<Document<Itinerary>>, StoreError> {
        let partition_key = PartitionKey::for_trip(trip_id)?;
        self.collect(DocumentQuery::in_partition(
            EntityType::Itinerary,
            partition_key,
        ))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use futures_util::stream;

    use crate::clock::FixedClock;
    use crate::ports::MockDocumentStore;
    use tripbldr_domain::User;

    fn repo_with(store: MockDocumentStore) -> DocumentRepository {
        let now = Utc.timestamp_opt(1_750_000_000, 0).single().expect("timestamp");
        DocumentRepository::new(Arc::new(store), Arc::new(FixedClock(now)))
    }

    #[tokio::test]
    async fn create_surfaces_backend_unavailability() {
        let mut store = MockDocumentStore::new();
        store
            .expect_write()
            .returning(|_, _| Err(StoreError::unavailable("write", "429 throttled")));

        let repo = repo_with(store);
        let err = repo
            .create(User::new("ana@example.com", "Ana"))
            .await
            .expect_err("throttled");
        assert!(matches!(err, StoreError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn get_maps_absence_to_not_found() {
        let mut store = MockDocumentStore::new();
        store.expect_read().returning(|_, _| Ok(None));

        let repo = repo_with(store);
        let user = User::new("ana@example.com", "Ana");
        let partition_key = PartitionKey::for_user(user.id).expect("derive");
        let err = repo
            .get::<User>(user.document_id(), &partition_key)
            .await
            .expect_err("absent");
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn query_rejects_a_mismatched_entity_type() {
        let mut store = MockDocumentStore::new();
        store
            .expect_query()
            .returning(|_| Ok(stream::iter(Vec::<Result<RawDocument, StoreError>>::new()).boxed()));

        let repo = repo_with(store);
        let err = repo
            .query::<User>(DocumentQuery::cross_partition(EntityType::Trip))
            .await
            .err()
            .expect("type mismatch");
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
