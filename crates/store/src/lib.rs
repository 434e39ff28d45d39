//! Unified document repository for the trip-planning domain.
//!
//! All entities share one logical container of JSON documents. Each document
//! carries an envelope (id, partition key, entity type discriminator, etag,
//! timestamps) around an entity payload; related entities share a partition
//! key derived from their owning aggregate, so the common access patterns are
//! single-partition reads. Writes are guarded by etag preconditions, so
//! concurrent updates resolve to exactly one winner and losers get a
//! `VersionConflict` to re-read and retry on.
//!
//! [`DocumentRepository`] is the caller-facing surface; [`DocumentStore`] is
//! the backend port with an in-memory and a SQLite implementation.

mod clock;
mod document;
mod entity;
mod error;
mod membership;
mod memory;
mod partition;
mod ports;
mod query;
mod repository;
mod sqlite;


pub use clock::{ClockPort, FixedClock, SystemClock};
pub use document::{Document, Etag, RawDocument};
pub use entity::{Entity, EntityType};
pub use error::StoreError;
pub use membership::MembershipError;
pub use memory::MemoryStore;
pub use partition::{PartitionGroup, PartitionKey};
pub use ports::{DocumentStore, DocumentStream, WritePrecondition};
pub use query::{DocumentQuery, Filter};
pub use repository::{DocumentRepository, TypedDocumentStream};
pub use sqlite::SqliteStore;

#[cfg(test)]
pub use ports::MockDocumentStore;
