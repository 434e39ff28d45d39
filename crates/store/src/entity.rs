//! Entity discriminator and the payload-to-document binding.
//!
//! Every payload type stored in the unified container implements [`Entity`]:
//! it names its discriminator, its document id, and the owning aggregate its
//! partition key is derived from. This is the only place the type-to-partition
//! mapping lives.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tripbldr_domain::{
    Family, Invitation, Itinerary, Message, Poll, TravelPreference, Trip, User,
};

use crate::partition::PartitionGroup;

/// Discriminator for the heterogeneous documents sharing one container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    User,
    Family,
    Trip,
    Message,
    Invitation,
    Itinerary,
    Preference,
    Poll,
}

impl EntityType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Family => "family",
            Self::Trip => "trip",
            Self::Message => "message",
            Self::Invitation => "invitation",
            Self::Itinerary => "itinerary",
            Self::Preference => "preference",
            Self::Poll => "poll",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "family" => Ok(Self::Family),
            "trip" => Ok(Self::Trip),
            "message" => Ok(Self::Message),
            "invitation" => Ok(Self::Invitation),
            "itinerary" => Ok(Self::Itinerary),
            "preference" => Ok(Self::Preference),
            "poll" => Ok(Self::Poll),
            other => Err(format!("unknown entity type: {other}")),
        }
    }
}

/// A payload storable in the unified container.
///
/// `document_id` is the entity's own id; `partition_group` names the owning
/// aggregate the partition key is derived from. Both must be stable for the
/// lifetime of the entity.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const ENTITY_TYPE: EntityType;

    fn document_id(&self) -> Uuid;

    fn partition_group(&self) -> PartitionGroup;
}

impl Entity for User {
    const ENTITY_TYPE: EntityType = EntityType::User;

    fn document_id(&self) -> Uuid {
        self.id.to_uuid()
    }

    fn partition_group(&self) -> PartitionGroup {
        PartitionGroup::User(self.id)
    }
}

impl Entity for Family {
    const ENTITY_TYPE: EntityType = EntityType::Family;

    fn document_id(&self) -> Uuid {
        self.id.to_uuid()
    }

    fn partition_group(&self) -> PartitionGroup {
        PartitionGroup::Family(self.id)
    }
}

impl Entity for Trip {
    const ENTITY_TYPE: EntityType = EntityType::Trip;

    fn document_id(&self) -> Uuid {
        self.id.to_uuid()
    }

    fn partition_group(&self) -> PartitionGroup {
        PartitionGroup::Trip(self.id)
    }
}

impl Entity for Message {
    const ENTITY_TYPE: EntityType = EntityType::Message;

    fn document_id(&self) -> Uuid {
        self.id.to_uuid()
    }

    // Messages live in their trip's partition so room history is one-partition reads
    fn partition_group(&self) -> PartitionGroup {
        PartitionGroup::Trip(self.trip_id)
    }
}

impl Entity for Invitation {
    const ENTITY_TYPE: EntityType = EntityType::Invitation;

    fn document_id(&self) -> Uuid {
        self.id.to_uuid()
    }

    fn partition_group(&self) -> PartitionGroup {
        PartitionGroup::Family(self.family_id)
    }
}

impl Entity for Itinerary {
    const ENTITY_TYPE: EntityType = EntityType::Itinerary;

    fn document_id(&self) -> Uuid {
        self.id.to_uuid()
    }

    fn partition_group(&self) -> PartitionGroup {
        PartitionGroup::Trip(self.trip_id)
    }
}

impl Entity for TravelPreference {
    const ENTITY_TYPE: EntityType = EntityType::Preference;

    fn document_id(&self) -> Uuid {
        self.id.to_uuid()
    }

    fn partition_group(&self) -> PartitionGroup {
        PartitionGroup::User(self.user_id)
    }
}

impl Entity for Poll {
    const ENTITY_TYPE: EntityType = EntityType::Poll;

    fn document_id(&self) -> Uuid {
        self.id.to_uuid()
    }

    fn partition_group(&self) -> PartitionGroup {
        PartitionGroup::Trip(self.trip_id)
    }
}
