//! TripBldr Domain - entity payloads, typed ids, and invariants.
//!
//! Pure data and rules: no I/O, no async. The storage core
//! (`tripbldr-store`) wraps these payloads in document envelopes.

pub mod entities;
pub mod error;
pub mod ids;

pub use entities::{
    Activity, BudgetLevel, Family, Invitation, InvitationStatus, Itinerary, ItineraryDay, Message,
    Poll, PollOption, PollStatus, TravelPace, TravelPreference, Trip, TripStatus, User,
};

pub use error::DomainError;

pub use ids::{
    FamilyId, InvitationId, ItineraryId, MessageId, PollId, PollOptionId, PreferenceId, RoomId,
    TripId, UserId,
};
