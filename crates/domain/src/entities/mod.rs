//! Domain entities - payloads stored as documents

mod family;
mod invitation;
mod itinerary;
mod message;
mod poll;
mod preference;
mod trip;
mod user;

pub use family::Family;
pub use invitation::{Invitation, InvitationStatus};
pub use itinerary::{Activity, Itinerary, ItineraryDay};
pub use message::Message;
pub use poll::{Poll, PollOption, PollStatus};
pub use preference::{BudgetLevel, TravelPace, TravelPreference};
pub use trip::{Trip, TripStatus};
pub use user::User;
