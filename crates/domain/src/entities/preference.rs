//! Travel preference entity - what a user wants out of a trip

use serde::{Deserialize, Serialize};

use crate::{PreferenceId, TripId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetLevel {
    Budget,
    Moderate,
    Comfort,
    Luxury,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelPace {
    Relaxed,
    Balanced,
    Packed,
}

/// A user's travel preferences, optionally scoped to one trip.
///
/// Trip-scoped preferences override the user's general ones when an
/// itinerary is generated; that merge happens in the caller, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelPreference {
    pub id: PreferenceId,
    pub user_id: UserId,
    pub trip_id: Option<TripId>,
    pub budget: BudgetLevel,
    pub pace: TravelPace,
    pub dietary_restrictions: Vec<String>,
    pub interests: Vec<String>,
}

impl TravelPreference {
    pub fn new(user_id: UserId) -> Self {
        Self {
            id: PreferenceId::new(),
            user_id,
            trip_id: None,
            budget: BudgetLevel::Moderate,
            pace: TravelPace::Balanced,
            dietary_restrictions: Vec::new(),
            interests: Vec::new(),
        }
    }

    pub fn for_trip(mut self, trip_id: TripId) -> Self {
        self.trip_id = Some(trip_id);
        self
    }

    pub fn with_budget(mut self, budget: BudgetLevel) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_pace(mut self, pace: TravelPace) -> Self {
        self.pace = pace;
        self
    }

    pub fn with_dietary_restriction(mut self, restriction: impl Into<String>) -> Self {
        self.dietary_restrictions.push(restriction.into());
        self
    }

    pub fn with_interest(mut self, interest: impl Into<String>) -> Self {
        self.interests.push(interest.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_moderate_and_balanced() {
        let pref = TravelPreference::new(UserId::new());
        assert_eq!(pref.budget, BudgetLevel::Moderate);
        assert_eq!(pref.pace, TravelPace::Balanced);
        assert!(pref.trip_id.is_none());
    }

    #[test]
    fn builder_scopes_to_trip() {
        let trip = TripId::new();
        let pref = TravelPreference::new(UserId::new())
            .for_trip(trip)
            .with_budget(BudgetLevel::Budget)
            .with_interest("hiking");
        assert_eq!(pref.trip_id, Some(trip));
        assert_eq!(pref.interests, vec!["hiking".to_string()]);
    }
}
