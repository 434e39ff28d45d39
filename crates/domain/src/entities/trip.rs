//! Trip entity - a planned journey shared by one or more families

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{DomainError, FamilyId, TripId, UserId};

/// Lifecycle of a trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    Planning,
    Confirmed,
    Completed,
    Cancelled,
}

impl TripStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// A trip being coordinated between families
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: TripId,
    pub name: String,
    pub destination: String,
    pub organizer_user_id: UserId,
    /// Families taking part (foreign ids, no joins)
    pub participating_family_ids: Vec<FamilyId>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: TripStatus,
}

impl Trip {
    pub fn new(
        name: impl Into<String>,
        destination: impl Into<String>,
        organizer_user_id: UserId,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            id: TripId::new(),
            name: name.into(),
            destination: destination.into(),
            organizer_user_id,
            participating_family_ids: Vec::new(),
            start_date,
            end_date,
            status: TripStatus::Planning,
        }
    }

    pub fn with_family(mut self, family_id: FamilyId) -> Self {
        if !self.participating_family_ids.contains(&family_id) {
            self.participating_family_ids.push(family_id);
        }
        self
    }

    pub fn has_family(&self, family_id: FamilyId) -> bool {
        self.participating_family_ids.contains(&family_id)
    }

    pub fn add_family(&mut self, family_id: FamilyId) -> Result<(), DomainError> {
        if self.status.is_terminal() {
            return Err(DomainError::invalid_state_transition(format!(
                "cannot add a family to a {:?} trip",
                self.status
            )));
        }
        if self.has_family(family_id) {
            return Err(DomainError::constraint(format!(
                "family {} already participates in trip {}",
                family_id, self.id
            )));
        }
        self.participating_family_ids.push(family_id);
        Ok(())
    }

    pub fn remove_family(&mut self, family_id: FamilyId) -> Result<(), DomainError> {
        if !self.has_family(family_id) {
            return Err(DomainError::constraint(format!(
                "family {} does not participate in trip {}",
                family_id, self.id
            )));
        }
        self.participating_family_ids.retain(|f| *f != family_id);
        Ok(())
    }

    pub fn reschedule(&mut self, start: NaiveDate, end: NaiveDate) -> Result<(), DomainError> {
        if end < start {
            return Err(DomainError::validation(
                "trip end date cannot be before its start date",
            ));
        }
        self.start_date = start;
        self.end_date = end;
        Ok(())
    }

    pub fn confirm(&mut self) -> Result<(), DomainError> {
        if self.status != TripStatus::Planning {
            return Err(DomainError::invalid_state_transition(format!(
                "only a planning trip can be confirmed, not {:?}",
                self.status
            )));
        }
        self.status = TripStatus::Confirmed;
        Ok(())
    }

    pub fn complete(&mut self) -> Result<(), DomainError> {
        if self.status != TripStatus::Confirmed {
            return Err(DomainError::invalid_state_transition(format!(
                "only a confirmed trip can be completed, not {:?}",
                self.status
            )));
        }
        self.status = TripStatus::Completed;
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), DomainError> {
        if self.status.is_terminal() {
            return Err(DomainError::invalid_state_transition(format!(
                "a {:?} trip cannot be cancelled",
                self.status
            )));
        }
        self.status = TripStatus::Cancelled;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn sample_trip() -> Trip {
        Trip::new(
            "Summer in Lisbon",
            "Lisbon, Portugal",
            UserId::new(),
            date(2026, 7, 10),
            date(2026, 7, 17),
        )
    }

    #[test]
    fn lifecycle_happy_path() {
        let mut trip = sample_trip();
        assert_eq!(trip.status, TripStatus::Planning);
        trip.confirm().expect("confirm");
        trip.complete().expect("complete");
        assert!(trip.status.is_terminal());
    }

    #[test]
    fn completed_trip_cannot_be_cancelled() {
        let mut trip = sample_trip();
        trip.confirm().expect("confirm");
        trip.complete().expect("complete");
        let err = trip.cancel().expect_err("terminal state");
        assert!(matches!(err, DomainError::InvalidStateTransition(_)));
    }

    #[test]
    fn reschedule_rejects_inverted_dates() {
        let mut trip = sample_trip();
        let err = trip
            .reschedule(date(2026, 7, 17), date(2026, 7, 10))
            .expect_err("inverted dates");
        assert!(matches!(err, DomainError::Validation(_)));
    }

    // The storage layer filters on these field names and status strings;
    // the wire shape is a contract, not an implementation detail.
    #[test]
    fn json_shape_is_stable() {
        let trip = sample_trip();
        let json = serde_json::to_value(&trip).expect("to_value");
        assert_eq!(json["status"], "planning");
        assert_eq!(
            json["organizer_user_id"],
            trip.organizer_user_id.to_string()
        );
        let back: Trip = serde_json::from_value(json).expect("from_value");
        assert_eq!(back, trip);
    }

    #[test]
    fn add_family_rejects_duplicates() {
        let mut trip = sample_trip();
        let family = FamilyId::new();
        trip.add_family(family).expect("add family");
        assert!(trip.add_family(family).is_err());
    }
}
