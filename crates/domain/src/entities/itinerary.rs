//! Itinerary entity - a day-by-day plan for a trip

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::{DomainError, ItineraryId, TripId};

/// A single planned activity within a day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub name: String,
    pub start_time: Option<NaiveTime>,
    pub location: Option<String>,
    pub notes: String,
}

impl Activity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start_time: None,
            location: None,
            notes: String::new(),
        }
    }

    pub fn with_start_time(mut self, time: NaiveTime) -> Self {
        self.start_time = Some(time);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

/// One dated day of an itinerary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryDay {
    pub date: NaiveDate,
    pub activities: Vec<Activity>,
}

impl ItineraryDay {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            activities: Vec::new(),
        }
    }

    pub fn with_activity(mut self, activity: Activity) -> Self {
        self.activities.push(activity);
        self
    }
}

/// A day-by-day plan for a trip. `generated` marks plans produced by the
/// suggestion pipeline rather than written by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    pub id: ItineraryId,
    pub trip_id: TripId,
    pub title: String,
    pub days: Vec<ItineraryDay>,
    pub generated: bool,
}

impl Itinerary {
    pub fn new(trip_id: TripId, title: impl Into<String>) -> Self {
        Self {
            id: ItineraryId::new(),
            trip_id,
            title: title.into(),
            days: Vec::new(),
            generated: false,
        }
    }

    pub fn mark_generated(mut self) -> Self {
        self.generated = true;
        self
    }

    /// Adds a day, keeping days ordered by date. One day per date.
    pub fn add_day(&mut self, day: ItineraryDay) -> Result<(), DomainError> {
        if self.days.iter().any(|d| d.date == day.date) {
            return Err(DomainError::constraint(format!(
                "itinerary {} already has a day for {}",
                self.id, day.date
            )));
        }
        self.days.push(day);
        self.days.sort_by_key(|d| d.date);
        Ok(())
    }

    pub fn day_for(&self, date: NaiveDate) -> Option<&ItineraryDay> {
        self.days.iter().find(|d| d.date == date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, d).expect("valid date")
    }

    #[test]
    fn days_stay_sorted_and_unique() {
        let mut itinerary = Itinerary::new(TripId::new(), "Lisbon week");
        itinerary.add_day(ItineraryDay::new(date(12))).expect("day 12");
        itinerary.add_day(ItineraryDay::new(date(10))).expect("day 10");
        assert_eq!(itinerary.days[0].date, date(10));

        let err = itinerary
            .add_day(ItineraryDay::new(date(12)))
            .expect_err("duplicate date");
        assert!(matches!(err, DomainError::Constraint(_)));
    }

    #[test]
    fn activity_builder() {
        let activity = Activity::new("Tram 28 ride")
            .with_location("Martim Moniz")
            .with_notes("buy tickets ahead");
        assert_eq!(activity.location.as_deref(), Some("Martim Moniz"));
        assert!(activity.start_time.is_none());
    }
}
