//! Poll entity - group decisions on trip questions

use serde::{Deserialize, Serialize};

use crate::{DomainError, PollId, PollOptionId, TripId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollStatus {
    Open,
    Closed,
}

/// One choice within a poll and the users who picked it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollOption {
    pub id: PollOptionId,
    pub label: String,
    pub votes: Vec<UserId>,
}

impl PollOption {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            id: PollOptionId::new(),
            label: label.into(),
            votes: Vec::new(),
        }
    }
}

/// A poll attached to a trip. Each user holds at most one vote; casting
/// again moves the vote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poll {
    pub id: PollId,
    pub trip_id: TripId,
    pub question: String,
    pub options: Vec<PollOption>,
    pub status: PollStatus,
}

impl Poll {
    pub fn new(trip_id: TripId, question: impl Into<String>) -> Self {
        Self {
            id: PollId::new(),
            trip_id,
            question: question.into(),
            options: Vec::new(),
            status: PollStatus::Open,
        }
    }

    pub fn with_option(mut self, label: impl Into<String>) -> Self {
        self.options.push(PollOption::new(label));
        self
    }

    pub fn is_open(&self) -> bool {
        self.status == PollStatus::Open
    }

    pub fn vote_count(&self, option_id: PollOptionId) -> Option<usize> {
        self.options
            .iter()
            .find(|o| o.id == option_id)
            .map(|o| o.votes.len())
    }

    /// Casts (or moves) a user's vote to the given option.
    pub fn cast_vote(&mut self, option_id: PollOptionId, user_id: UserId) -> Result<(), DomainError> {
        if !self.is_open() {
            return Err(DomainError::constraint(format!(
                "poll {} is closed",
                self.id
            )));
        }
        if !self.options.iter().any(|o| o.id == option_id) {
            return Err(DomainError::validation(format!(
                "poll {} has no option {}",
                self.id, option_id
            )));
        }
        for option in &mut self.options {
            option.votes.retain(|v| *v != user_id);
            if option.id == option_id {
                option.votes.push(user_id);
            }
        }
        Ok(())
    }

    pub fn close(&mut self) -> Result<(), DomainError> {
        if !self.is_open() {
            return Err(DomainError::invalid_state_transition(format!(
                "poll {} is already closed",
                self.id
            )));
        }
        self.status = PollStatus::Closed;
        Ok(())
    }

    /// The option with the most votes, if any votes were cast.
    /// Ties resolve to the earliest-added option.
    pub fn leading_option(&self) -> Option<&PollOption> {
        self.options
            .iter()
            .filter(|o| !o.votes.is_empty())
            .max_by_key(|o| o.votes.len())
    }
}
