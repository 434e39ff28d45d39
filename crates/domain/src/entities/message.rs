//! Message entity - chat messages within a trip room

use serde::{Deserialize, Serialize};

use crate::{MessageId, RoomId, TripId, UserId};

/// A chat message posted to a room of a trip.
///
/// Messages are never hard-deleted by the application; `redact` soft-marks
/// them and clears the body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub trip_id: TripId,
    pub room_id: RoomId,
    pub sender_user_id: UserId,
    pub body: String,
    pub redacted: bool,
}

impl Message {
    pub fn new(
        trip_id: TripId,
        room_id: RoomId,
        sender_user_id: UserId,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: MessageId::new(),
            trip_id,
            room_id,
            sender_user_id,
            body: body.into(),
            redacted: false,
        }
    }

    /// Soft-delete: clears the body and marks the message redacted.
    /// Idempotent.
    pub fn redact(&mut self) {
        self.body.clear();
        self.redacted = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redact_clears_body_and_is_idempotent() {
        let mut msg = Message::new(TripId::new(), RoomId::new(), UserId::new(), "see you at 9");
        msg.redact();
        assert!(msg.redacted);
        assert!(msg.body.is_empty());
        msg.redact();
        assert!(msg.redacted);
    }
}
