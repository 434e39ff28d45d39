//! Invitation entity - an invite to join a family

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{DomainError, FamilyId, InvitationId, UserId};

/// Lifecycle of an invitation; transitions only leave `Pending`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Declined,
    Revoked,
}

/// An emailed invite carrying an opaque token.
///
/// Invitations are soft-marked (`Accepted`/`Declined`/`Revoked`), never
/// hard-deleted, so the token history stays auditable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invitation {
    pub id: InvitationId,
    pub family_id: FamilyId,
    pub email: String,
    pub token: String,
    pub invited_by: UserId,
    pub status: InvitationStatus,
}

impl Invitation {
    pub fn new(family_id: FamilyId, email: impl Into<String>, invited_by: UserId) -> Self {
        Self {
            id: InvitationId::new(),
            family_id,
            email: email.into(),
            token: Uuid::new_v4().simple().to_string(),
            invited_by,
            status: InvitationStatus::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == InvitationStatus::Pending
    }

    fn transition(&mut self, to: InvitationStatus) -> Result<(), DomainError> {
        if !self.is_pending() {
            return Err(DomainError::invalid_state_transition(format!(
                "invitation {} is {:?}, only pending invitations can change",
                self.id, self.status
            )));
        }
        self.status = to;
        Ok(())
    }

    pub fn accept(&mut self) -> Result<(), DomainError> {
        self.transition(InvitationStatus::Accepted)
    }

    pub fn decline(&mut self) -> Result<(), DomainError> {
        self.transition(InvitationStatus::Declined)
    }

    pub fn revoke(&mut self) -> Result<(), DomainError> {
        self.transition(InvitationStatus::Revoked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_unique_per_invitation() {
        let family = FamilyId::new();
        let inviter = UserId::new();
        let a = Invitation::new(family, "kim@example.com", inviter);
        let b = Invitation::new(family, "kim@example.com", inviter);
        assert_ne!(a.token, b.token);
    }

    #[test]
    fn accepted_invitation_cannot_be_revoked() {
        let mut invite = Invitation::new(FamilyId::new(), "kim@example.com", UserId::new());
        invite.accept().expect("accept");
        let err = invite.revoke().expect_err("already accepted");
        assert!(matches!(err, DomainError::InvalidStateTransition(_)));
        assert_eq!(invite.status, InvitationStatus::Accepted);
    }
}
