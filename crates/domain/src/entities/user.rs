//! User entity - an individual traveler account

use serde::{Deserialize, Serialize};

use crate::{DomainError, FamilyId, UserId};

/// A registered user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub display_name: String,
    pub phone: Option<String>,
    /// Families this user belongs to (foreign ids; integrity is enforced
    /// by the caller, there is no join mechanism)
    pub family_ids: Vec<FamilyId>,
    pub onboarding_complete: bool,
}

impl User {
    pub fn new(email: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            email: email.into(),
            display_name: display_name.into(),
            phone: None,
            family_ids: Vec::new(),
            onboarding_complete: false,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn is_member_of(&self, family_id: FamilyId) -> bool {
        self.family_ids.contains(&family_id)
    }

    /// Record membership in a family on the user side of the relation.
    pub fn join_family(&mut self, family_id: FamilyId) -> Result<(), DomainError> {
        if self.is_member_of(family_id) {
            return Err(DomainError::constraint(format!(
                "user {} already belongs to family {}",
                self.id, family_id
            )));
        }
        self.family_ids.push(family_id);
        Ok(())
    }

    /// Drop membership in a family on the user side of the relation.
    pub fn leave_family(&mut self, family_id: FamilyId) -> Result<(), DomainError> {
        if !self.is_member_of(family_id) {
            return Err(DomainError::constraint(format!(
                "user {} does not belong to family {}",
                self.id, family_id
            )));
        }
        self.family_ids.retain(|f| *f != family_id);
        Ok(())
    }

    pub fn complete_onboarding(&mut self) {
        self.onboarding_complete = true;
    }
}
