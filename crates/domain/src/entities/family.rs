//! Family entity - a household that travels together

use serde::{Deserialize, Serialize};

use crate::{DomainError, FamilyId, UserId};

/// A family group; the admin coordinates trips on its behalf
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Family {
    pub id: FamilyId,
    pub name: String,
    pub admin_user_id: UserId,
    /// Member user ids, including the admin (foreign ids, no joins)
    pub member_user_ids: Vec<UserId>,
}

impl Family {
    pub fn new(name: impl Into<String>, admin_user_id: UserId) -> Self {
        Self {
            id: FamilyId::new(),
            name: name.into(),
            admin_user_id,
            member_user_ids: vec![admin_user_id],
        }
    }

    pub fn is_admin(&self, user_id: UserId) -> bool {
        self.admin_user_id == user_id
    }

    pub fn has_member(&self, user_id: UserId) -> bool {
        self.member_user_ids.contains(&user_id)
    }

    pub fn add_member(&mut self, user_id: UserId) -> Result<(), DomainError> {
        if self.has_member(user_id) {
            return Err(DomainError::constraint(format!(
                "user {} is already a member of family {}",
                user_id, self.id
            )));
        }
        self.member_user_ids.push(user_id);
        Ok(())
    }

    pub fn remove_member(&mut self, user_id: UserId) -> Result<(), DomainError> {
        if self.is_admin(user_id) {
            return Err(DomainError::constraint(
                "family admin cannot be removed from the family",
            ));
        }
        if !self.has_member(user_id) {
            return Err(DomainError::constraint(format!(
                "user {} is not a member of family {}",
                user_id, self.id
            )));
        }
        self.member_user_ids.retain(|m| *m != user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_family_includes_admin_as_member() {
        let admin = UserId::new();
        let family = Family::new("Rivera", admin);
        assert!(family.has_member(admin));
        assert!(family.is_admin(admin));
    }

    #[test]
    fn admin_cannot_be_removed() {
        let admin = UserId::new();
        let mut family = Family::new("Rivera", admin);
        let err = family.remove_member(admin).expect_err("admin is protected");
        assert!(matches!(err, DomainError::Constraint(_)));
    }

    #[test]
    fn add_and_remove_member() {
        let mut family = Family::new("Rivera", UserId::new());
        let member = UserId::new();

        family.add_member(member).expect("add member");
        assert!(family.has_member(member));
        assert!(family.add_member(member).is_err());

        family.remove_member(member).expect("remove member");
        assert!(!family.has_member(member));
    }
}
