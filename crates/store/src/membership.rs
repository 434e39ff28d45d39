//! Family membership helpers.
//!
//! Adding or removing a member touches two documents (the family and the
//! user) as two independent optimistic writes. No transaction spans them: if
//! the second write fails, the first is already committed and the caller must
//! detect and reconcile the half-applied state. Neither write is retried
//! here; a `VersionConflict` means re-read and call the helper again.

use tripbldr_domain::{DomainError, Family, FamilyId, User, UserId};

use crate::error::StoreError;
use crate::partition::PartitionKey;
use crate::repository::DocumentRepository;

/// Error type for membership operations.
#[derive(Debug, thiserror::Error)]
pub enum MembershipError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DocumentRepository {
    /// Add a user to a family: updates the family document, then the user
    /// document. Partial failure leaves the user listed in the family but
    /// the family absent from the user.
    pub async fn add_family_member(
        &self,
        family_id: FamilyId,
        user_id: UserId,
    ) -> Result<(), MembershipError> {
        let family_key = PartitionKey::for_family(family_id)?;
        let mut family = self.get::<Family>(family_id.to_uuid(), &family_key).await?;
        family.body_mut().add_member(user_id)?;
        self.update(&family).await?;

        let user_key = PartitionKey::for_user(user_id)?;
        let mut user = self.get::<User>(user_id.to_uuid(), &user_key).await?;
        user.body_mut().join_family(family_id)?;
        self.update(&user).await?;

        tracing::debug!(%family_id, %user_id, "added family member");
        Ok(())
    }

    /// Remove a user from a family: updates the family document, then the
    /// user document. Same partial-failure window as `add_family_member`.
    pub async fn remove_family_member(
        &self,
        family_id: FamilyId,
        user_id: UserId,
    ) -> Result<(), MembershipError> {
        let family_key = PartitionKey::for_family(family_id)?;
        let mut family = self.get::<Family>(family_id.to_uuid(), &family_key).await?;
        family.body_mut().remove_member(user_id)?;
        self.update(&family).await?;

        let user_key = PartitionKey::for_user(user_id)?;
        let mut user = self.get::<User>(user_id.to_uuid(), &user_key).await?;
        user.body_mut().leave_family(family_id)?;
        self.update(&user).await?;

        tracing::debug!(%family_id, %user_id, "removed family member");
        Ok(())
    }
}
