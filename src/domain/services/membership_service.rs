//! Membership authorization domain service.
//!
//! Authorization is a single relation lookup: a user may read and mutate a
//! room exactly when a membership row exists for (room, user). There is no
//! owner or admin tier; all members have symmetric rights.

use std::sync::Arc;

use crate::domain::entities::MembershipRepository;
use crate::shared::error::{AppError, RoomError};

/// Guards room reads and mutations behind the membership relation.
pub struct MembershipAuthorizer<M: MembershipRepository> {
    membership_repo: Arc<M>,
}

impl<M: MembershipRepository> MembershipAuthorizer<M> {
    pub fn new(membership_repo: Arc<M>) -> Self {
        Self { membership_repo }
    }

    /// Pure existence check; no side effects.
    pub async fn is_member(&self, room_id: i64, user_id: i64) -> Result<bool, AppError> {
        self.membership_repo
            .exists_by_room_and_user(room_id, user_id)
            .await
    }

    /// Fails with `AccessDenied` when the user is not a member of the room.
    pub async fn require_member(&self, room_id: i64, user_id: i64) -> Result<(), RoomError> {
        if self.is_member(room_id, user_id).await? {
            Ok(())
        } else {
            Err(RoomError::AccessDenied)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::MockMembershipRepository;

    #[tokio::test]
    async fn member_passes_the_guard() {
        let mut membership_repo = MockMembershipRepository::new();
        membership_repo
            .expect_exists_by_room_and_user()
            .returning(|_, _| Ok(true));

        let authorizer = MembershipAuthorizer::new(Arc::new(membership_repo));
        assert!(authorizer.require_member(1, 2).await.is_ok());
    }

    #[tokio::test]
    async fn non_member_is_denied() {
        let mut membership_repo = MockMembershipRepository::new();
        membership_repo
            .expect_exists_by_room_and_user()
            .returning(|_, _| Ok(false));

        let authorizer = MembershipAuthorizer::new(Arc::new(membership_repo));
        let err = authorizer.require_member(1, 2).await.unwrap_err();
        assert!(matches!(err, RoomError::AccessDenied));
    }
}
