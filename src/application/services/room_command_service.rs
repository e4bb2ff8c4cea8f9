//! Chat Room Command Service
//!
//! Write-side operations: personal/group room creation, title edits and
//! leaving. Personal rooms are deduplicated per unordered user pair; a room
//! whose last member leaves is deleted together with its chats.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::entities::{
    ChatRoom, ChatRoomRepository, MembershipRepository, UserRepository,
};
use crate::domain::services::MembershipAuthorizer;
use crate::shared::error::RoomError;
use crate::shared::snowflake::SnowflakeGenerator;

/// Command-side service trait
#[async_trait]
pub trait ChatRoomCommandService: Send + Sync {
    /// Create (or return the existing) 1:1 room with a friend
    async fn create_personal_room(
        &self,
        requester_id: i64,
        friend_id: i64,
    ) -> Result<RoomCreated, RoomError>;

    /// Create a group room with the given members
    async fn create_group_room(
        &self,
        requester_id: i64,
        request: CreateGroupRoomDto,
    ) -> Result<RoomCreated, RoomError>;

    /// Replace a room's title
    async fn edit_room(
        &self,
        room_id: i64,
        requester_id: i64,
        new_title: &str,
    ) -> Result<RoomEdited, RoomError>;

    /// Remove the requester from a room, deleting the room when it empties
    async fn leave_room(&self, room_id: i64, requester_id: i64) -> Result<RoomLeft, RoomError>;
}

/// Group room creation request
#[derive(Debug, Clone)]
pub struct CreateGroupRoomDto {
    pub title: String,
    pub member_ids: Vec<i64>,
}

/// Result of a room creation; echoes the id actually committed (or reused)
#[derive(Debug, Clone, Copy)]
pub struct RoomCreated {
    pub room_id: i64,
    /// False when the personal-room dedup path reused an existing room
    pub newly_created: bool,
}

/// Result of a title edit; echoes the committed state
#[derive(Debug, Clone)]
pub struct RoomEdited {
    pub room_id: i64,
    pub title: String,
}

/// Result of leaving a room
#[derive(Debug, Clone, Copy)]
pub struct RoomLeft {
    pub room_id: i64,
    pub room_deleted: bool,
}

/// ChatRoomCommandService implementation
pub struct ChatRoomCommandServiceImpl<R, M, U>
where
    R: ChatRoomRepository,
    M: MembershipRepository,
    U: UserRepository,
{
    room_repo: Arc<R>,
    membership_repo: Arc<M>,
    user_repo: Arc<U>,
    authorizer: MembershipAuthorizer<M>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<R, M, U> ChatRoomCommandServiceImpl<R, M, U>
where
    R: ChatRoomRepository,
    M: MembershipRepository,
    U: UserRepository,
{
    pub fn new(
        room_repo: Arc<R>,
        membership_repo: Arc<M>,
        user_repo: Arc<U>,
        id_generator: Arc<SnowflakeGenerator>,
    ) -> Self {
        Self {
            room_repo,
            authorizer: MembershipAuthorizer::new(membership_repo.clone()),
            membership_repo,
            user_repo,
            id_generator,
        }
    }
}

#[async_trait]
impl<R, M, U> ChatRoomCommandService for ChatRoomCommandServiceImpl<R, M, U>
where
    R: ChatRoomRepository + 'static,
    M: MembershipRepository + 'static,
    U: UserRepository + 'static,
{
    async fn create_personal_room(
        &self,
        requester_id: i64,
        friend_id: i64,
    ) -> Result<RoomCreated, RoomError> {
        let friend = self
            .user_repo
            .find_by_id(friend_id)
            .await?
            .ok_or(RoomError::UserNotFound)?;

        // Idempotent create: an existing 1:1 room for the pair wins, with
        // zero writes. The lookup is order-independent.
        if let Some(existing) = self
            .membership_repo
            .find_personal_room(requester_id, friend.id)
            .await?
        {
            return Ok(RoomCreated {
                room_id: existing.id,
                newly_created: false,
            });
        }

        // Personal rooms keep the empty default title.
        let room = ChatRoom::new(self.id_generator.generate(), String::new());
        let created = self
            .room_repo
            .create_with_members(&room, &[requester_id, friend.id])
            .await?;

        tracing::info!(room_id = created.id, "personal chat room created");
        Ok(RoomCreated {
            room_id: created.id,
            newly_created: true,
        })
    }

    async fn create_group_room(
        &self,
        requester_id: i64,
        request: CreateGroupRoomDto,
    ) -> Result<RoomCreated, RoomError> {
        // The requester always joins; duplicate ids collapse to one
        // membership. No pair dedup applies to group rooms.
        let mut member_ids = request.member_ids;
        member_ids.push(requester_id);
        member_ids.sort_unstable();
        member_ids.dedup();

        for &member_id in &member_ids {
            if !self.user_repo.exists_by_id(member_id).await? {
                return Err(RoomError::UserNotFound);
            }
        }

        let room = ChatRoom::new(self.id_generator.generate(), request.title);
        let created = self.room_repo.create_with_members(&room, &member_ids).await?;

        tracing::info!(
            room_id = created.id,
            member_count = member_ids.len(),
            "group chat room created"
        );
        Ok(RoomCreated {
            room_id: created.id,
            newly_created: true,
        })
    }

    async fn edit_room(
        &self,
        room_id: i64,
        requester_id: i64,
        new_title: &str,
    ) -> Result<RoomEdited, RoomError> {
        // Existence is checked before authorization, so an unknown room id
        // reports RoomNotFound even to non-members.
        self.room_repo
            .find_by_id(room_id)
            .await?
            .ok_or(RoomError::RoomNotFound)?;

        self.authorizer.require_member(room_id, requester_id).await?;

        self.room_repo.update_title(room_id, new_title).await?;

        Ok(RoomEdited {
            room_id,
            title: new_title.to_owned(),
        })
    }

    async fn leave_room(&self, room_id: i64, requester_id: i64) -> Result<RoomLeft, RoomError> {
        if !self.room_repo.exists_by_id(room_id).await? {
            return Err(RoomError::RoomNotFound);
        }

        self.membership_repo
            .find_by_room_and_user(room_id, requester_id)
            .await?
            .ok_or(RoomError::AccessDenied)?;

        let removal = self.room_repo.remove_member(room_id, requester_id).await?;
        if removal.room_deleted {
            tracing::info!(room_id, "last member left; chat room deleted");
        } else {
            tracing::debug!(
                room_id,
                remaining = removal.remaining_members,
                "member left chat room"
            );
        }

        Ok(RoomLeft {
            room_id,
            room_deleted: removal.room_deleted,
        })
    }
}
