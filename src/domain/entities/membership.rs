//! Room membership entity and repository trait.
//!
//! Maps to the `chat_room_members` table. The (room, user) pair is the
//! primary key, so a user cannot join the same room twice.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

use super::chat_room::ChatRoom;

/// Links one user to one chat room.
///
/// Maps to the `chat_room_members` table:
/// - room_id: BIGINT NOT NULL REFERENCES chat_rooms(id) (composite PK)
/// - user_id: BIGINT NOT NULL REFERENCES users(id) (composite PK)
/// - joined_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomMembership {
    /// Room ID (part of composite primary key)
    pub room_id: i64,

    /// User ID (part of composite primary key)
    pub user_id: i64,

    /// When the user joined the room
    pub joined_at: DateTime<Utc>,
}

impl RoomMembership {
    pub fn new(room_id: i64, user_id: i64) -> Self {
        Self {
            room_id,
            user_id,
            joined_at: Utc::now(),
        }
    }
}

/// Repository trait for membership lookups.
///
/// Membership writes go through `ChatRoomRepository`, which owns the room
/// lifecycle; this trait covers the read side used for authorization and
/// personal-room deduplication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Find the membership row for (room, user).
    async fn find_by_room_and_user(
        &self,
        room_id: i64,
        user_id: i64,
    ) -> Result<Option<RoomMembership>, AppError>;

    /// Existence check for (room, user); the authorization primitive.
    async fn exists_by_room_and_user(&self, room_id: i64, user_id: i64)
        -> Result<bool, AppError>;

    /// Find the room whose members are exactly the two given users,
    /// regardless of argument order. At most one such room exists (the
    /// personal-room uniqueness invariant).
    async fn find_personal_room(
        &self,
        user_a: i64,
        user_b: i64,
    ) -> Result<Option<ChatRoom>, AppError>;
}
