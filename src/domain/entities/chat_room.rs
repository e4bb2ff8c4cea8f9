//! Chat room entity, read models and repository trait.
//!
//! Maps to the `chat_rooms` table in the database schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

use super::chat::ChatSummary;

/// Represents a chat room.
///
/// Maps to the `chat_rooms` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - title: VARCHAR(100) NOT NULL DEFAULT '' -- empty for personal rooms
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
///
/// A room exists only while it has at least one membership; the last leaver
/// deletes it together with its chats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRoom {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// Room title; personal rooms keep the empty default
    pub title: String,

    /// Room creation timestamp
    pub created_at: DateTime<Utc>,
}

impl ChatRoom {
    /// Create a room record with a freshly generated id.
    pub fn new(id: i64, title: String) -> Self {
        Self {
            id,
            title,
            created_at: Utc::now(),
        }
    }
}

/// A room paired with its latest non-deleted message, as shown in the
/// room-list query.
#[derive(Debug, Clone, Serialize)]
pub struct RoomSummary {
    pub room_id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
    /// Latest non-deleted chat; None for a room with no visible messages
    pub last_chat: Option<ChatSummary>,
}

impl RoomSummary {
    /// Ordering key for the room list: the latest visible chat id, with
    /// message-less rooms sorting last.
    pub fn activity_key(&self) -> i64 {
        self.last_chat.as_ref().map(|c| c.id).unwrap_or(0)
    }
}

/// Outcome of removing a member from a room.
#[derive(Debug, Clone, Copy)]
pub struct MemberRemoval {
    /// Members left in the room after the removal
    pub remaining_members: i64,

    /// Whether the room (and its chats) was garbage-collected
    pub room_deleted: bool,
}

/// Repository trait for ChatRoom data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatRoomRepository: Send + Sync {
    /// Find a room by its Snowflake ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<ChatRoom>, AppError>;

    /// Check whether a room id exists.
    async fn exists_by_id(&self, id: i64) -> Result<bool, AppError>;

    /// Persist a room together with one membership row per member id, in a
    /// single transaction. Duplicate ids in `member_ids` collapse to one
    /// membership.
    async fn create_with_members(
        &self,
        room: &ChatRoom,
        member_ids: &[i64],
    ) -> Result<ChatRoom, AppError>;

    /// Replace a room's title.
    async fn update_title(&self, room_id: i64, title: &str) -> Result<(), AppError>;

    /// Delete the (room, user) membership row; when it was the last one, the
    /// room and its chats are deleted in the same transaction.
    async fn remove_member(&self, room_id: i64, user_id: i64) -> Result<MemberRemoval, AppError>;

    /// A user's rooms ordered by most-recent-activity descending, each joined
    /// with its latest non-deleted chat.
    ///
    /// When `cursor_chat_id` is set, only rooms whose activity key is
    /// strictly below it are returned. `limit` includes any lookahead row.
    async fn find_summaries_by_user(
        &self,
        user_id: i64,
        cursor_chat_id: Option<i64>,
        limit: i64,
    ) -> Result<Vec<RoomSummary>, AppError>;
}
