//! Chat (message) entity, read models and repository trait.
//!
//! Maps to the `chats` table. Message posting is handled elsewhere; this core
//! only pages through history, so the repository is read-only.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Represents a message in a chat room.
///
/// Maps to the `chats` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - room_id: BIGINT NOT NULL REFERENCES chat_rooms(id)
/// - sender_id: BIGINT NOT NULL REFERENCES users(id)
/// - message: TEXT NOT NULL
/// - is_deleted: BOOLEAN NOT NULL DEFAULT FALSE
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// Room the message was sent to
    pub room_id: i64,

    /// Sender user ID
    pub sender_id: i64,

    /// Message text (immutable once created)
    pub message: String,

    /// Soft-delete flag; deleted rows stay in pagination results
    pub is_deleted: bool,

    /// Timestamp when the message was sent
    pub created_at: DateTime<Utc>,
}

/// A chat joined with its sender's public profile, as returned by the
/// history queries.
#[derive(Debug, Clone, Serialize)]
pub struct ChatSummary {
    pub id: i64,
    pub sender_id: i64,
    pub sender_name: String,
    pub sender_profile_image: Option<String>,
    pub message: String,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}

/// Repository trait for Chat history access.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Fetch one page of a room's history, newest first.
    ///
    /// When `before` is set, only rows with id strictly below it are
    /// returned. `limit` includes any lookahead row the caller asks for.
    async fn find_page(
        &self,
        room_id: i64,
        before: Option<i64>,
        limit: i64,
    ) -> Result<Vec<ChatSummary>, AppError>;

    /// Fetch a room's full history, oldest first.
    async fn find_all_by_room(&self, room_id: i64) -> Result<Vec<ChatSummary>, AppError>;
}
