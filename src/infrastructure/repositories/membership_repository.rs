//! Membership Repository Implementation
//!
//! PostgreSQL implementation of the read-side membership queries used for
//! authorization and personal-room deduplication.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::entities::{ChatRoom, MembershipRepository, RoomMembership};
use crate::shared::error::AppError;

/// Database row representation matching the `chat_room_members` table schema.
#[derive(Debug, sqlx::FromRow)]
struct MembershipRow {
    room_id: i64,
    user_id: i64,
    joined_at: DateTime<Utc>,
}

impl MembershipRow {
    fn into_membership(self) -> RoomMembership {
        RoomMembership {
            room_id: self.room_id,
            user_id: self.user_id,
            joined_at: self.joined_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ChatRoomRow {
    id: i64,
    title: String,
    created_at: DateTime<Utc>,
}

/// PostgreSQL membership repository implementation.
#[derive(Clone)]
pub struct PgMembershipRepository {
    pool: PgPool,
}

impl PgMembershipRepository {
    /// Create a new PgMembershipRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipRepository for PgMembershipRepository {
    async fn find_by_room_and_user(
        &self,
        room_id: i64,
        user_id: i64,
    ) -> Result<Option<RoomMembership>, AppError> {
        let row = sqlx::query_as::<_, MembershipRow>(
            r#"
            SELECT room_id, user_id, joined_at
            FROM chat_room_members
            WHERE room_id = $1 AND user_id = $2
            "#,
        )
        .bind(room_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_membership()))
    }

    async fn exists_by_room_and_user(
        &self,
        room_id: i64,
        user_id: i64,
    ) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM chat_room_members
                WHERE room_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(room_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// The exact-pair lookup behind personal-room deduplication: a room
    /// qualifies when it has exactly two members and both are in {a, b}.
    /// Argument order does not matter.
    async fn find_personal_room(
        &self,
        user_a: i64,
        user_b: i64,
    ) -> Result<Option<ChatRoom>, AppError> {
        let row = sqlx::query_as::<_, ChatRoomRow>(
            r#"
            SELECT r.id, r.title, r.created_at
            FROM chat_rooms r
            WHERE (SELECT COUNT(*) FROM chat_room_members m WHERE m.room_id = r.id) = 2
              AND EXISTS (
                  SELECT 1 FROM chat_room_members m
                  WHERE m.room_id = r.id AND m.user_id = $1
              )
              AND EXISTS (
                  SELECT 1 FROM chat_room_members m
                  WHERE m.room_id = r.id AND m.user_id = $2
              )
            ORDER BY r.id
            LIMIT 1
            "#,
        )
        .bind(user_a)
        .bind(user_b)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| ChatRoom {
            id: r.id,
            title: r.title,
            created_at: r.created_at,
        }))
    }
}
