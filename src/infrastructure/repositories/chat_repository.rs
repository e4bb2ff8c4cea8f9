//! Chat Repository Implementation
//!
//! PostgreSQL implementation of message-history queries with seek
//! pagination. Message posting belongs to another subsystem, so this
//! repository is read-only.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::entities::{ChatRepository, ChatSummary};
use crate::shared::error::AppError;

/// Chat row joined with its sender's public profile.
#[derive(Debug, sqlx::FromRow)]
struct ChatSummaryRow {
    id: i64,
    sender_id: i64,
    sender_name: String,
    sender_profile_image: Option<String>,
    message: String,
    is_deleted: bool,
    created_at: DateTime<Utc>,
}

impl ChatSummaryRow {
    fn into_summary(self) -> ChatSummary {
        ChatSummary {
            id: self.id,
            sender_id: self.sender_id,
            sender_name: self.sender_name,
            sender_profile_image: self.sender_profile_image,
            message: self.message,
            is_deleted: self.is_deleted,
            created_at: self.created_at,
        }
    }
}

/// PostgreSQL chat repository implementation.
#[derive(Clone)]
pub struct PgChatRepository {
    pool: PgPool,
}

impl PgChatRepository {
    /// Create a new PgChatRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatRepository for PgChatRepository {
    /// One page of history, newest first. Soft-deleted rows stay in the
    /// result; redaction happens at the boundary.
    async fn find_page(
        &self,
        room_id: i64,
        before: Option<i64>,
        limit: i64,
    ) -> Result<Vec<ChatSummary>, AppError> {
        let rows = match before {
            Some(before_id) => {
                // Seek pagination: rows strictly older than the cursor.
                sqlx::query_as::<_, ChatSummaryRow>(
                    r#"
                    SELECT c.id, c.sender_id, u.username AS sender_name,
                           u.profile_image_url AS sender_profile_image,
                           c.message, c.is_deleted, c.created_at
                    FROM chats c
                    JOIN users u ON u.id = c.sender_id
                    WHERE c.room_id = $1 AND c.id < $2
                    ORDER BY c.id DESC
                    LIMIT $3
                    "#,
                )
                .bind(room_id)
                .bind(before_id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ChatSummaryRow>(
                    r#"
                    SELECT c.id, c.sender_id, u.username AS sender_name,
                           u.profile_image_url AS sender_profile_image,
                           c.message, c.is_deleted, c.created_at
                    FROM chats c
                    JOIN users u ON u.id = c.sender_id
                    WHERE c.room_id = $1
                    ORDER BY c.id DESC
                    LIMIT $2
                    "#,
                )
                .bind(room_id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(|r| r.into_summary()).collect())
    }

    /// The full history, oldest first, for the non-paginated detail view.
    async fn find_all_by_room(&self, room_id: i64) -> Result<Vec<ChatSummary>, AppError> {
        let rows = sqlx::query_as::<_, ChatSummaryRow>(
            r#"
            SELECT c.id, c.sender_id, u.username AS sender_name,
                   u.profile_image_url AS sender_profile_image,
                   c.message, c.is_deleted, c.created_at
            FROM chats c
            JOIN users u ON u.id = c.sender_id
            WHERE c.room_id = $1
            ORDER BY c.id ASC
            "#,
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_summary()).collect())
    }
}
