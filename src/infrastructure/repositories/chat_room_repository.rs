//! Chat Room Repository Implementation
//!
//! PostgreSQL implementation of room lifecycle and the room-list query.
//! Multi-row writes run inside one transaction so partial state is never
//! observable (a room without its memberships, or the reverse).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::entities::{
    ChatRoom, ChatRoomRepository, ChatSummary, MemberRemoval, RoomSummary,
};
use crate::infrastructure::database::execute_in_transaction;
use crate::shared::error::AppError;

/// Database row representation matching the `chat_rooms` table schema.
#[derive(Debug, sqlx::FromRow)]
struct ChatRoomRow {
    id: i64,
    title: String,
    created_at: DateTime<Utc>,
}

impl ChatRoomRow {
    fn into_room(self) -> ChatRoom {
        ChatRoom {
            id: self.id,
            title: self.title,
            created_at: self.created_at,
        }
    }
}

/// Room-list row: a room joined with its latest non-deleted chat (if any).
#[derive(Debug, sqlx::FromRow)]
struct RoomSummaryRow {
    room_id: i64,
    title: String,
    created_at: DateTime<Utc>,
    last_chat_id: Option<i64>,
    last_sender_id: Option<i64>,
    last_sender_name: Option<String>,
    last_sender_profile_image: Option<String>,
    last_message: Option<String>,
    last_is_deleted: Option<bool>,
    last_chat_at: Option<DateTime<Utc>>,
}

impl RoomSummaryRow {
    fn into_summary(self) -> RoomSummary {
        let last_chat = self.last_chat_id.map(|chat_id| ChatSummary {
            id: chat_id,
            sender_id: self.last_sender_id.unwrap_or_default(),
            sender_name: self.last_sender_name.unwrap_or_default(),
            sender_profile_image: self.last_sender_profile_image,
            message: self.last_message.unwrap_or_default(),
            is_deleted: self.last_is_deleted.unwrap_or_default(),
            created_at: self.last_chat_at.unwrap_or(self.created_at),
        });

        RoomSummary {
            room_id: self.room_id,
            title: self.title,
            created_at: self.created_at,
            last_chat,
        }
    }
}

const ROOM_SUMMARY_SELECT: &str = r#"
    SELECT r.id AS room_id, r.title, r.created_at,
           c.id AS last_chat_id, c.sender_id AS last_sender_id,
           c.sender_name AS last_sender_name,
           c.sender_profile_image AS last_sender_profile_image,
           c.message AS last_message, c.is_deleted AS last_is_deleted,
           c.created_at AS last_chat_at
    FROM chat_rooms r
    JOIN chat_room_members m ON m.room_id = r.id AND m.user_id = $1
    LEFT JOIN LATERAL (
        SELECT ch.id, ch.sender_id, u.username AS sender_name,
               u.profile_image_url AS sender_profile_image,
               ch.message, ch.is_deleted, ch.created_at
        FROM chats ch
        JOIN users u ON u.id = ch.sender_id
        WHERE ch.room_id = r.id AND ch.is_deleted = FALSE
        ORDER BY ch.id DESC
        LIMIT 1
    ) c ON TRUE
"#;

/// PostgreSQL chat room repository implementation.
#[derive(Clone)]
pub struct PgChatRoomRepository {
    pool: PgPool,
}

impl PgChatRoomRepository {
    /// Create a new PgChatRoomRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatRoomRepository for PgChatRoomRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<ChatRoom>, AppError> {
        let row = sqlx::query_as::<_, ChatRoomRow>(
            r#"
            SELECT id, title, created_at
            FROM chat_rooms
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_room()))
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM chat_rooms WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn create_with_members(
        &self,
        room: &ChatRoom,
        member_ids: &[i64],
    ) -> Result<ChatRoom, AppError> {
        let room = room.clone();
        let mut member_ids = member_ids.to_vec();
        member_ids.sort_unstable();
        member_ids.dedup();

        execute_in_transaction(&self.pool, move |tx| {
            Box::pin(async move {
                sqlx::query(
                    r#"
                    INSERT INTO chat_rooms (id, title, created_at)
                    VALUES ($1, $2, $3)
                    "#,
                )
                .bind(room.id)
                .bind(&room.title)
                .bind(room.created_at)
                .execute(&mut **tx)
                .await?;

                for member_id in member_ids {
                    sqlx::query(
                        r#"
                        INSERT INTO chat_room_members (room_id, user_id, joined_at)
                        VALUES ($1, $2, $3)
                        "#,
                    )
                    .bind(room.id)
                    .bind(member_id)
                    .bind(Utc::now())
                    .execute(&mut **tx)
                    .await?;
                }

                Ok(room)
            })
        })
        .await
    }

    async fn update_title(&self, room_id: i64, title: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE chat_rooms SET title = $2 WHERE id = $1")
            .bind(room_id)
            .bind(title)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Chat room {} not found", room_id)));
        }

        Ok(())
    }

    async fn remove_member(&self, room_id: i64, user_id: i64) -> Result<MemberRemoval, AppError> {
        execute_in_transaction(&self.pool, move |tx| {
            Box::pin(async move {
                sqlx::query(
                    "DELETE FROM chat_room_members WHERE room_id = $1 AND user_id = $2",
                )
                .bind(room_id)
                .bind(user_id)
                .execute(&mut **tx)
                .await?;

                let remaining: i64 = sqlx::query_scalar(
                    "SELECT COUNT(*) FROM chat_room_members WHERE room_id = $1",
                )
                .bind(room_id)
                .fetch_one(&mut **tx)
                .await?;

                // Last leaver garbage-collects the room and its chats.
                let room_deleted = remaining == 0;
                if room_deleted {
                    sqlx::query("DELETE FROM chats WHERE room_id = $1")
                        .bind(room_id)
                        .execute(&mut **tx)
                        .await?;
                    sqlx::query("DELETE FROM chat_rooms WHERE id = $1")
                        .bind(room_id)
                        .execute(&mut **tx)
                        .await?;
                }

                Ok(MemberRemoval {
                    remaining_members: remaining,
                    room_deleted,
                })
            })
        })
        .await
    }

    async fn find_summaries_by_user(
        &self,
        user_id: i64,
        cursor_chat_id: Option<i64>,
        limit: i64,
    ) -> Result<Vec<RoomSummary>, AppError> {
        let rows = match cursor_chat_id {
            Some(cursor) => {
                // Seek below the cursor's activity key; message-less rooms
                // carry key 0 and sort last.
                let sql = format!(
                    "{ROOM_SUMMARY_SELECT}
                    WHERE COALESCE(c.id, 0) < $2
                    ORDER BY COALESCE(c.id, 0) DESC, r.id DESC
                    LIMIT $3"
                );
                sqlx::query_as::<_, RoomSummaryRow>(&sql)
                    .bind(user_id)
                    .bind(cursor)
                    .bind(limit)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "{ROOM_SUMMARY_SELECT}
                    ORDER BY COALESCE(c.id, 0) DESC, r.id DESC
                    LIMIT $2"
                );
                sqlx::query_as::<_, RoomSummaryRow>(&sql)
                    .bind(user_id)
                    .bind(limit)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(rows.into_iter().map(|r| r.into_summary()).collect())
    }
}
