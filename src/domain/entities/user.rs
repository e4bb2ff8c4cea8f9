//! User entity and repository trait.
//!
//! Maps to the `users` table in the database schema. Users are provisioned
//! elsewhere; this core only reads them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

/// Represents a user identity referenced by rooms, memberships and chats.
///
/// Maps to the `users` table:
/// - id: BIGINT PRIMARY KEY (Snowflake ID)
/// - username: VARCHAR(32) NOT NULL UNIQUE
/// - profile_image_url: TEXT NULL
/// - created_at: TIMESTAMPTZ NOT NULL DEFAULT NOW()
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Snowflake ID (primary key)
    pub id: i64,

    /// Display name (2-32 characters, unique)
    pub username: String,

    /// URL to the user's profile image
    pub profile_image_url: Option<String>,

    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Repository trait for User lookups.
///
/// The core never mutates users; account management belongs to an upstream
/// collaborator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by its Snowflake ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Check whether a user id exists.
    async fn exists_by_id(&self, id: i64) -> Result<bool, AppError>;
}
