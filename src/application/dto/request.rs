//! Request DTOs
//!
//! Data structures for API request bodies and query parameters. IDs travel
//! as strings in JSON (snowflake convention); handlers parse them.

use serde::Deserialize;
use validator::Validate;

/// Create a personal (1:1) room
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePersonalRoomRequest {
    pub friend_id: String,
}

/// Create a group room
#[derive(Debug, Deserialize, Validate)]
pub struct CreateGroupRoomRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "At least one member is required"))]
    pub member_ids: Vec<String>,
}

/// Edit a room's title
#[derive(Debug, Deserialize, Validate)]
pub struct EditRoomRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters"))]
    pub title: String,
}

/// Room list query parameters
#[derive(Debug, Deserialize)]
pub struct RoomListParams {
    /// Activity key of the last room seen on the previous page
    pub cursor: Option<String>,
    pub limit: Option<i64>,
}

/// Message page query parameters
#[derive(Debug, Deserialize)]
pub struct MessagePageParams {
    /// Fetch messages strictly older than this chat id
    pub before: Option<String>,
    pub limit: Option<i64>,
}
