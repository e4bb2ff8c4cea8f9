//! Response DTOs
//!
//! Data structures for API response bodies. Soft-deleted messages keep their
//! row but render with placeholder text here, at the boundary.

use serde::Serialize;

use crate::application::services::{RoomCreated, RoomDetail, RoomEdited, RoomLeft};
use crate::domain::entities::{ChatSummary, RoomSummary};

/// Text shown in place of a soft-deleted message
const DELETED_MESSAGE_TEXT: &str = "This message has been deleted.";

/// Room creation response; echoes the id actually committed (or reused)
#[derive(Debug, Serialize)]
pub struct RoomCreateResponse {
    pub room_id: String,
}

impl From<RoomCreated> for RoomCreateResponse {
    fn from(created: RoomCreated) -> Self {
        Self {
            room_id: created.room_id.to_string(),
        }
    }
}

/// Title edit response; echoes the committed title
#[derive(Debug, Serialize)]
pub struct RoomEditResponse {
    pub room_id: String,
    pub title: String,
}

impl From<RoomEdited> for RoomEditResponse {
    fn from(edited: RoomEdited) -> Self {
        Self {
            room_id: edited.room_id.to_string(),
            title: edited.title,
        }
    }
}

/// Leave response
#[derive(Debug, Serialize)]
pub struct RoomLeaveResponse {
    pub room_id: String,
}

impl From<RoomLeft> for RoomLeaveResponse {
    fn from(left: RoomLeft) -> Self {
        Self {
            room_id: left.room_id.to_string(),
        }
    }
}

/// A single message with its sender's public profile
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub chat_id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub sender_profile_image: Option<String>,
    pub message: String,
    pub is_deleted: bool,
    pub created_at: String,
}

impl From<ChatSummary> for ChatResponse {
    fn from(chat: ChatSummary) -> Self {
        let message = if chat.is_deleted {
            DELETED_MESSAGE_TEXT.to_owned()
        } else {
            chat.message
        };

        Self {
            chat_id: chat.id.to_string(),
            sender_id: chat.sender_id.to_string(),
            sender_name: chat.sender_name,
            sender_profile_image: chat.sender_profile_image,
            message,
            is_deleted: chat.is_deleted,
            created_at: chat.created_at.to_rfc3339(),
        }
    }
}

/// A room-list entry: the room plus its latest visible message
#[derive(Debug, Serialize)]
pub struct RoomSummaryResponse {
    pub room_id: String,
    pub title: String,
    pub created_at: String,
    pub last_chat: Option<ChatResponse>,
}

impl From<RoomSummary> for RoomSummaryResponse {
    fn from(summary: RoomSummary) -> Self {
        Self {
            room_id: summary.room_id.to_string(),
            title: summary.title,
            created_at: summary.created_at.to_rfc3339(),
            last_chat: summary.last_chat.map(ChatResponse::from),
        }
    }
}

/// Full-history room view
#[derive(Debug, Serialize)]
pub struct RoomDetailResponse {
    pub room_id: String,
    pub title: String,
    pub created_at: String,
    pub chats: Vec<ChatResponse>,
}

impl From<RoomDetail> for RoomDetailResponse {
    fn from(detail: RoomDetail) -> Self {
        Self {
            room_id: detail.room.id.to_string(),
            title: detail.room.title,
            created_at: detail.room.created_at.to_rfc3339(),
            chats: detail.chats.into_iter().map(ChatResponse::from).collect(),
        }
    }
}
