//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **ChatRoomCommandService**: room creation, title edits, leaving
//! - **ChatRoomQueryService**: room list, message pages, full detail

pub mod room_command_service;
pub mod room_query_service;

// Re-export command service types
pub use room_command_service::{
    ChatRoomCommandService, ChatRoomCommandServiceImpl, CreateGroupRoomDto, RoomCreated,
    RoomEdited, RoomLeft,
};

// Re-export query service types
pub use room_query_service::{ChatRoomQueryService, ChatRoomQueryServiceImpl, RoomDetail};
