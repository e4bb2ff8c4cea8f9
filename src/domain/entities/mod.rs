//! # Domain Entities
//!
//! Core domain entities for the chat-room system. Entities are plain data
//! records keyed by opaque ids; all traversal between them goes through
//! explicit store queries rather than in-memory object graphs.
//!
//! ## Core Entities
//!
//! - **User**: a user identity (read-only for this core)
//! - **ChatRoom**: a personal (1:1) or group room
//! - **RoomMembership**: the join relation granting a user access to a room
//! - **Chat**: a message in a room, soft-deletable
//!
//! ## Repository Traits
//!
//! Each entity has an associated repository trait defining the narrow query
//! shapes the core needs. The traits are implemented in the infrastructure
//! layer, following the dependency inversion principle.

mod chat;
mod chat_room;
mod membership;
mod user;

pub use chat::{Chat, ChatRepository, ChatSummary};
pub use chat_room::{ChatRoom, ChatRoomRepository, MemberRemoval, RoomSummary};
pub use membership::{MembershipRepository, RoomMembership};
pub use user::{User, UserRepository};

#[cfg(test)]
pub use chat::MockChatRepository;
#[cfg(test)]
pub use chat_room::MockChatRoomRepository;
#[cfg(test)]
pub use membership::MockMembershipRepository;
#[cfg(test)]
pub use user::MockUserRepository;
