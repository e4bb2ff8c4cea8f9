//! Repository Implementations
//!
//! PostgreSQL implementations of the domain repository traits. Each
//! repository exposes only the narrow query shapes the core needs, not a
//! generic data-access layer.
//!
//! ## Available Repositories
//!
//! - **UserRepository** - user lookups (read-only)
//! - **ChatRoomRepository** - room lifecycle and the room-list query
//! - **MembershipRepository** - authorization and pair-dedup lookups
//! - **ChatRepository** - message history with seek pagination

pub mod chat_repository;
pub mod chat_room_repository;
pub mod membership_repository;
pub mod user_repository;

pub use chat_repository::PgChatRepository;
pub use chat_room_repository::PgChatRoomRepository;
pub use membership_repository::PgMembershipRepository;
pub use user_repository::PgUserRepository;
