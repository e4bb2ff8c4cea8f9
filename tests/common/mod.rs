//! Common Test Utilities
//!
//! An in-memory entity store implementing the repository traits, so the
//! command/query services can be driven end-to-end without a database.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use chat_room_server::application::services::{
    ChatRoomCommandServiceImpl, ChatRoomQueryServiceImpl,
};
use chat_room_server::domain::entities::{
    Chat, ChatRepository, ChatRoom, ChatRoomRepository, ChatSummary, MemberRemoval,
    MembershipRepository, RoomMembership, RoomSummary, User, UserRepository,
};
use chat_room_server::shared::error::AppError;
use chat_room_server::shared::snowflake::SnowflakeGenerator;

#[derive(Default)]
struct StoreState {
    users: BTreeMap<i64, User>,
    rooms: BTreeMap<i64, ChatRoom>,
    memberships: Vec<RoomMembership>,
    chats: BTreeMap<i64, Chat>,
}

impl StoreState {
    fn chat_summary(&self, chat: &Chat) -> ChatSummary {
        let sender = self.users.get(&chat.sender_id);
        ChatSummary {
            id: chat.id,
            sender_id: chat.sender_id,
            sender_name: sender.map(|u| u.username.clone()).unwrap_or_default(),
            sender_profile_image: sender.and_then(|u| u.profile_image_url.clone()),
            message: chat.message.clone(),
            is_deleted: chat.is_deleted,
            created_at: chat.created_at,
        }
    }

    fn member_ids(&self, room_id: i64) -> Vec<i64> {
        self.memberships
            .iter()
            .filter(|m| m.room_id == room_id)
            .map(|m| m.user_id)
            .collect()
    }
}

/// Shared in-memory entity store.
#[derive(Default, Clone)]
pub struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_user(&self, id: i64, username: &str) {
        self.state.lock().users.insert(
            id,
            User {
                id,
                username: username.to_owned(),
                profile_image_url: None,
                created_at: Utc::now(),
            },
        );
    }

    pub fn seed_chat(&self, id: i64, room_id: i64, sender_id: i64, message: &str) {
        self.state.lock().chats.insert(
            id,
            Chat {
                id,
                room_id,
                sender_id,
                message: message.to_owned(),
                is_deleted: false,
                created_at: Utc::now(),
            },
        );
    }

    pub fn mark_chat_deleted(&self, chat_id: i64) {
        if let Some(chat) = self.state.lock().chats.get_mut(&chat_id) {
            chat.is_deleted = true;
        }
    }

    pub fn room_count(&self) -> usize {
        self.state.lock().rooms.len()
    }

    pub fn membership_count(&self, room_id: i64) -> usize {
        self.state.lock().member_ids(room_id).len()
    }

    pub fn chat_count(&self, room_id: i64) -> usize {
        self.state
            .lock()
            .chats
            .values()
            .filter(|c| c.room_id == room_id)
            .count()
    }

    pub fn room_title(&self, room_id: i64) -> Option<String> {
        self.state.lock().rooms.get(&room_id).map(|r| r.title.clone())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.state.lock().users.get(&id).cloned())
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.state.lock().users.contains_key(&id))
    }
}

#[async_trait]
impl ChatRoomRepository for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<ChatRoom>, AppError> {
        Ok(self.state.lock().rooms.get(&id).cloned())
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.state.lock().rooms.contains_key(&id))
    }

    async fn create_with_members(
        &self,
        room: &ChatRoom,
        member_ids: &[i64],
    ) -> Result<ChatRoom, AppError> {
        let mut member_ids = member_ids.to_vec();
        member_ids.sort_unstable();
        member_ids.dedup();

        let mut state = self.state.lock();
        state.rooms.insert(room.id, room.clone());
        for member_id in member_ids {
            state
                .memberships
                .push(RoomMembership::new(room.id, member_id));
        }
        Ok(room.clone())
    }

    async fn update_title(&self, room_id: i64, title: &str) -> Result<(), AppError> {
        let mut state = self.state.lock();
        match state.rooms.get_mut(&room_id) {
            Some(room) => {
                room.title = title.to_owned();
                Ok(())
            }
            None => Err(AppError::NotFound(format!("Chat room {} not found", room_id))),
        }
    }

    async fn remove_member(&self, room_id: i64, user_id: i64) -> Result<MemberRemoval, AppError> {
        let mut state = self.state.lock();
        state
            .memberships
            .retain(|m| !(m.room_id == room_id && m.user_id == user_id));

        let remaining = state.member_ids(room_id).len() as i64;
        let room_deleted = remaining == 0;
        if room_deleted {
            state.chats.retain(|_, c| c.room_id != room_id);
            state.rooms.remove(&room_id);
        }

        Ok(MemberRemoval {
            remaining_members: remaining,
            room_deleted,
        })
    }

    async fn find_summaries_by_user(
        &self,
        user_id: i64,
        cursor_chat_id: Option<i64>,
        limit: i64,
    ) -> Result<Vec<RoomSummary>, AppError> {
        let state = self.state.lock();

        let mut summaries: Vec<RoomSummary> = state
            .rooms
            .values()
            .filter(|room| state.member_ids(room.id).contains(&user_id))
            .map(|room| {
                let last_chat = state
                    .chats
                    .values()
                    .filter(|c| c.room_id == room.id && !c.is_deleted)
                    .max_by_key(|c| c.id)
                    .map(|c| state.chat_summary(c));
                RoomSummary {
                    room_id: room.id,
                    title: room.title.clone(),
                    created_at: room.created_at,
                    last_chat,
                }
            })
            .collect();

        summaries.sort_by(|a, b| {
            b.activity_key()
                .cmp(&a.activity_key())
                .then(b.room_id.cmp(&a.room_id))
        });

        if let Some(cursor) = cursor_chat_id {
            summaries.retain(|s| s.activity_key() < cursor);
        }
        summaries.truncate(limit as usize);

        Ok(summaries)
    }
}

#[async_trait]
impl MembershipRepository for InMemoryStore {
    async fn find_by_room_and_user(
        &self,
        room_id: i64,
        user_id: i64,
    ) -> Result<Option<RoomMembership>, AppError> {
        Ok(self
            .state
            .lock()
            .memberships
            .iter()
            .find(|m| m.room_id == room_id && m.user_id == user_id)
            .cloned())
    }

    async fn exists_by_room_and_user(
        &self,
        room_id: i64,
        user_id: i64,
    ) -> Result<bool, AppError> {
        Ok(self
            .state
            .lock()
            .memberships
            .iter()
            .any(|m| m.room_id == room_id && m.user_id == user_id))
    }

    async fn find_personal_room(
        &self,
        user_a: i64,
        user_b: i64,
    ) -> Result<Option<ChatRoom>, AppError> {
        let state = self.state.lock();
        let room = state.rooms.values().find(|room| {
            let mut members = state.member_ids(room.id);
            members.sort_unstable();
            let mut pair = vec![user_a, user_b];
            pair.sort_unstable();
            members.len() == 2 && members == pair
        });
        Ok(room.cloned())
    }
}

#[async_trait]
impl ChatRepository for InMemoryStore {
    async fn find_page(
        &self,
        room_id: i64,
        before: Option<i64>,
        limit: i64,
    ) -> Result<Vec<ChatSummary>, AppError> {
        let state = self.state.lock();
        let mut chats: Vec<&Chat> = state
            .chats
            .values()
            .filter(|c| c.room_id == room_id)
            .filter(|c| before.map(|cursor| c.id < cursor).unwrap_or(true))
            .collect();
        chats.sort_by(|a, b| b.id.cmp(&a.id));
        chats.truncate(limit as usize);
        Ok(chats.into_iter().map(|c| state.chat_summary(c)).collect())
    }

    async fn find_all_by_room(&self, room_id: i64) -> Result<Vec<ChatSummary>, AppError> {
        let state = self.state.lock();
        let mut chats: Vec<&Chat> = state
            .chats
            .values()
            .filter(|c| c.room_id == room_id)
            .collect();
        chats.sort_by_key(|c| c.id);
        Ok(chats.into_iter().map(|c| state.chat_summary(c)).collect())
    }
}

pub type CommandService =
    ChatRoomCommandServiceImpl<InMemoryStore, InMemoryStore, InMemoryStore>;
pub type QueryService = ChatRoomQueryServiceImpl<InMemoryStore, InMemoryStore, InMemoryStore>;

/// Build the command service over a shared store.
pub fn command_service(store: &InMemoryStore) -> CommandService {
    ChatRoomCommandServiceImpl::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(SnowflakeGenerator::new(1)),
    )
}

/// Build the query service over a shared store.
pub fn query_service(store: &InMemoryStore) -> QueryService {
    ChatRoomQueryServiceImpl::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
    )
}
