//! Chat Room Query Service
//!
//! Read-side operations: the user's room list joined with each room's latest
//! message, a room's paginated message history, and the full-history detail
//! view. Both paginated queries use exclusive id-based seek cursors.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::entities::{
    ChatRepository, ChatRoom, ChatRoomRepository, ChatSummary, MembershipRepository, RoomSummary,
};
use crate::domain::services::MembershipAuthorizer;
use crate::shared::error::RoomError;
use crate::shared::pagination::{clamp_page_size, Slice};

/// Query-side service trait
#[async_trait]
pub trait ChatRoomQueryService: Send + Sync {
    /// The caller's rooms ordered by most-recent-activity descending
    async fn list_rooms(
        &self,
        user_id: i64,
        cursor_chat_id: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<Slice<RoomSummary>, RoomError>;

    /// One page of a room's message history, newest first
    async fn get_room_messages(
        &self,
        room_id: i64,
        requester_id: i64,
        last_chat_id: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<Slice<ChatSummary>, RoomError>;

    /// A room together with its full message history
    async fn get_room_detail(
        &self,
        room_id: i64,
        requester_id: i64,
    ) -> Result<RoomDetail, RoomError>;
}

/// Full-history room view
#[derive(Debug, Clone)]
pub struct RoomDetail {
    pub room: ChatRoom,
    pub chats: Vec<ChatSummary>,
}

/// ChatRoomQueryService implementation
pub struct ChatRoomQueryServiceImpl<R, M, C>
where
    R: ChatRoomRepository,
    M: MembershipRepository,
    C: ChatRepository,
{
    room_repo: Arc<R>,
    chat_repo: Arc<C>,
    authorizer: MembershipAuthorizer<M>,
}

impl<R, M, C> ChatRoomQueryServiceImpl<R, M, C>
where
    R: ChatRoomRepository,
    M: MembershipRepository,
    C: ChatRepository,
{
    pub fn new(room_repo: Arc<R>, membership_repo: Arc<M>, chat_repo: Arc<C>) -> Self {
        Self {
            room_repo,
            chat_repo,
            authorizer: MembershipAuthorizer::new(membership_repo),
        }
    }
}

#[async_trait]
impl<R, M, C> ChatRoomQueryService for ChatRoomQueryServiceImpl<R, M, C>
where
    R: ChatRoomRepository + 'static,
    M: MembershipRepository + 'static,
    C: ChatRepository + 'static,
{
    async fn list_rooms(
        &self,
        user_id: i64,
        cursor_chat_id: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<Slice<RoomSummary>, RoomError> {
        let page_size = clamp_page_size(page_size);

        let rows = self
            .room_repo
            .find_summaries_by_user(user_id, cursor_chat_id, page_size + 1)
            .await?;

        Ok(Slice::from_lookahead(rows, page_size as usize))
    }

    async fn get_room_messages(
        &self,
        room_id: i64,
        requester_id: i64,
        last_chat_id: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<Slice<ChatSummary>, RoomError> {
        self.authorizer.require_member(room_id, requester_id).await?;

        self.room_repo
            .find_by_id(room_id)
            .await?
            .ok_or(RoomError::RoomNotFound)?;

        let page_size = clamp_page_size(page_size);
        let rows = self
            .chat_repo
            .find_page(room_id, last_chat_id, page_size + 1)
            .await?;

        Ok(Slice::from_lookahead(rows, page_size as usize))
    }

    async fn get_room_detail(
        &self,
        room_id: i64,
        requester_id: i64,
    ) -> Result<RoomDetail, RoomError> {
        self.authorizer.require_member(room_id, requester_id).await?;

        let room = self
            .room_repo
            .find_by_id(room_id)
            .await?
            .ok_or(RoomError::RoomNotFound)?;

        let chats = self.chat_repo.find_all_by_room(room_id).await?;
        // A message-less room is an error for this accessor only; the
        // paginated variant returns an empty page instead.
        if chats.is_empty() {
            return Err(RoomError::ChatNotFound);
        }

        Ok(RoomDetail { room, chats })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{
        MockChatRepository, MockChatRoomRepository, MockMembershipRepository,
    };
    use crate::shared::pagination::MAX_PAGE_SIZE;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    const ROOM_ID: i64 = 100;
    const MEMBER_ID: i64 = 1;
    const OUTSIDER_ID: i64 = 9;

    fn chat_summary(id: i64) -> ChatSummary {
        ChatSummary {
            id,
            sender_id: MEMBER_ID,
            sender_name: "user-1".into(),
            sender_profile_image: None,
            message: format!("message {id}"),
            is_deleted: false,
            created_at: Utc::now(),
        }
    }

    fn room_summary(room_id: i64, last_chat_id: Option<i64>) -> RoomSummary {
        RoomSummary {
            room_id,
            title: String::new(),
            created_at: Utc::now(),
            last_chat: last_chat_id.map(chat_summary),
        }
    }

    fn service(
        room_repo: MockChatRoomRepository,
        membership_repo: MockMembershipRepository,
        chat_repo: MockChatRepository,
    ) -> ChatRoomQueryServiceImpl<
        MockChatRoomRepository,
        MockMembershipRepository,
        MockChatRepository,
    > {
        ChatRoomQueryServiceImpl::new(
            Arc::new(room_repo),
            Arc::new(membership_repo),
            Arc::new(chat_repo),
        )
    }

    #[tokio::test]
    async fn list_rooms_trims_the_lookahead_row() {
        let mut room_repo = MockChatRoomRepository::new();
        room_repo
            .expect_find_summaries_by_user()
            .withf(|&user_id, &cursor, &limit| {
                user_id == MEMBER_ID && cursor.is_none() && limit == 3
            })
            .returning(|_, _, _| {
                Ok(vec![
                    room_summary(101, Some(30)),
                    room_summary(102, Some(20)),
                    room_summary(103, Some(10)),
                ])
            });

        let svc = service(
            room_repo,
            MockMembershipRepository::new(),
            MockChatRepository::new(),
        );
        let slice = svc.list_rooms(MEMBER_ID, None, Some(2)).await.unwrap();
        assert_eq!(
            slice.items.iter().map(|r| r.room_id).collect::<Vec<_>>(),
            vec![101, 102]
        );
        assert!(slice.has_more);
    }

    #[tokio::test]
    async fn list_rooms_passes_the_cursor_through() {
        let mut room_repo = MockChatRoomRepository::new();
        room_repo
            .expect_find_summaries_by_user()
            .withf(|_, &cursor, _| cursor == Some(20))
            .returning(|_, _, _| Ok(vec![room_summary(103, Some(10))]));

        let svc = service(
            room_repo,
            MockMembershipRepository::new(),
            MockChatRepository::new(),
        );
        let slice = svc
            .list_rooms(MEMBER_ID, Some(20), Some(2))
            .await
            .unwrap();
        assert_eq!(slice.items.len(), 1);
        assert!(!slice.has_more);
    }

    #[tokio::test]
    async fn list_rooms_clamps_oversized_page_requests() {
        let mut room_repo = MockChatRoomRepository::new();
        room_repo
            .expect_find_summaries_by_user()
            .withf(|_, _, &limit| limit == MAX_PAGE_SIZE + 1)
            .returning(|_, _, _| Ok(vec![]));

        let svc = service(
            room_repo,
            MockMembershipRepository::new(),
            MockChatRepository::new(),
        );
        let slice = svc
            .list_rooms(MEMBER_ID, None, Some(10_000))
            .await
            .unwrap();
        assert!(slice.items.is_empty());
        assert!(!slice.has_more);
    }

    #[tokio::test]
    async fn message_page_returns_newest_first_with_lookahead() {
        let mut membership_repo = MockMembershipRepository::new();
        membership_repo
            .expect_exists_by_room_and_user()
            .returning(|_, _| Ok(true));

        let mut room_repo = MockChatRoomRepository::new();
        room_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(ChatRoom::new(id, String::new()))));

        let mut chat_repo = MockChatRepository::new();
        chat_repo
            .expect_find_page()
            .withf(|&room_id, &before, &limit| {
                room_id == ROOM_ID && before.is_none() && limit == 6
            })
            .returning(|_, _, _| Ok((15..=20).rev().map(chat_summary).collect()));

        let svc = service(room_repo, membership_repo, chat_repo);
        let slice = svc
            .get_room_messages(ROOM_ID, MEMBER_ID, None, Some(5))
            .await
            .unwrap();
        assert_eq!(
            slice.items.iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![20, 19, 18, 17, 16]
        );
        assert!(slice.has_more);
    }

    #[tokio::test]
    async fn message_page_cursor_bounds_ids_strictly_below() {
        let mut membership_repo = MockMembershipRepository::new();
        membership_repo
            .expect_exists_by_room_and_user()
            .returning(|_, _| Ok(true));

        let mut room_repo = MockChatRoomRepository::new();
        room_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(ChatRoom::new(id, String::new()))));

        let mut chat_repo = MockChatRepository::new();
        chat_repo
            .expect_find_page()
            .withf(|_, &before, _| before == Some(16))
            .returning(|_, _, _| Ok((11..=15).rev().map(chat_summary).collect()));

        let svc = service(room_repo, membership_repo, chat_repo);
        let slice = svc
            .get_room_messages(ROOM_ID, MEMBER_ID, Some(16), Some(5))
            .await
            .unwrap();
        assert_eq!(
            slice.items.iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![15, 14, 13, 12, 11]
        );
        assert!(!slice.has_more);
    }

    #[tokio::test]
    async fn message_page_denies_non_members_before_touching_the_room() {
        let mut membership_repo = MockMembershipRepository::new();
        membership_repo
            .expect_exists_by_room_and_user()
            .returning(|_, _| Ok(false));

        // No expectations on the room or chat repositories: the mocks panic
        // if a non-member's request reaches them.
        let svc = service(
            MockChatRoomRepository::new(),
            membership_repo,
            MockChatRepository::new(),
        );
        let err = svc
            .get_room_messages(ROOM_ID, OUTSIDER_ID, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, RoomError::AccessDenied));
    }

    #[tokio::test]
    async fn message_page_fails_for_unknown_room() {
        let mut membership_repo = MockMembershipRepository::new();
        membership_repo
            .expect_exists_by_room_and_user()
            .returning(|_, _| Ok(true));

        let mut room_repo = MockChatRoomRepository::new();
        room_repo.expect_find_by_id().returning(|_| Ok(None));

        let svc = service(room_repo, membership_repo, MockChatRepository::new());
        let err = svc
            .get_room_messages(ROOM_ID, MEMBER_ID, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, RoomError::RoomNotFound));
    }

    #[tokio::test]
    async fn detail_returns_room_and_full_history() {
        let mut membership_repo = MockMembershipRepository::new();
        membership_repo
            .expect_exists_by_room_and_user()
            .returning(|_, _| Ok(true));

        let mut room_repo = MockChatRoomRepository::new();
        room_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(ChatRoom::new(id, "standup".into()))));

        let mut chat_repo = MockChatRepository::new();
        chat_repo
            .expect_find_all_by_room()
            .returning(|_| Ok((1..=3).map(chat_summary).collect()));

        let svc = service(room_repo, membership_repo, chat_repo);
        let detail = svc.get_room_detail(ROOM_ID, MEMBER_ID).await.unwrap();
        assert_eq!(detail.room.title, "standup");
        assert_eq!(detail.chats.len(), 3);
    }

    #[tokio::test]
    async fn detail_denies_non_members() {
        let mut membership_repo = MockMembershipRepository::new();
        membership_repo
            .expect_exists_by_room_and_user()
            .returning(|_, _| Ok(false));

        let svc = service(
            MockChatRoomRepository::new(),
            membership_repo,
            MockChatRepository::new(),
        );
        let err = svc
            .get_room_detail(ROOM_ID, OUTSIDER_ID)
            .await
            .unwrap_err();
        assert!(matches!(err, RoomError::AccessDenied));
    }

    #[tokio::test]
    async fn detail_fails_for_unknown_room() {
        let mut membership_repo = MockMembershipRepository::new();
        membership_repo
            .expect_exists_by_room_and_user()
            .returning(|_, _| Ok(true));

        let mut room_repo = MockChatRoomRepository::new();
        room_repo.expect_find_by_id().returning(|_| Ok(None));

        let svc = service(room_repo, membership_repo, MockChatRepository::new());
        let err = svc.get_room_detail(ROOM_ID, MEMBER_ID).await.unwrap_err();
        assert!(matches!(err, RoomError::RoomNotFound));
    }

    #[tokio::test]
    async fn detail_treats_an_empty_room_as_an_error() {
        let mut membership_repo = MockMembershipRepository::new();
        membership_repo
            .expect_exists_by_room_and_user()
            .returning(|_, _| Ok(true));

        let mut room_repo = MockChatRoomRepository::new();
        room_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(ChatRoom::new(id, String::new()))));

        let mut chat_repo = MockChatRepository::new();
        chat_repo.expect_find_all_by_room().returning(|_| Ok(vec![]));

        let svc = service(room_repo, membership_repo, chat_repo);
        let err = svc.get_room_detail(ROOM_ID, MEMBER_ID).await.unwrap_err();
        assert!(matches!(err, RoomError::ChatNotFound));
    }
}
