//! Chat Room Handlers
//!
//! Thin boundary over the command/query services: parse ids, validate the
//! body, call one service method, let the error kind map to a status.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::application::dto::request::{
    CreateGroupRoomRequest, CreatePersonalRoomRequest, EditRoomRequest, MessagePageParams,
    RoomListParams,
};
use crate::application::dto::response::{
    ChatResponse, RoomCreateResponse, RoomDetailResponse, RoomEditResponse, RoomLeaveResponse,
    RoomSummaryResponse,
};
use crate::application::services::{
    ChatRoomCommandService, ChatRoomCommandServiceImpl, ChatRoomQueryService,
    ChatRoomQueryServiceImpl, CreateGroupRoomDto,
};
use crate::infrastructure::metrics;
use crate::infrastructure::repositories::{
    PgChatRepository, PgChatRoomRepository, PgMembershipRepository, PgUserRepository,
};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::shared::pagination::Slice;
use crate::shared::validation::validation_error;
use crate::startup::AppState;

fn command_service(
    state: &AppState,
) -> ChatRoomCommandServiceImpl<PgChatRoomRepository, PgMembershipRepository, PgUserRepository> {
    ChatRoomCommandServiceImpl::new(
        Arc::new(PgChatRoomRepository::new(state.db.clone())),
        Arc::new(PgMembershipRepository::new(state.db.clone())),
        Arc::new(PgUserRepository::new(state.db.clone())),
        state.snowflake.clone(),
    )
}

fn query_service(
    state: &AppState,
) -> ChatRoomQueryServiceImpl<PgChatRoomRepository, PgMembershipRepository, PgChatRepository> {
    ChatRoomQueryServiceImpl::new(
        Arc::new(PgChatRoomRepository::new(state.db.clone())),
        Arc::new(PgMembershipRepository::new(state.db.clone())),
        Arc::new(PgChatRepository::new(state.db.clone())),
    )
}

fn parse_id(raw: &str, what: &str) -> Result<i64, AppError> {
    crate::shared::snowflake::from_string(raw)
        .map_err(|_| AppError::BadRequest(format!("Invalid {what} ID")))
}

/// Create (or return the existing) personal room with a friend
pub async fn create_personal_room(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CreatePersonalRoomRequest>,
) -> Result<(StatusCode, Json<RoomCreateResponse>), AppError> {
    let friend_id = parse_id(&body.friend_id, "friend")?;

    let created = command_service(&state)
        .create_personal_room(auth.user_id, friend_id)
        .await?;

    if created.newly_created {
        metrics::ROOMS_CREATED_TOTAL.inc();
    }

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Create a group room
pub async fn create_group_room(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CreateGroupRoomRequest>,
) -> Result<(StatusCode, Json<RoomCreateResponse>), AppError> {
    body.validate().map_err(validation_error)?;

    let member_ids = body
        .member_ids
        .iter()
        .map(|raw| parse_id(raw, "member"))
        .collect::<Result<Vec<_>, _>>()?;

    let created = command_service(&state)
        .create_group_room(
            auth.user_id,
            CreateGroupRoomDto {
                title: body.title,
                member_ids,
            },
        )
        .await?;

    metrics::ROOMS_CREATED_TOTAL.inc();

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// List the caller's rooms, most recent activity first
pub async fn list_rooms(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<RoomListParams>,
) -> Result<Json<Slice<RoomSummaryResponse>>, AppError> {
    let cursor = params
        .cursor
        .as_deref()
        .map(|raw| parse_id(raw, "cursor"))
        .transpose()?;

    let slice = query_service(&state)
        .list_rooms(auth.user_id, cursor, params.limit)
        .await?;

    Ok(Json(slice.map(RoomSummaryResponse::from)))
}

/// Full room detail with complete message history
pub async fn get_room_detail(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailResponse>, AppError> {
    let room_id = parse_id(&room_id, "room")?;

    let detail = query_service(&state)
        .get_room_detail(room_id, auth.user_id)
        .await?;

    Ok(Json(detail.into()))
}

/// One page of a room's message history, newest first
pub async fn get_room_messages(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(room_id): Path<String>,
    Query(params): Query<MessagePageParams>,
) -> Result<Json<Slice<ChatResponse>>, AppError> {
    let room_id = parse_id(&room_id, "room")?;
    let before = params
        .before
        .as_deref()
        .map(|raw| parse_id(raw, "cursor"))
        .transpose()?;

    let slice = query_service(&state)
        .get_room_messages(room_id, auth.user_id, before, params.limit)
        .await?;

    Ok(Json(slice.map(ChatResponse::from)))
}

/// Edit a room's title
pub async fn edit_room(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(room_id): Path<String>,
    Json(body): Json<EditRoomRequest>,
) -> Result<Json<RoomEditResponse>, AppError> {
    let room_id = parse_id(&room_id, "room")?;
    body.validate().map_err(validation_error)?;

    let edited = command_service(&state)
        .edit_room(room_id, auth.user_id, &body.title)
        .await?;

    Ok(Json(edited.into()))
}

/// Leave a room; the last member's departure deletes it
pub async fn leave_room(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomLeaveResponse>, AppError> {
    let room_id = parse_id(&room_id, "room")?;

    let left = command_service(&state)
        .leave_room(room_id, auth.user_id)
        .await?;

    if left.room_deleted {
        metrics::ROOMS_DELETED_TOTAL.inc();
    }

    Ok(Json(left.into()))
}
