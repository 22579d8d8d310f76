// src/handlers/chat.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{PermViewChat, RequirePermission},
    },
    models::chat::{ChatMessage, ChatRoom, SendMessagePayload},
};

// GET /api/chat/rooms
#[utoipa::path(
    get,
    path = "/api/chat/rooms",
    tag = "Chat",
    responses((status = 200, description = "Sala geral, obras e contatos permitidos", body = Vec<ChatRoom>)),
    security(("api_jwt" = []))
)]
pub async fn list_rooms(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermViewChat>,
) -> Result<Json<Vec<ChatRoom>>, AppError> {
    let rooms = app_state.chat_service.rooms(&user.actor()).await?;
    Ok(Json(rooms))
}

// GET /api/chat/general
#[utoipa::path(
    get,
    path = "/api/chat/general",
    tag = "Chat",
    responses(
        (status = 200, body = Vec<ChatMessage>),
        (status = 403, description = "SUBCONTRACTOR não acessa a sala geral")
    ),
    security(("api_jwt" = []))
)]
pub async fn general_history(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermViewChat>,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    let messages = app_state.chat_service.general_history(&user.actor()).await?;
    Ok(Json(messages))
}

// GET /api/chat/project/{project_id}
#[utoipa::path(
    get,
    path = "/api/chat/project/{project_id}",
    tag = "Chat",
    params(("project_id" = Uuid, Path, description = "ID da obra")),
    responses((status = 200, body = Vec<ChatMessage>), (status = 403), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn project_history(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermViewChat>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    let messages = app_state.chat_service.project_history(&user.actor(), project_id).await?;
    Ok(Json(messages))
}

// GET /api/chat/private/{user_id}
#[utoipa::path(
    get,
    path = "/api/chat/private/{user_id}",
    tag = "Chat",
    params(("user_id" = Uuid, Path, description = "ID do outro usuário")),
    responses((status = 200, body = Vec<ChatMessage>), (status = 403), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn private_history(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermViewChat>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    let messages = app_state.chat_service.private_history(&user.actor(), user_id).await?;
    Ok(Json(messages))
}

// POST /api/chat
#[utoipa::path(
    post,
    path = "/api/chat",
    tag = "Chat",
    request_body = SendMessagePayload,
    responses(
        (status = 201, description = "Mensagem gravada e enviada em tempo real", body = ChatMessage),
        (status = 400, description = "Project ID or Receiver ID is required"),
        (status = 403)
    ),
    security(("api_jwt" = []))
)]
pub async fn send_message(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermViewChat>,
    Json(payload): Json<SendMessagePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let message = app_state.chat_service.send(&user.actor(), &payload).await?;
    Ok((StatusCode::CREATED, Json(message)))
}
