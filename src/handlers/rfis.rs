// src/handlers/rfis.rs

use axum::{
    Json,
    extract::{Path, Query, State},
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
        rbac::{PermManageRfi, PermViewRfi, RequirePermission},
    },
    models::rfi::{CreateRfiPayload, Rfi, RfiCommentPayload, RfiQuery, RfiStats, UpdateRfiPayload},
};

// GET /api/rfis/stats
#[utoipa::path(
    get,
    path = "/api/rfis/stats",
    tag = "RFIs",
    responses((status = 200, body = RfiStats), (status = 403)),
    security(("api_jwt" = []))
)]
pub async fn rfi_stats(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermViewRfi>,
) -> Result<Json<RfiStats>, AppError> {
    let stats = app_state.rfi_service.stats(&user.actor()).await?;
    Ok(Json(stats))
}

// GET /api/rfis
#[utoipa::path(
    get,
    path = "/api/rfis",
    tag = "RFIs",
    params(RfiQuery),
    responses(
        (status = 200, body = Vec<Rfi>),
        (status = 403, description = "Sem VIEW_RFI ou obra fora do alcance")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_rfis(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermViewRfi>,
    Query(query): Query<RfiQuery>,
) -> Result<Json<Vec<Rfi>>, AppError> {
    let rfis = app_state.rfi_service.list(&user.actor(), &query).await?;
    Ok(Json(rfis))
}

// GET /api/rfis/{id}
#[utoipa::path(
    get,
    path = "/api/rfis/{id}",
    tag = "RFIs",
    params(("id" = Uuid, Path, description = "ID da RFI")),
    responses((status = 200, body = Rfi), (status = 403), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn get_rfi(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermViewRfi>,
    Path(id): Path<Uuid>,
) -> Result<Json<Rfi>, AppError> {
    let rfi = app_state.rfi_service.get(&user.actor(), id).await?;
    Ok(Json(rfi))
}

// POST /api/rfis
#[utoipa::path(
    post,
    path = "/api/rfis",
    tag = "RFIs",
    request_body = CreateRfiPayload,
    responses((status = 201, body = Rfi), (status = 400), (status = 403)),
    security(("api_jwt" = []))
)]
pub async fn create_rfi(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermViewRfi>,
    Json(payload): Json<CreateRfiPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let rfi = app_state.rfi_service.create(&user.actor(), &payload).await?;
    Ok((StatusCode::CREATED, Json(rfi)))
}

// PATCH /api/rfis/{id}
#[utoipa::path(
    patch,
    path = "/api/rfis/{id}",
    tag = "RFIs",
    params(("id" = Uuid, Path, description = "ID da RFI")),
    request_body = UpdateRfiPayload,
    responses((status = 200, body = Rfi), (status = 400), (status = 403), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn update_rfi(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermManageRfi>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRfiPayload>,
) -> Result<Json<Rfi>, AppError> {
    payload.validate()?;
    let rfi = app_state.rfi_service.update(&user.actor(), id, &payload).await?;
    Ok(Json(rfi))
}

// POST /api/rfis/{id}/comments
#[utoipa::path(
    post,
    path = "/api/rfis/{id}/comments",
    tag = "RFIs",
    params(("id" = Uuid, Path, description = "ID da RFI")),
    request_body = RfiCommentPayload,
    responses((status = 200, body = Rfi), (status = 400), (status = 403), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn add_rfi_comment(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermViewRfi>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RfiCommentPayload>,
) -> Result<Json<Rfi>, AppError> {
    let rfi = app_state.rfi_service.add_comment(&user.actor(), id, &payload).await?;
    Ok(Json(rfi))
}

// DELETE /api/rfis/{id}
#[utoipa::path(
    delete,
    path = "/api/rfis/{id}",
    tag = "RFIs",
    params(("id" = Uuid, Path, description = "ID da RFI")),
    responses((status = 204), (status = 403), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn delete_rfi(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermViewRfi>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.rfi_service.delete(&user.actor(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
