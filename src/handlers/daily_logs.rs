// src/handlers/daily_logs.rs

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
        rbac::{PermManageDailyLogs, PermViewDailyLogs, RequirePermission},
    },
    models::daily_log::{CreateDailyLogPayload, DailyLog, DailyLogQuery},
};

// GET /api/dailylogs
#[utoipa::path(
    get,
    path = "/api/dailylogs",
    tag = "Daily Logs",
    params(DailyLogQuery),
    responses(
        (status = 200, body = Vec<DailyLog>),
        (status = 403, description = "Sem VIEW_DAILY_LOGS ou obra fora do alcance")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_daily_logs(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermViewDailyLogs>,
    Query(query): Query<DailyLogQuery>,
) -> Result<Json<Vec<DailyLog>>, AppError> {
    let logs = app_state.daily_log_service.list(&user.actor(), &query).await?;
    Ok(Json(logs))
}

// POST /api/dailylogs
#[utoipa::path(
    post,
    path = "/api/dailylogs",
    tag = "Daily Logs",
    request_body = CreateDailyLogPayload,
    responses((status = 201, body = DailyLog), (status = 400), (status = 403)),
    security(("api_jwt" = []))
)]
pub async fn create_daily_log(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermManageDailyLogs>,
    Json(payload): Json<CreateDailyLogPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let log = app_state.daily_log_service.create(&user.actor(), &payload).await?;
    Ok((StatusCode::CREATED, Json(log)))
}

// POST /api/dailylogs/{id}/verify
#[utoipa::path(
    post,
    path = "/api/dailylogs/{id}/verify",
    tag = "Daily Logs",
    params(("id" = Uuid, Path, description = "ID do diário")),
    responses((status = 200, body = DailyLog), (status = 403), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn verify_daily_log(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermManageDailyLogs>,
    Path(id): Path<Uuid>,
) -> Result<Json<DailyLog>, AppError> {
    let log = app_state.daily_log_service.verify(&user.actor(), id).await?;
    Ok(Json(log))
}

// DELETE /api/dailylogs/{id}
#[utoipa::path(
    delete,
    path = "/api/dailylogs/{id}",
    tag = "Daily Logs",
    params(("id" = Uuid, Path, description = "ID do diário")),
    responses((status = 204), (status = 403), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn delete_daily_log(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermManageDailyLogs>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.daily_log_service.delete(&user.actor(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
