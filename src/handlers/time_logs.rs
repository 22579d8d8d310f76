// src/handlers/time_logs.rs

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
    middleware::auth::AuthenticatedUser,
    models::time_log::{ClockInPayload, ClockOutPayload, TimeLog, TimeLogQuery, UpdateTimeLogPayload},
};

// POST /api/timelogs/clock-in
#[utoipa::path(
    post,
    path = "/api/timelogs/clock-in",
    tag = "Time Logs",
    request_body = ClockInPayload,
    responses(
        (status = 201, description = "Ponto aberto com status da cerca virtual", body = TimeLog),
        (status = 400, description = "User already clocked in"),
        (status = 403, description = "Bater ponto de outro exige CLOCK_IN_CREW")
    ),
    security(("api_jwt" = []))
)]
pub async fn clock_in(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<ClockInPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let log = app_state.time_log_service.clock_in(&user.actor(), &payload).await?;
    Ok((StatusCode::CREATED, Json(log)))
}

// POST /api/timelogs/clock-out
#[utoipa::path(
    post,
    path = "/api/timelogs/clock-out",
    tag = "Time Logs",
    request_body = ClockOutPayload,
    responses(
        (status = 200, body = TimeLog),
        (status = 400, description = "User not clocked in")
    ),
    security(("api_jwt" = []))
)]
pub async fn clock_out(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<ClockOutPayload>,
) -> Result<Json<TimeLog>, AppError> {
    payload.validate()?;
    let log = app_state.time_log_service.clock_out(&user.actor(), &payload).await?;
    Ok(Json(log))
}

// GET /api/timelogs
#[utoipa::path(
    get,
    path = "/api/timelogs",
    tag = "Time Logs",
    params(TimeLogQuery),
    responses((status = 200, body = Vec<TimeLog>)),
    security(("api_jwt" = []))
)]
pub async fn list_time_logs(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<TimeLogQuery>,
) -> Result<Json<Vec<TimeLog>>, AppError> {
    let logs = app_state.time_log_service.list(&user.actor(), &query).await?;
    Ok(Json(logs))
}

// PATCH /api/timelogs/{id}
#[utoipa::path(
    patch,
    path = "/api/timelogs/{id}",
    tag = "Time Logs",
    params(("id" = Uuid, Path, description = "ID do registro de ponto")),
    request_body = UpdateTimeLogPayload,
    responses(
        (status = 200, body = TimeLog),
        (status = 403, description = "Só COMPANY_OWNER ou PM"),
        (status = 404, description = "TimeLog not found")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_time_log(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTimeLogPayload>,
) -> Result<Json<TimeLog>, AppError> {
    let log = app_state.time_log_service.update(&user.actor(), id, &payload).await?;
    Ok(Json(log))
}
