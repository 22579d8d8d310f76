// src/handlers/jobs.rs

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
    models::job::{AssignForemanPayload, AssignWorkersPayload, CreateJobPayload, Job, JobQuery, UpdateJobPayload},
};

// GET /api/jobs
#[utoipa::path(
    get,
    path = "/api/jobs",
    tag = "Jobs",
    params(JobQuery),
    responses(
        (status = 200, description = "Frentes de serviço visíveis", body = Vec<Job>),
        (status = 403, description = "Obra fora do alcance do usuário")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_jobs(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<JobQuery>,
) -> Result<Json<Vec<Job>>, AppError> {
    let jobs = app_state.job_service.list(&user.actor(), query.project_id).await?;
    Ok(Json(jobs))
}

// GET /api/jobs/{id}
#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    tag = "Jobs",
    params(("id" = Uuid, Path, description = "ID da frente")),
    responses((status = 200, body = Job), (status = 403), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn get_job(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Job>, AppError> {
    let job = app_state.job_service.get(&user.actor(), id).await?;
    Ok(Json(job))
}

// POST /api/jobs
#[utoipa::path(
    post,
    path = "/api/jobs",
    tag = "Jobs",
    request_body = CreateJobPayload,
    responses(
        (status = 201, description = "Frente criada; progresso da obra recalculado", body = Job),
        (status = 400, description = "Project ID is required"),
        (status = 404, description = "Obra não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_job(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateJobPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let job = app_state.job_service.create(&user.actor(), &payload).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

// PATCH /api/jobs/{id}
#[utoipa::path(
    patch,
    path = "/api/jobs/{id}",
    tag = "Jobs",
    params(("id" = Uuid, Path, description = "ID da frente")),
    request_body = UpdateJobPayload,
    responses((status = 200, body = Job), (status = 403), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn update_job(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJobPayload>,
) -> Result<Json<Job>, AppError> {
    payload.validate()?;
    let job = app_state.job_service.update(&user.actor(), id, &payload).await?;
    Ok(Json(job))
}

// PATCH /api/jobs/{id}/assign-foreman
#[utoipa::path(
    patch,
    path = "/api/jobs/{id}/assign-foreman",
    tag = "Jobs",
    params(("id" = Uuid, Path, description = "ID da frente")),
    request_body = AssignForemanPayload,
    responses((status = 200, body = Job), (status = 400), (status = 403)),
    security(("api_jwt" = []))
)]
pub async fn assign_foreman(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignForemanPayload>,
) -> Result<Json<Job>, AppError> {
    let job = app_state.job_service.assign_foreman(&user.actor(), id, &payload).await?;
    Ok(Json(job))
}

// PATCH /api/jobs/{id}/assign-workers
#[utoipa::path(
    patch,
    path = "/api/jobs/{id}/assign-workers",
    tag = "Jobs",
    params(("id" = Uuid, Path, description = "ID da frente")),
    request_body = AssignWorkersPayload,
    responses((status = 200, body = Job), (status = 400), (status = 403)),
    security(("api_jwt" = []))
)]
pub async fn assign_workers(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignWorkersPayload>,
) -> Result<Json<Job>, AppError> {
    let job = app_state.job_service.assign_workers(&user.actor(), id, &payload).await?;
    Ok(Json(job))
}

// DELETE /api/jobs/{id}
#[utoipa::path(
    delete,
    path = "/api/jobs/{id}",
    tag = "Jobs",
    params(("id" = Uuid, Path, description = "ID da frente")),
    responses((status = 204), (status = 403), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn delete_job(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.job_service.delete(&user.actor(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
