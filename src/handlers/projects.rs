// src/handlers/projects.rs

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
    middleware::auth::AuthenticatedUser,
    models::{
        project::{AssignPmPayload, CreateProjectPayload, Project, UpdateProjectPayload},
        user::UserSummary,
    },
};

// GET /api/projects
#[utoipa::path(
    get,
    path = "/api/projects",
    tag = "Projects",
    responses((status = 200, description = "Obras visíveis para o usuário", body = Vec<Project>)),
    security(("api_jwt" = []))
)]
pub async fn list_projects(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Project>>, AppError> {
    let projects = app_state.project_service.list(&user.actor()).await?;
    Ok(Json(projects))
}

// GET /api/projects/{id}
#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    tag = "Projects",
    params(("id" = Uuid, Path, description = "ID da obra")),
    responses((status = 200, body = Project), (status = 403), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn get_project(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Project>, AppError> {
    let project = app_state.project_service.load_visible(&user.actor(), id).await?;
    Ok(Json(project))
}

// POST /api/projects
#[utoipa::path(
    post,
    path = "/api/projects",
    tag = "Projects",
    request_body = CreateProjectPayload,
    responses(
        (status = 201, body = Project),
        (status = 403, description = "Só COMPANY_OWNER, SUPER_ADMIN ou PM")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_project(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateProjectPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let project = app_state.project_service.create(&user.actor(), &payload).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

// PATCH /api/projects/{id}
#[utoipa::path(
    patch,
    path = "/api/projects/{id}",
    tag = "Projects",
    params(("id" = Uuid, Path, description = "ID da obra")),
    request_body = UpdateProjectPayload,
    responses((status = 200, body = Project), (status = 403), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn update_project(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProjectPayload>,
) -> Result<Json<Project>, AppError> {
    payload.validate()?;
    let project = app_state.project_service.update(&user.actor(), id, &payload).await?;
    Ok(Json(project))
}

// PATCH /api/projects/{id}/assign-pm
#[utoipa::path(
    patch,
    path = "/api/projects/{id}/assign-pm",
    tag = "Projects",
    params(("id" = Uuid, Path, description = "ID da obra")),
    request_body = AssignPmPayload,
    responses(
        (status = 200, body = Project),
        (status = 400, description = "Usuário não é PM desta empresa"),
        (status = 403)
    ),
    security(("api_jwt" = []))
)]
pub async fn assign_pm(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignPmPayload>,
) -> Result<Json<Project>, AppError> {
    let project = app_state.project_service.assign_pm(&user.actor(), id, &payload).await?;
    Ok(Json(project))
}

// DELETE /api/projects/{id}
#[utoipa::path(
    delete,
    path = "/api/projects/{id}",
    tag = "Projects",
    params(("id" = Uuid, Path, description = "ID da obra")),
    responses((status = 204), (status = 403), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn delete_project(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.project_service.delete(&user.actor(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/projects/{id}/members
#[utoipa::path(
    get,
    path = "/api/projects/{id}/members",
    tag = "Projects",
    params(("id" = Uuid, Path, description = "ID da obra")),
    responses((status = 200, description = "Equipe da obra, sem clientes", body = Vec<UserSummary>)),
    security(("api_jwt" = []))
)]
pub async fn project_members(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    let members = app_state.project_service.members(&user.actor(), id).await?;
    Ok(Json(members))
}
