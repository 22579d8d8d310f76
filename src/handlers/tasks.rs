// src/handlers/tasks.rs

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
    models::task::{CreateTaskPayload, Task, TaskQuery, UpdateTaskPayload},
};

// GET /api/tasks
#[utoipa::path(
    get,
    path = "/api/tasks",
    tag = "Tasks",
    params(TaskQuery),
    responses((status = 200, body = Vec<Task>), (status = 403)),
    security(("api_jwt" = []))
)]
pub async fn list_tasks(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<TaskQuery>,
) -> Result<Json<Vec<Task>>, AppError> {
    let tasks = app_state.task_service.list(&user.actor(), &query).await?;
    Ok(Json(tasks))
}

// GET /api/tasks/my-tasks
#[utoipa::path(
    get,
    path = "/api/tasks/my-tasks",
    tag = "Tasks",
    responses((status = 200, description = "Tarefas atribuídas ao usuário", body = Vec<Task>)),
    security(("api_jwt" = []))
)]
pub async fn my_tasks(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Task>>, AppError> {
    let tasks = app_state.task_service.my_tasks(&user.actor()).await?;
    Ok(Json(tasks))
}

// POST /api/tasks
#[utoipa::path(
    post,
    path = "/api/tasks",
    tag = "Tasks",
    request_body = CreateTaskPayload,
    responses((status = 201, body = Task), (status = 400), (status = 403)),
    security(("api_jwt" = []))
)]
pub async fn create_task(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateTaskPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let task = app_state.task_service.create(&user.actor(), &payload).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

// PATCH /api/tasks/{id}
#[utoipa::path(
    patch,
    path = "/api/tasks/{id}",
    tag = "Tasks",
    params(("id" = Uuid, Path, description = "ID da tarefa")),
    request_body = UpdateTaskPayload,
    responses(
        (status = 200, body = Task),
        (status = 400, description = "Invalid Completion OTP"),
        (status = 403),
        (status = 404)
    ),
    security(("api_jwt" = []))
)]
pub async fn update_task(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTaskPayload>,
) -> Result<Json<Task>, AppError> {
    payload.validate()?;
    let task = app_state.task_service.update(&user.actor(), id, &payload).await?;
    Ok(Json(task))
}

// DELETE /api/tasks/{id}
#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    tag = "Tasks",
    params(("id" = Uuid, Path, description = "ID da tarefa")),
    responses((status = 204), (status = 403), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn delete_task(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.task_service.delete(&user.actor(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
