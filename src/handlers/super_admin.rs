// src/handlers/super_admin.rs

use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{auth::User, company::Company, dashboard::PlatformStats},
};

// GET /api/super-admin/stats
#[utoipa::path(
    get,
    path = "/api/super-admin/stats",
    tag = "Super Admin",
    responses((status = 200, body = PlatformStats), (status = 403)),
    security(("api_jwt" = []))
)]
pub async fn platform_stats(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<PlatformStats>, AppError> {
    let stats = app_state.super_admin_service.stats(&user.actor()).await?;
    Ok(Json(stats))
}

// GET /api/super-admin/users
#[utoipa::path(
    get,
    path = "/api/super-admin/users",
    tag = "Super Admin",
    responses((status = 200, body = Vec<User>), (status = 403)),
    security(("api_jwt" = []))
)]
pub async fn all_users(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<User>>, AppError> {
    let users = app_state.user_service.list_all(&user.actor()).await?;
    Ok(Json(users))
}

// PATCH /api/super-admin/companies/{id}/approve
#[utoipa::path(
    patch,
    path = "/api/super-admin/companies/{id}/approve",
    tag = "Super Admin",
    params(("id" = Uuid, Path, description = "ID da empresa")),
    responses((status = 200, description = "Empresa ativa e usuários liberados", body = Company), (status = 403), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn approve_company(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Company>, AppError> {
    let company = app_state.super_admin_service.approve_company(&user.actor(), id).await?;
    Ok(Json(company))
}

// PATCH /api/super-admin/companies/{id}/reject
#[utoipa::path(
    patch,
    path = "/api/super-admin/companies/{id}/reject",
    tag = "Super Admin",
    params(("id" = Uuid, Path, description = "ID da empresa")),
    responses((status = 200, body = Company), (status = 403), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn reject_company(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Company>, AppError> {
    let company = app_state.super_admin_service.reject_company(&user.actor(), id).await?;
    Ok(Json(company))
}
