// src/handlers/rbac.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        auth::Role,
        rbac::{MyPermissions, RolePermission, UpdateRolePermissionsPayload},
    },
};

// GET /api/roles
#[utoipa::path(
    get,
    path = "/api/roles",
    tag = "Roles",
    responses(
        (status = 200, description = "Permissões de cada papel", body = Vec<RolePermission>),
        (status = 403, description = "Só COMPANY_OWNER ou SUPER_ADMIN")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_roles(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<RolePermission>>, AppError> {
    let roles = app_state.rbac_service.list(&user.actor()).await?;
    Ok(Json(roles))
}

// GET /api/roles/my-permissions
#[utoipa::path(
    get,
    path = "/api/roles/my-permissions",
    tag = "Roles",
    responses((status = 200, body = MyPermissions)),
    security(("api_jwt" = []))
)]
pub async fn my_permissions(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Json<MyPermissions> {
    Json(app_state.rbac_service.my_permissions(&user.actor()).await)
}

// PUT /api/roles/{role}
#[utoipa::path(
    put,
    path = "/api/roles/{role}",
    tag = "Roles",
    params(("role" = Role, Path, description = "Papel, ex.: PM")),
    request_body = UpdateRolePermissionsPayload,
    responses(
        (status = 200, description = "Permissões gravadas e avisadas em tempo real", body = RolePermission),
        (status = 403)
    ),
    security(("api_jwt" = []))
)]
pub async fn update_role(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(role): Path<Role>,
    Json(payload): Json<UpdateRolePermissionsPayload>,
) -> Result<Json<RolePermission>, AppError> {
    let updated = app_state
        .rbac_service
        .update(&user.actor(), role, payload.permissions)
        .await?;
    Ok(Json(updated))
}

// DELETE /api/roles/{role}
#[utoipa::path(
    delete,
    path = "/api/roles/{role}",
    tag = "Roles",
    params(("role" = Role, Path, description = "Papel, ex.: PM")),
    responses((status = 204), (status = 403), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn delete_role(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(role): Path<Role>,
) -> Result<impl IntoResponse, AppError> {
    app_state.rbac_service.delete(&user.actor(), role).await?;
    Ok(StatusCode::NO_CONTENT)
}
