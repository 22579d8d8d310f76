// src/handlers/dashboard.rs

use axum::{Json, extract::State};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{PermViewDashboard, RequirePermission},
    },
    models::dashboard::DashboardStats,
};

// GET /api/dashboard/stats
#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Indicadores do que o usuário enxerga", body = DashboardStats),
        (status = 403, description = "Sem VIEW_DASHBOARD")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_stats(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermViewDashboard>,
) -> Result<Json<DashboardStats>, AppError> {
    let stats = app_state.dashboard_service.stats(&user.actor()).await?;
    Ok(Json(stats))
}
