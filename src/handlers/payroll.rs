// src/handlers/payroll.rs

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{PermManageFinancials, PermViewFinancials, RequirePermission},
    },
    models::payroll::{Payroll, PayrollHistoryEntry, PayrollPeriodQuery, PayrollPreviewEntry, RunPayrollPayload},
};

// GET /api/payroll/preview
#[utoipa::path(
    get,
    path = "/api/payroll/preview",
    tag = "Payroll",
    params(PayrollPeriodQuery),
    responses(
        (status = 200, description = "Descontos calculados sobre as horas aprovadas", body = Vec<PayrollPreviewEntry>),
        (status = 400, description = "Período inválido"),
        (status = 403)
    ),
    security(("api_jwt" = []))
)]
pub async fn preview_payroll(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermViewFinancials>,
    Query(period): Query<PayrollPeriodQuery>,
) -> Result<Json<Vec<PayrollPreviewEntry>>, AppError> {
    let preview = app_state.payroll_service.preview(&user.actor(), &period).await?;
    Ok(Json(preview))
}

// POST /api/payroll/run
#[utoipa::path(
    post,
    path = "/api/payroll/run",
    tag = "Payroll",
    request_body = RunPayrollPayload,
    responses(
        (status = 201, description = "Folha gravada como paga", body = Vec<Payroll>),
        (status = 403)
    ),
    security(("api_jwt" = []))
)]
pub async fn run_payroll(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermManageFinancials>,
    Json(payload): Json<RunPayrollPayload>,
) -> Result<impl IntoResponse, AppError> {
    let saved = app_state.payroll_service.run(&user.actor(), &payload).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

// GET /api/payroll/history
#[utoipa::path(
    get,
    path = "/api/payroll/history",
    tag = "Payroll",
    responses((status = 200, body = Vec<PayrollHistoryEntry>), (status = 403)),
    security(("api_jwt" = []))
)]
pub async fn payroll_history(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermViewFinancials>,
) -> Result<Json<Vec<PayrollHistoryEntry>>, AppError> {
    let history = app_state.payroll_service.history(&user.actor()).await?;
    Ok(Json(history))
}
