// src/handlers/invoices.rs

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
        rbac::{PermViewInvoices, RequirePermission},
    },
    models::invoice::{CreateInvoicePayload, Invoice, InvoiceQuery, UpdateInvoicePayload},
};

// GET /api/invoices
#[utoipa::path(
    get,
    path = "/api/invoices",
    tag = "Invoices",
    params(InvoiceQuery),
    responses(
        (status = 200, body = Vec<Invoice>),
        (status = 403, description = "Sem VIEW_INVOICES ou obra fora do alcance")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_invoices(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermViewInvoices>,
    Query(query): Query<InvoiceQuery>,
) -> Result<Json<Vec<Invoice>>, AppError> {
    let invoices = app_state.invoice_service.list(&user.actor(), &query).await?;
    Ok(Json(invoices))
}

// GET /api/invoices/{id}
#[utoipa::path(
    get,
    path = "/api/invoices/{id}",
    tag = "Invoices",
    params(("id" = Uuid, Path, description = "ID da fatura")),
    responses((status = 200, body = Invoice), (status = 403), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn get_invoice(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermViewInvoices>,
    Path(id): Path<Uuid>,
) -> Result<Json<Invoice>, AppError> {
    let invoice = app_state.invoice_service.get(&user.actor(), id).await?;
    Ok(Json(invoice))
}

// POST /api/invoices
#[utoipa::path(
    post,
    path = "/api/invoices",
    tag = "Invoices",
    request_body = CreateInvoicePayload,
    responses(
        (status = 201, body = Invoice),
        (status = 400),
        (status = 403),
        (status = 409, description = "Número de fatura repetido na empresa")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_invoice(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermViewInvoices>,
    Json(payload): Json<CreateInvoicePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let invoice = app_state.invoice_service.create(&user.actor(), &payload).await?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

// PATCH /api/invoices/{id}
#[utoipa::path(
    patch,
    path = "/api/invoices/{id}",
    tag = "Invoices",
    params(("id" = Uuid, Path, description = "ID da fatura")),
    request_body = UpdateInvoicePayload,
    responses((status = 200, body = Invoice), (status = 400), (status = 403), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn update_invoice(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermViewInvoices>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateInvoicePayload>,
) -> Result<Json<Invoice>, AppError> {
    payload.validate()?;
    let invoice = app_state.invoice_service.update(&user.actor(), id, &payload).await?;
    Ok(Json(invoice))
}
