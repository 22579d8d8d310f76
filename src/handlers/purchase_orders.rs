// src/handlers/purchase_orders.rs

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
    models::purchase_order::{
        CreatePurchaseOrderPayload, PurchaseOrder, PurchaseOrderAction, PurchaseOrderQuery,
        UpdatePurchaseOrderPayload,
    },
};

// POST /api/purchase-orders
#[utoipa::path(
    post,
    path = "/api/purchase-orders",
    tag = "Purchase Orders",
    request_body = CreatePurchaseOrderPayload,
    responses(
        (status = 201, description = "Pedido criado com número sequencial e totais", body = PurchaseOrder),
        (status = 400),
        (status = 403)
    ),
    security(("api_jwt" = []))
)]
pub async fn create_purchase_order(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreatePurchaseOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let po = app_state.purchase_order_service.create(&user.actor(), &payload).await?;
    Ok((StatusCode::CREATED, Json(po)))
}

// GET /api/purchase-orders
#[utoipa::path(
    get,
    path = "/api/purchase-orders",
    tag = "Purchase Orders",
    params(PurchaseOrderQuery),
    responses((status = 200, body = Vec<PurchaseOrder>)),
    security(("api_jwt" = []))
)]
pub async fn list_purchase_orders(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<PurchaseOrderQuery>,
) -> Result<Json<Vec<PurchaseOrder>>, AppError> {
    let pos = app_state.purchase_order_service.list(&user.actor(), &query).await?;
    Ok(Json(pos))
}

// GET /api/purchase-orders/{id}
#[utoipa::path(
    get,
    path = "/api/purchase-orders/{id}",
    tag = "Purchase Orders",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses((status = 200, body = PurchaseOrder), (status = 403), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn get_purchase_order(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PurchaseOrder>, AppError> {
    let po = app_state.purchase_order_service.get(&user.actor(), id).await?;
    Ok(Json(po))
}

// PUT /api/purchase-orders/{id}
#[utoipa::path(
    put,
    path = "/api/purchase-orders/{id}",
    tag = "Purchase Orders",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    request_body = UpdatePurchaseOrderPayload,
    responses(
        (status = 200, body = PurchaseOrder),
        (status = 400, description = "Only Draft POs can be edited"),
        (status = 403, description = "Only Admins can change status after submission")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_purchase_order(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePurchaseOrderPayload>,
) -> Result<Json<PurchaseOrder>, AppError> {
    payload.validate()?;
    let po = app_state.purchase_order_service.update(&user.actor(), id, &payload).await?;
    Ok(Json(po))
}

// PATCH /api/purchase-orders/{id}/{action}
#[utoipa::path(
    patch,
    path = "/api/purchase-orders/{id}/{action}",
    tag = "Purchase Orders",
    params(
        ("id" = Uuid, Path, description = "ID do pedido"),
        ("action" = PurchaseOrderAction, Path, description = "approve, send, deliver, close ou cancel")
    ),
    responses(
        (status = 200, body = PurchaseOrder),
        (status = 403, description = "Only Admin/PM can perform this action"),
        (status = 404)
    ),
    security(("api_jwt" = []))
)]
pub async fn transition_purchase_order(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path((id, action)): Path<(Uuid, PurchaseOrderAction)>,
) -> Result<Json<PurchaseOrder>, AppError> {
    let po = app_state
        .purchase_order_service
        .transition(&user.actor(), id, action)
        .await?;
    Ok(Json(po))
}

// DELETE /api/purchase-orders/{id}
#[utoipa::path(
    delete,
    path = "/api/purchase-orders/{id}",
    tag = "Purchase Orders",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses((status = 204), (status = 403, description = "Not authorized to delete this Purchase Order")),
    security(("api_jwt" = []))
)]
pub async fn delete_purchase_order(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.purchase_order_service.delete(&user.actor(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
