// src/handlers/photos.rs

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
        rbac::{PermViewPhotos, RequirePermission},
    },
    models::photo::{CreatePhotoPayload, Photo, PhotoQuery},
};

// GET /api/photos
#[utoipa::path(
    get,
    path = "/api/photos",
    tag = "Photos",
    params(PhotoQuery),
    responses(
        (status = 200, body = Vec<Photo>),
        (status = 403, description = "Sem VIEW_PHOTOS ou obra fora do alcance")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_photos(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermViewPhotos>,
    Query(query): Query<PhotoQuery>,
) -> Result<Json<Vec<Photo>>, AppError> {
    let photos = app_state.photo_service.list(&user.actor(), &query).await?;
    Ok(Json(photos))
}

// POST /api/photos
#[utoipa::path(
    post,
    path = "/api/photos",
    tag = "Photos",
    request_body = CreatePhotoPayload,
    responses((status = 201, body = Photo), (status = 400), (status = 403)),
    security(("api_jwt" = []))
)]
pub async fn create_photo(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermViewPhotos>,
    Json(payload): Json<CreatePhotoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let photo = app_state.photo_service.create(&user.actor(), &payload).await?;
    Ok((StatusCode::CREATED, Json(photo)))
}

// DELETE /api/photos/{id}
#[utoipa::path(
    delete,
    path = "/api/photos/{id}",
    tag = "Photos",
    params(("id" = Uuid, Path, description = "ID da foto")),
    responses((status = 204), (status = 403), (status = 404)),
    security(("api_jwt" = []))
)]
pub async fn delete_photo(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _perm: RequirePermission<PermViewPhotos>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.photo_service.delete(&user.actor(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
