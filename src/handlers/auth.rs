// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{
        AuthResponse, LoginUserPayload, RegisterCompanyPayload, RegistrationResponse, UpdatePasswordPayload, User,
    },
};

// POST /api/auth/register-company
#[utoipa::path(
    post,
    path = "/api/auth/register-company",
    tag = "Auth",
    request_body = RegisterCompanyPayload,
    responses(
        (status = 201, description = "Empresa cadastrada, aguardando aprovação", body = RegistrationResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "E-mail ou empresa já cadastrados")
    )
)]
pub async fn register_company(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterCompanyPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let registration = app_state.auth_service.register_company(&payload).await?;
    Ok((StatusCode::CREATED, Json(registration)))
}

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Login realizado", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas, usuário inativo ou plano expirado")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginUserPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate()?;
    let response = app_state.auth_service.login(&payload).await?;
    Ok(Json(response))
}

// GET /api/users/me
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Perfil do usuário logado", body = User),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<User>, AppError> {
    let me = app_state.user_service.me(&user.actor()).await?;
    Ok(Json(me))
}

// PUT /api/users/me/password
#[utoipa::path(
    put,
    path = "/api/users/me/password",
    tag = "Auth",
    request_body = UpdatePasswordPayload,
    responses(
        (status = 200, description = "Senha alterada"),
        (status = 401, description = "Senha atual incorreta")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_password(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<UpdatePasswordPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    app_state.auth_service.update_password(user.id, &payload).await?;
    Ok(Json(json!({ "message": "Password updated successfully" })))
}
