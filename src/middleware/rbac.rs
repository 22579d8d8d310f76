// src/middleware/rbac.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    services::rbac_service,
};

/// O que é uma permissão exigida por uma rota
pub trait PermissionDef: Send + Sync + 'static {
    fn slug() -> &'static str;
}

/// Guardião: barra a rota se o papel do usuário não tiver a permissão.
/// SUPER_ADMIN e papéis com `ALL` sempre passam.
pub struct RequirePermission<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or(AppError::InvalidToken)?;

        let required_perm = T::slug();
        if !app_state
            .rbac_service
            .has_permission(&user.actor(), required_perm)
            .await
        {
            return Err(AppError::forbidden(format!(
                "Access denied. Missing permission: {required_perm}"
            )));
        }

        Ok(RequirePermission(PhantomData))
    }
}

// ---
// PERMISSÕES USADAS PELAS ROTAS
// ---

pub struct PermViewPhotos;
impl PermissionDef for PermViewPhotos {
    fn slug() -> &'static str { rbac_service::VIEW_PHOTOS }
}

pub struct PermViewChat;
impl PermissionDef for PermViewChat {
    fn slug() -> &'static str { rbac_service::VIEW_CHAT }
}

pub struct PermViewFinancials;
impl PermissionDef for PermViewFinancials {
    fn slug() -> &'static str { rbac_service::VIEW_FINANCIALS }
}

pub struct PermManageFinancials;
impl PermissionDef for PermManageFinancials {
    fn slug() -> &'static str { rbac_service::MANAGE_FINANCIALS }
}

pub struct PermViewDashboard;
impl PermissionDef for PermViewDashboard {
    fn slug() -> &'static str { rbac_service::VIEW_DASHBOARD }
}

pub struct PermViewInvoices;
impl PermissionDef for PermViewInvoices {
    fn slug() -> &'static str { rbac_service::VIEW_INVOICES }
}

pub struct PermViewDailyLogs;
impl PermissionDef for PermViewDailyLogs {
    fn slug() -> &'static str { rbac_service::VIEW_DAILY_LOGS }
}

pub struct PermManageDailyLogs;
impl PermissionDef for PermManageDailyLogs {
    fn slug() -> &'static str { rbac_service::MANAGE_DAILY_LOGS }
}

pub struct PermViewRfi;
impl PermissionDef for PermViewRfi {
    fn slug() -> &'static str { rbac_service::VIEW_RFI }
}

pub struct PermManageRfi;
impl PermissionDef for PermManageRfi {
    fn slug() -> &'static str { rbac_service::MANAGE_RFI }
}
