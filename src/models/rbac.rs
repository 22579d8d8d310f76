// src/models/rbac.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::auth::Role;

/// Curinga que libera qualquer permissão.
pub const WILDCARD: &str = "ALL";

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RolePermission {
    /// `None` na tabela da plataforma; preenchido quando a empresa sobrepõe o papel.
    pub company_id: Option<Uuid>,
    pub role: Role,
    #[schema(example = json!(["VIEW_PROJECTS", "CLOCK_IN"]))]
    pub permissions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RolePermission {
    pub fn grants(&self, permission: &str) -> bool {
        grants(&self.permissions, permission)
    }
}

pub fn grants<S: AsRef<str>>(permissions: &[S], permission: &str) -> bool {
    permissions
        .iter()
        .any(|p| p.as_ref() == WILDCARD || p.as_ref() == permission)
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRolePermissionsPayload {
    pub permissions: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MyPermissions {
    pub role: Role,
    pub permissions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_grants_everything() {
        assert!(grants(&["ALL"], "MANAGE_FINANCIALS"));
        assert!(grants(&["VIEW_PHOTOS", "ACCESS_CHAT"], "ACCESS_CHAT"));
        assert!(!grants(&["VIEW_PHOTOS"], "MANAGE_FINANCIALS"));
        assert!(!grants::<&str>(&[], "VIEW_PHOTOS"));
    }
}
