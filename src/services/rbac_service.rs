// src/services/rbac_service.rs

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::RbacRepository,
    models::{
        auth::{Actor, Role},
        rbac::{self, MyPermissions, RolePermission},
    },
    realtime::{Notifier, RealtimeEvent, Room},
};

// Permissões usadas pelas rotas
pub const VIEW_DASHBOARD: &str = "VIEW_DASHBOARD";
pub const VIEW_PHOTOS: &str = "VIEW_PHOTOS";
pub const VIEW_CHAT: &str = "VIEW_CHAT";
pub const CLOCK_IN_CREW: &str = "CLOCK_IN_CREW";
pub const VIEW_FINANCIALS: &str = "VIEW_FINANCIALS";
pub const MANAGE_FINANCIALS: &str = "MANAGE_FINANCIALS";
pub const VIEW_INVOICES: &str = "VIEW_INVOICES";
pub const VIEW_DAILY_LOGS: &str = "VIEW_DAILY_LOGS";
pub const MANAGE_DAILY_LOGS: &str = "MANAGE_DAILY_LOGS";
pub const VIEW_RFI: &str = "VIEW_RFI";
pub const MANAGE_RFI: &str = "MANAGE_RFI";

/// Tabela padrão gravada na primeira subida.
/// Os demais slugs (`VIEW_PROJECTS`, `ACCESS_CHAT`...) só orientam a navegação do app.
pub const DEFAULT_PERMISSIONS: &[(Role, &[&str])] = &[
    (Role::SuperAdmin, &["ALL"]),
    (
        Role::CompanyOwner,
        &[
            "VIEW_DASHBOARD", "VIEW_PROJECTS", "MANAGE_PROJECTS", "VIEW_TASKS", "MANAGE_TASKS", "VIEW_PHOTOS",
            "MANAGE_PHOTOS", "VIEW_DAILY_LOGS", "MANAGE_DAILY_LOGS", "VIEW_CHAT", "ACCESS_CHAT", "CLOCK_IN_OUT",
            "CLOCK_IN_CREW", "VIEW_FINANCIALS", "MANAGE_FINANCIALS", "VIEW_INVOICES", "VIEW_RFI", "MANAGE_RFI",
        ],
    ),
    (
        Role::Pm,
        &[
            "VIEW_DASHBOARD", "VIEW_PROJECTS", "MANAGE_PROJECTS", "VIEW_TASKS", "MANAGE_TASKS", "VIEW_PHOTOS",
            "MANAGE_PHOTOS", "VIEW_DAILY_LOGS", "MANAGE_DAILY_LOGS", "VIEW_CHAT", "ACCESS_CHAT", "CLOCK_IN_OUT",
            "CLOCK_IN_CREW", "VIEW_FINANCIALS", "VIEW_INVOICES", "VIEW_RFI", "MANAGE_RFI",
        ],
    ),
    (
        Role::Foreman,
        &[
            "VIEW_DASHBOARD", "VIEW_PROJECTS", "VIEW_TASKS", "MANAGE_TASKS", "CLOCK_IN_OUT", "VIEW_PHOTOS",
            "VIEW_DAILY_LOGS", "MANAGE_DAILY_LOGS", "VIEW_CHAT", "ACCESS_CHAT", "CLOCK_IN_CREW", "VIEW_RFI",
        ],
    ),
    (
        Role::Worker,
        &["VIEW_DASHBOARD", "VIEW_MY_TASKS", "CLOCK_IN_OUT", "VIEW_PHOTOS", "VIEW_CHAT", "ACCESS_CHAT"],
    ),
    (
        Role::Engineer,
        &["VIEW_DASHBOARD", "VIEW_PROJECTS", "VIEW_PHOTOS", "VIEW_CHAT", "ACCESS_CHAT", "VIEW_RFI"],
    ),
    (
        Role::Client,
        &["VIEW_DASHBOARD", "VIEW_PROJECTS", "VIEW_PHOTOS", "VIEW_CHAT", "VIEW_INVOICES", "VIEW_DAILY_LOGS"],
    ),
    (
        Role::Subcontractor,
        &[
            "VIEW_DASHBOARD", "VIEW_PROJECTS", "VIEW_MY_TASKS", "CLOCK_IN_OUT", "VIEW_PHOTOS", "VIEW_DAILY_LOGS",
            "VIEW_CHAT", "ACCESS_CHAT", "VIEW_RFI",
        ],
    ),
];

pub fn default_permissions(role: Role) -> Vec<String> {
    DEFAULT_PERMISSIONS
        .iter()
        .find(|(r, _)| *r == role)
        .map(|(_, perms)| perms.iter().map(|p| p.to_string()).collect())
        .unwrap_or_default()
}

/// Escolhe a lista efetiva a partir da resposta do banco.
/// Linha ausente = nada liberado; banco fora do ar = tabela padrão.
fn effective_permissions(role: Role, stored: Result<Option<RolePermission>, sqlx::Error>) -> Vec<String> {
    match stored {
        Ok(Some(row)) => row.permissions,
        Ok(None) => Vec::new(),
        Err(e) => {
            tracing::warn!(%role, error = %e, "falha ao ler permissões; usando a tabela padrão");
            default_permissions(role)
        }
    }
}

#[derive(Clone)]
pub struct RbacService {
    repo: RbacRepository,
    notifier: Arc<dyn Notifier>,
}

impl RbacService {
    pub fn new(repo: RbacRepository, notifier: Arc<dyn Notifier>) -> Self {
        Self { repo, notifier }
    }

    pub async fn seed_defaults(&self) -> Result<u64, AppError> {
        let defaults: Vec<(Role, Vec<String>)> = Role::ALL
            .iter()
            .map(|role| (*role, default_permissions(*role)))
            .collect();
        self.repo.seed_missing(&defaults).await
    }

    pub async fn permissions_for(&self, actor: &Actor) -> Vec<String> {
        effective_permissions(actor.role, self.repo.find(actor.tenant_scope(), actor.role).await)
    }

    pub async fn has_permission(&self, actor: &Actor, permission: &str) -> bool {
        if actor.is_super_admin() {
            return true;
        }
        rbac::grants(&self.permissions_for(actor).await, permission)
    }

    pub async fn my_permissions(&self, actor: &Actor) -> MyPermissions {
        let permissions = if actor.is_super_admin() {
            vec![rbac::WILDCARD.to_string()]
        } else {
            self.permissions_for(actor).await
        };
        MyPermissions { role: actor.role, permissions }
    }

    pub async fn list(&self, actor: &Actor) -> Result<Vec<RolePermission>, AppError> {
        let scope = role_scope(actor)?;
        self.repo.list(scope).await
    }

    pub async fn update(&self, actor: &Actor, role: Role, permissions: Vec<String>) -> Result<RolePermission, AppError> {
        let scope = role_scope(actor)?;
        if role == Role::SuperAdmin && !actor.is_super_admin() {
            return Err(AppError::forbidden("Only a super admin can change super admin permissions"));
        }

        let row = self.repo.upsert(scope, role, &permissions).await?;
        tracing::info!(%role, company_id = ?scope, by = %actor.id, "permissões do papel atualizadas");
        self.notifier.emit(
            scope_room(scope),
            RealtimeEvent::PermissionsUpdated,
            json!({ "role": role, "permissions": row.permissions }),
        );
        Ok(row)
    }

    /// Dono remove a sobreposição da própria empresa; o papel volta à tabela da plataforma.
    pub async fn delete(&self, actor: &Actor, role: Role) -> Result<(), AppError> {
        let scope = role_scope(actor)?;
        if !self.repo.delete(scope, role).await? {
            return Err(AppError::not_found("Role"));
        }
        let permissions = self.repo.find(scope, role).await?.map(|row| row.permissions).unwrap_or_default();
        tracing::info!(%role, company_id = ?scope, by = %actor.id, "permissões do papel removidas");
        self.notifier.emit(
            scope_room(scope),
            RealtimeEvent::PermissionsUpdated,
            json!({ "role": role, "permissions": permissions }),
        );
        Ok(())
    }
}

/// Escopo das linhas que o usuário administra: a própria empresa para o dono,
/// a tabela da plataforma para o SUPER_ADMIN. Demais papéis: 403.
fn role_scope(actor: &Actor) -> Result<Option<Uuid>, AppError> {
    match actor.role {
        Role::SuperAdmin => Ok(None),
        Role::CompanyOwner => Ok(Some(actor.company_id)),
        _ => Err(AppError::forbidden("Only the company owner can manage role permissions")),
    }
}

fn scope_room(scope: Option<Uuid>) -> Room {
    match scope {
        Some(company_id) => Room::Company(company_id),
        None => Room::Everyone,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn every_role_has_a_default_entry() {
        for role in Role::ALL {
            assert!(!default_permissions(role).is_empty(), "{role} sem padrão");
        }
        assert_eq!(default_permissions(Role::SuperAdmin), vec!["ALL".to_string()]);
    }

    #[test]
    fn only_the_owner_manages_financials_by_default() {
        let can = |role| rbac::grants(&default_permissions(role), MANAGE_FINANCIALS);
        assert!(can(Role::CompanyOwner));
        assert!(can(Role::SuperAdmin));
        assert!(!can(Role::Pm));
        assert!(!can(Role::Worker));
    }

    #[test]
    fn stored_row_is_authoritative() {
        let now = Utc::now();
        let row = RolePermission {
            company_id: None,
            role: Role::Worker,
            permissions: vec!["VIEW_PHOTOS".into()],
            created_at: now,
            updated_at: now,
        };
        assert_eq!(effective_permissions(Role::Worker, Ok(Some(row))), vec!["VIEW_PHOTOS".to_string()]);
        // Linha removida: nenhuma permissão, sem voltar ao padrão
        assert!(effective_permissions(Role::Worker, Ok(None)).is_empty());
    }

    #[test]
    fn unreachable_store_falls_back_to_defaults() {
        let perms = effective_permissions(Role::Foreman, Err(sqlx::Error::PoolTimedOut));
        assert!(perms.contains(&CLOCK_IN_CREW.to_string()));
    }

    fn actor(role: Role) -> Actor {
        Actor { id: Uuid::new_v4(), role, company_id: Uuid::new_v4() }
    }

    #[test]
    fn owners_only_manage_their_own_company_rows() {
        let owner = actor(Role::CompanyOwner);
        assert_eq!(role_scope(&owner).unwrap(), Some(owner.company_id));
        assert_eq!(scope_room(Some(owner.company_id)), Room::Company(owner.company_id));
    }

    #[test]
    fn only_the_super_admin_touches_the_platform_table() {
        assert_eq!(role_scope(&actor(Role::SuperAdmin)).unwrap(), None);
        assert_eq!(scope_room(None), Room::Everyone);
        for role in [Role::Pm, Role::Foreman, Role::Worker, Role::Engineer, Role::Client, Role::Subcontractor] {
            let err = role_scope(&actor(role)).unwrap_err();
            assert!(matches!(err, AppError::Forbidden(_)), "{role} passou");
        }
    }
}
