// src/models/auth.rs

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;

// Papéis fixos do sistema. Governam tanto a autorização das rotas
// quanto a visibilidade linha a linha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    CompanyOwner,
    Pm,
    Foreman,
    Worker,
    Engineer,
    Client,
    Subcontractor,
}

impl Role {
    pub const ALL: [Role; 8] = [
        Role::SuperAdmin,
        Role::CompanyOwner,
        Role::Pm,
        Role::Foreman,
        Role::Worker,
        Role::Engineer,
        Role::Client,
        Role::Subcontractor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SUPER_ADMIN",
            Role::CompanyOwner => "COMPANY_OWNER",
            Role::Pm => "PM",
            Role::Foreman => "FOREMAN",
            Role::Worker => "WORKER",
            Role::Engineer => "ENGINEER",
            Role::Client => "CLIENT",
            Role::Subcontractor => "SUBCONTRACTOR",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub company_id: Uuid,
    #[schema(example = "Maria Souza")]
    pub full_name: String,
    #[schema(example = "maria@obra.com")]
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    pub role: Role,
    pub phone: Option<String>,
    #[schema(example = "32.50")]
    pub hourly_rate: Option<Decimal>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn actor(&self) -> Actor {
        Actor {
            id: self.id,
            role: self.role,
            company_id: self.company_id,
        }
    }
}

/// Identidade de quem chama. Imutável durante a requisição.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
    pub company_id: Uuid,
}

impl Actor {
    pub fn is_super_admin(&self) -> bool {
        self.role == Role::SuperAdmin
    }

    /// Tenant usado no filtro. `None` para o SUPER_ADMIN, que enxerga todos.
    pub fn tenant_scope(&self) -> Option<Uuid> {
        if self.is_super_admin() {
            None
        } else {
            Some(self.company_id)
        }
    }

    pub fn owns_tenant(&self, company_id: Uuid) -> bool {
        self.is_super_admin() || self.company_id == company_id
    }

    /// Re-checagem antes de qualquer escrita: o recurso precisa ser do mesmo tenant.
    pub fn ensure_tenant(&self, company_id: Uuid, resource: &str) -> Result<(), AppError> {
        if self.owns_tenant(company_id) {
            Ok(())
        } else {
            Err(AppError::forbidden(format!("Not authorized to access this {}", resource)))
        }
    }

    /// Equivalente ao `authorize(...roles)` das rotas.
    pub fn authorize(&self, roles: &[Role]) -> Result<(), AppError> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            Err(AppError::forbidden(format!(
                "User role {} is not authorized to access this route",
                self.role
            )))
        }
    }

    /// Exclusão de cargos, empresas e usuários: dono do próprio tenant ou SUPER_ADMIN.
    pub fn ensure_owner_of(&self, company_id: Uuid) -> Result<(), AppError> {
        match self.role {
            Role::SuperAdmin => Ok(()),
            Role::CompanyOwner if self.company_id == company_id => Ok(()),
            _ => Err(AppError::forbidden("Only the company owner can perform this action")),
        }
    }
}

// Dados para cadastro de empresa + dono
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterCompanyPayload {
    #[validate(length(min = 2, message = "Company name must have at least 2 characters."))]
    #[schema(example = "Construtora Horizonte")]
    pub company_name: String,
    #[validate(length(min = 2, message = "Full name is required."))]
    pub full_name: String,
    #[validate(email(message = "Invalid e-mail address."))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must have at least 6 characters."))]
    pub password: String,
    pub phone: Option<String>,
    #[schema(example = "starter")]
    pub plan: Option<String>,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(email(message = "Invalid e-mail address."))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must have at least 6 characters."))]
    pub password: String,
}

// Troca de senha do próprio usuário
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordPayload {
    pub current_password: String,
    #[validate(length(min = 6, message = "Password must have at least 6 characters."))]
    pub new_password: String,
}

// Cadastro aceito; o dono só entra depois da aprovação
#[derive(Debug, Serialize, ToSchema)]
pub struct RegistrationResponse {
    pub message: String,
    pub user: User,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub role: Role,
    pub company_id: Uuid,
    pub exp: usize, // Expiration time
    pub iat: usize, // Issued At
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Role) -> Actor {
        Actor { id: Uuid::new_v4(), role, company_id: Uuid::new_v4() }
    }

    #[test]
    fn role_wire_names_are_screaming_snake_case() {
        assert_eq!(serde_json::to_string(&Role::CompanyOwner).unwrap(), "\"COMPANY_OWNER\"");
        assert_eq!(serde_json::to_string(&Role::Pm).unwrap(), "\"PM\"");
        let parsed: Role = serde_json::from_str("\"SUBCONTRACTOR\"").unwrap();
        assert_eq!(parsed, Role::Subcontractor);
        for role in Role::ALL {
            assert_eq!(serde_json::to_string(&role).unwrap(), format!("\"{}\"", role.as_str()));
        }
    }

    #[test]
    fn super_admin_has_no_tenant_scope() {
        let admin = actor(Role::SuperAdmin);
        assert_eq!(admin.tenant_scope(), None);
        assert!(admin.ensure_tenant(Uuid::new_v4(), "project").is_ok());

        let pm = actor(Role::Pm);
        assert_eq!(pm.tenant_scope(), Some(pm.company_id));
        assert!(pm.ensure_tenant(pm.company_id, "project").is_ok());
        assert!(matches!(
            pm.ensure_tenant(Uuid::new_v4(), "project"),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn only_owner_of_same_tenant_or_super_admin_may_delete() {
        let owner = actor(Role::CompanyOwner);
        assert!(owner.ensure_owner_of(owner.company_id).is_ok());
        assert!(owner.ensure_owner_of(Uuid::new_v4()).is_err());
        assert!(actor(Role::SuperAdmin).ensure_owner_of(Uuid::new_v4()).is_ok());

        let pm = actor(Role::Pm);
        assert!(pm.ensure_owner_of(pm.company_id).is_err());
    }

    #[test]
    fn authorize_lists_allowed_roles() {
        let worker = actor(Role::Worker);
        assert!(worker.authorize(&[Role::Worker, Role::Foreman]).is_ok());
        let err = worker.authorize(&[Role::CompanyOwner]).unwrap_err();
        assert_eq!(err.to_string(), "User role WORKER is not authorized to access this route");
    }
}
