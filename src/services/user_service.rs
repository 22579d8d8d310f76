// src/services/user_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{UserRepository, user_repo::NewUser},
    models::{
        auth::{Actor, Role, User},
        user::{CreateUserPayload, UpdateUserPayload},
    },
    services::auth::hash_password,
};

#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
    pool: PgPool,
}

impl UserService {
    pub fn new(repo: UserRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn me(&self, actor: &Actor) -> Result<User, AppError> {
        self.repo
            .find_by_id(actor.id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))
    }

    pub async fn list(&self, actor: &Actor, role: Option<Role>) -> Result<Vec<User>, AppError> {
        self.repo.list(actor.tenant_scope(), role).await
    }

    /// Listagem global do console do SUPER_ADMIN.
    pub async fn list_all(&self, actor: &Actor) -> Result<Vec<User>, AppError> {
        actor.authorize(&[Role::SuperAdmin])?;
        self.repo.list(None, None).await
    }

    pub async fn create(&self, actor: &Actor, payload: &CreateUserPayload) -> Result<User, AppError> {
        actor.authorize(&[Role::CompanyOwner, Role::SuperAdmin])?;

        let company_id = match payload.company_id {
            Some(company_id) if actor.is_super_admin() => company_id,
            _ => actor.company_id,
        };
        if payload.role == Role::SuperAdmin && !actor.is_super_admin() {
            return Err(AppError::forbidden("Only a super admin can create super admins"));
        }

        let hashed_password = hash_password(&payload.password).await?;
        let user = self
            .repo
            .create_user(
                &self.pool,
                NewUser {
                    company_id,
                    full_name: &payload.full_name,
                    email: &payload.email,
                    password_hash: &hashed_password,
                    role: payload.role,
                    phone: payload.phone.as_deref(),
                    hourly_rate: payload.hourly_rate,
                    is_active: true,
                },
            )
            .await?;

        tracing::info!(user_id = %user.id, role = %user.role, by = %actor.id, "usuário criado");
        Ok(user)
    }

    /// Dono/SUPER_ADMIN editam qualquer membro; os demais só o próprio nome e telefone.
    pub async fn update(&self, actor: &Actor, id: Uuid, payload: &UpdateUserPayload) -> Result<User, AppError> {
        let target = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;
        actor.ensure_tenant(target.company_id, "user")?;

        let is_manager = actor.ensure_owner_of(target.company_id).is_ok();
        if !is_manager {
            let touches_privileged = payload.role.is_some() || payload.is_active.is_some() || payload.hourly_rate.is_some();
            if target.id != actor.id || touches_privileged {
                return Err(AppError::forbidden("Not authorized to update this user"));
            }
        }
        if payload.role == Some(Role::SuperAdmin) && !actor.is_super_admin() {
            return Err(AppError::forbidden("Only a super admin can create super admins"));
        }

        self.repo
            .update(id, payload)
            .await?
            .ok_or_else(|| AppError::not_found("User"))
    }

    pub async fn delete(&self, actor: &Actor, id: Uuid) -> Result<(), AppError> {
        if id == actor.id {
            return Err(AppError::bad_request("You cannot delete your own account"));
        }
        let target = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;
        actor.ensure_owner_of(target.company_id)?;

        self.repo.delete(id).await?;
        tracing::info!(user_id = %id, by = %actor.id, "usuário removido");
        Ok(())
    }
}
