// src/services/company_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CompanyRepository, UserRepository},
    models::{
        auth::{Actor, Role},
        company::{Company, SubscriptionStatus, UpdateCompanyPayload},
    },
};

#[derive(Clone)]
pub struct CompanyService {
    repo: CompanyRepository,
    user_repo: UserRepository,
    pool: PgPool,
}

impl CompanyService {
    pub fn new(repo: CompanyRepository, user_repo: UserRepository, pool: PgPool) -> Self {
        Self { repo, user_repo, pool }
    }

    pub async fn list(&self, actor: &Actor) -> Result<Vec<Company>, AppError> {
        actor.authorize(&[Role::SuperAdmin])?;
        self.repo.list_all().await
    }

    pub async fn get(&self, actor: &Actor, id: Uuid) -> Result<Company, AppError> {
        let company = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Company"))?;
        actor.ensure_tenant(company.id, "company")?;
        Ok(company)
    }

    pub async fn update(&self, actor: &Actor, id: Uuid, payload: &UpdateCompanyPayload) -> Result<Company, AppError> {
        actor.ensure_owner_of(id)?;
        self.repo
            .update(id, payload)
            .await?
            .ok_or_else(|| AppError::not_found("Company"))
    }

    pub async fn delete(&self, actor: &Actor, id: Uuid) -> Result<(), AppError> {
        actor.ensure_owner_of(id)?;
        if !self.repo.delete(id).await? {
            return Err(AppError::not_found("Company"));
        }
        tracing::info!(company_id = %id, by = %actor.id, "empresa removida");
        Ok(())
    }

    /// Aprova ou rejeita um cadastro pendente, ativando ou não os usuários.
    pub async fn review(&self, actor: &Actor, id: Uuid, approve: bool) -> Result<Company, AppError> {
        actor.authorize(&[Role::SuperAdmin])?;
        let status = if approve {
            SubscriptionStatus::Active
        } else {
            SubscriptionStatus::Canceled
        };

        let mut tx = self.pool.begin().await?;
        let company = self
            .repo
            .set_status(&mut *tx, id, status)
            .await?
            .ok_or_else(|| AppError::not_found("Company"))?;
        self.user_repo.set_company_active(&mut *tx, id, approve).await?;
        tx.commit().await?;

        tracing::info!(company_id = %id, approve, "cadastro de empresa revisado");
        Ok(company)
    }
}
