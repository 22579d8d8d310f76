// src/services/super_admin_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::DashboardRepository,
    models::{
        auth::{Actor, Role},
        company::Company,
        dashboard::PlatformStats,
    },
    services::company_service::CompanyService,
};

#[derive(Clone)]
pub struct SuperAdminService {
    dashboard_repo: DashboardRepository,
    company_service: CompanyService,
}

impl SuperAdminService {
    pub fn new(dashboard_repo: DashboardRepository, company_service: CompanyService) -> Self {
        Self { dashboard_repo, company_service }
    }

    pub async fn stats(&self, actor: &Actor) -> Result<PlatformStats, AppError> {
        actor.authorize(&[Role::SuperAdmin])?;
        self.dashboard_repo.platform_stats().await
    }

    /// Aprovar ativa a empresa e libera o login dos usuários dela.
    pub async fn approve_company(&self, actor: &Actor, id: Uuid) -> Result<Company, AppError> {
        let company = self.company_service.review(actor, id, true).await?;
        tracing::info!(company_id = %id, "empresa aprovada");
        Ok(company)
    }

    pub async fn reject_company(&self, actor: &Actor, id: Uuid) -> Result<Company, AppError> {
        let company = self.company_service.review(actor, id, false).await?;
        tracing::info!(company_id = %id, "empresa rejeitada");
        Ok(company)
    }
}
