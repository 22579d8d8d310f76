// src/services/daily_log_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::DailyLogRepository,
    models::{
        auth::{Actor, Role},
        daily_log::{CreateDailyLogPayload, DailyLog, DailyLogQuery},
    },
    services::project_service::ProjectService,
    visibility::{ResourceKind, VisibilityResolver},
};

const REPORTING_ROLES: [Role; 4] = [Role::SuperAdmin, Role::CompanyOwner, Role::Pm, Role::Foreman];
const REVIEWING_ROLES: [Role; 3] = [Role::SuperAdmin, Role::CompanyOwner, Role::Pm];

#[derive(Clone)]
pub struct DailyLogService {
    repo: DailyLogRepository,
    project_service: ProjectService,
    resolver: VisibilityResolver,
}

impl DailyLogService {
    pub fn new(repo: DailyLogRepository, project_service: ProjectService, resolver: VisibilityResolver) -> Self {
        Self { repo, project_service, resolver }
    }

    pub async fn list(&self, actor: &Actor, query: &DailyLogQuery) -> Result<Vec<DailyLog>, AppError> {
        let filter = self
            .resolver
            .resolve(actor, ResourceKind::DailyLog, query.project_id)
            .await?;
        self.repo.list(&filter, query.date).await
    }

    pub async fn create(&self, actor: &Actor, payload: &CreateDailyLogPayload) -> Result<DailyLog, AppError> {
        actor.authorize(&REPORTING_ROLES)?;
        let project_id = payload
            .project_id
            .ok_or_else(|| AppError::bad_request("Project ID is required"))?;
        let project = self.project_service.load_visible(actor, project_id).await?;

        let log = self.repo.create(project.company_id, project.id, actor.id, payload).await?;
        tracing::info!(
            daily_log_id = %log.id,
            project_id = %project.id,
            workers = log.total_workers(),
            "diário de obra registrado"
        );
        Ok(log)
    }

    pub async fn verify(&self, actor: &Actor, id: Uuid) -> Result<DailyLog, AppError> {
        actor.authorize(&REVIEWING_ROLES)?;
        let log = self.load(actor, id).await?;
        if !self.resolver.can_see(actor, ResourceKind::DailyLog, &log).await? {
            return Err(AppError::forbidden("Not authorized to access this daily log"));
        }
        self.repo
            .verify(id, actor.id)
            .await?
            .ok_or_else(|| AppError::not_found("Daily log"))
    }

    pub async fn delete(&self, actor: &Actor, id: Uuid) -> Result<(), AppError> {
        actor.authorize(&REVIEWING_ROLES)?;
        self.load(actor, id).await?;
        self.repo.delete(id).await?;
        tracing::info!(daily_log_id = %id, by = %actor.id, "diário de obra removido");
        Ok(())
    }

    async fn load(&self, actor: &Actor, id: Uuid) -> Result<DailyLog, AppError> {
        let log = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Daily log"))?;
        actor.ensure_tenant(log.company_id, "daily log")?;
        Ok(log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Role) -> Actor {
        Actor { id: Uuid::new_v4(), role, company_id: Uuid::new_v4() }
    }

    #[test]
    fn foremen_report_but_do_not_verify() {
        let foreman = actor(Role::Foreman);
        assert!(foreman.authorize(&REPORTING_ROLES).is_ok());
        assert!(foreman.authorize(&REVIEWING_ROLES).is_err());
    }

    #[test]
    fn workers_and_clients_only_read() {
        for role in [Role::Worker, Role::Client, Role::Engineer, Role::Subcontractor] {
            let a = actor(role);
            assert!(a.authorize(&REPORTING_ROLES).is_err(), "{role}");
            assert!(a.authorize(&REVIEWING_ROLES).is_err(), "{role}");
        }
    }
}
