// src/services/job_service.rs

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{JobRepository, ProjectRepository},
    models::{
        auth::{Actor, Role},
        job::{AssignForemanPayload, AssignWorkersPayload, CreateJobPayload, Job, UpdateJobPayload},
        project::ProjectProgress,
    },
    services::project_service::ProjectService,
    visibility::{ResourceKind, VisibilityResolver},
};

/// Operário só altera o status; qualquer outro campo é 403.
fn ensure_worker_edit(role: Role, payload: &UpdateJobPayload) -> Result<(), AppError> {
    if role == Role::Worker && !payload.is_status_only() {
        return Err(AppError::forbidden("Workers can only update the job status"));
    }
    Ok(())
}

#[derive(Clone)]
pub struct JobService {
    repo: JobRepository,
    project_repo: ProjectRepository,
    project_service: ProjectService,
    resolver: VisibilityResolver,
    pool: PgPool,
}

impl JobService {
    pub fn new(
        repo: JobRepository,
        project_repo: ProjectRepository,
        project_service: ProjectService,
        resolver: VisibilityResolver,
        pool: PgPool,
    ) -> Self {
        Self { repo, project_repo, project_service, resolver, pool }
    }

    pub async fn list(&self, actor: &Actor, project_id: Option<Uuid>) -> Result<Vec<Job>, AppError> {
        let filter = self.resolver.resolve(actor, ResourceKind::Job, project_id).await?;
        self.repo.list(&filter).await
    }

    pub async fn get(&self, actor: &Actor, id: Uuid) -> Result<Job, AppError> {
        let job = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Job"))?;
        actor.ensure_tenant(job.company_id, "job")?;
        if !self.resolver.can_see(actor, ResourceKind::Job, &job).await? {
            return Err(AppError::forbidden("Not authorized to access this job"));
        }
        Ok(job)
    }

    pub async fn create(&self, actor: &Actor, payload: &CreateJobPayload) -> Result<Job, AppError> {
        actor.authorize(&[Role::SuperAdmin, Role::CompanyOwner, Role::Pm])?;
        let project_id = payload
            .project_id
            .ok_or_else(|| AppError::bad_request("Project ID is required"))?;
        let project = self.project_service.load_visible(actor, project_id).await?;

        self.project_service
            .ensure_members(project.company_id, payload.foreman_id.as_slice(), "Foreman")
            .await?;
        self.project_service
            .ensure_members(project.company_id, &payload.assigned_workers, "Worker")
            .await?;

        let mut tx = self.pool.begin().await?;
        let job = self
            .repo
            .create(&mut *tx, project.company_id, project.id, actor.id, payload)
            .await?;
        self.recompute_progress(&mut tx, project.id).await?;
        tx.commit().await?;

        Ok(job)
    }

    /// Operários só podem mudar o status das frentes em que trabalham.
    pub async fn update(&self, actor: &Actor, id: Uuid, payload: &UpdateJobPayload) -> Result<Job, AppError> {
        actor.authorize(&[Role::SuperAdmin, Role::CompanyOwner, Role::Pm, Role::Foreman, Role::Worker])?;
        let job = self.get(actor, id).await?;

        ensure_worker_edit(actor.role, payload)?;

        self.project_service
            .ensure_members(job.company_id, payload.foreman_id.as_slice(), "Foreman")
            .await?;
        if let Some(workers) = &payload.assigned_workers {
            self.project_service
                .ensure_members(job.company_id, workers, "Worker")
                .await?;
        }

        self.apply_update(job, payload).await
    }

    pub async fn assign_foreman(&self, actor: &Actor, id: Uuid, payload: &AssignForemanPayload) -> Result<Job, AppError> {
        actor.authorize(&[Role::SuperAdmin, Role::CompanyOwner, Role::Pm])?;
        let job = self.get(actor, id).await?;
        self.project_service
            .ensure_members(job.company_id, &[payload.foreman_id], "Foreman")
            .await?;

        let update = UpdateJobPayload { foreman_id: Some(payload.foreman_id), ..Default::default() };
        self.apply_update(job, &update).await
    }

    pub async fn assign_workers(&self, actor: &Actor, id: Uuid, payload: &AssignWorkersPayload) -> Result<Job, AppError> {
        actor.authorize(&[Role::SuperAdmin, Role::CompanyOwner, Role::Pm, Role::Foreman])?;
        let job = self.get(actor, id).await?;
        self.project_service
            .ensure_members(job.company_id, &payload.worker_ids, "Worker")
            .await?;

        let update = UpdateJobPayload { assigned_workers: Some(payload.worker_ids.clone()), ..Default::default() };
        self.apply_update(job, &update).await
    }

    pub async fn delete(&self, actor: &Actor, id: Uuid) -> Result<(), AppError> {
        actor.authorize(&[Role::SuperAdmin, Role::CompanyOwner, Role::Pm])?;
        let job = self.get(actor, id).await?;

        let mut tx = self.pool.begin().await?;
        self.repo.delete(&mut *tx, job.id).await?;
        self.recompute_progress(&mut tx, job.project_id).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn apply_update(&self, job: Job, payload: &UpdateJobPayload) -> Result<Job, AppError> {
        let mut tx = self.pool.begin().await?;
        let updated = self
            .repo
            .update(&mut *tx, job.id, payload)
            .await?
            .ok_or_else(|| AppError::not_found("Job"))?;
        self.recompute_progress(&mut tx, job.project_id).await?;
        tx.commit().await?;
        Ok(updated)
    }

    // Progresso e status da obra refletem sempre o estado atual das frentes
    async fn recompute_progress(
        &self,
        conn: &mut PgConnection,
        project_id: Uuid,
    ) -> Result<ProjectProgress, AppError> {
        let statuses = self.repo.statuses_for_project(&mut *conn, project_id).await?;
        let progress = ProjectProgress::from_jobs(&statuses);
        self.project_repo.set_progress(&mut *conn, project_id, progress).await?;
        tracing::debug!(%project_id, progress = progress.progress, status = ?progress.status, "progresso da obra recalculado");
        Ok(progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::JobStatus;

    #[test]
    fn workers_may_only_move_the_status() {
        let status = UpdateJobPayload { status: Some(JobStatus::Completed), ..Default::default() };
        assert!(ensure_worker_edit(Role::Worker, &status).is_ok());

        let rename = UpdateJobPayload { name: Some("Fundação bloco B".into()), ..Default::default() };
        let err = ensure_worker_edit(Role::Worker, &rename).unwrap_err();
        assert_eq!(err.to_string(), "Workers can only update the job status");
    }

    #[test]
    fn other_roles_edit_any_field() {
        let rename = UpdateJobPayload { name: Some("Fundação bloco B".into()), ..Default::default() };
        for role in [Role::Foreman, Role::Pm, Role::CompanyOwner] {
            assert!(ensure_worker_edit(role, &rename).is_ok(), "{role}");
        }
    }
}
