// src/services/project_service.rs

use std::collections::BTreeSet;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ProjectRepository, UserRepository},
    models::{
        auth::{Actor, Role},
        project::{AssignPmPayload, CreateProjectPayload, Project, UpdateProjectPayload},
        user::UserSummary,
    },
    visibility::{ResourceKind, VisibilityResolver},
};

#[derive(Clone)]
pub struct ProjectService {
    repo: ProjectRepository,
    user_repo: UserRepository,
    resolver: VisibilityResolver,
}

impl ProjectService {
    pub fn new(repo: ProjectRepository, user_repo: UserRepository, resolver: VisibilityResolver) -> Self {
        Self { repo, user_repo, resolver }
    }

    pub async fn list(&self, actor: &Actor) -> Result<Vec<Project>, AppError> {
        let filter = self.resolver.resolve(actor, ResourceKind::Project, None).await?;
        self.repo.list(&filter).await
    }

    /// Carrega a obra garantindo tenant e visibilidade: 404, depois 403.
    pub async fn load_visible(&self, actor: &Actor, id: Uuid) -> Result<Project, AppError> {
        let project = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Project"))?;
        actor.ensure_tenant(project.company_id, "project")?;
        if !self.resolver.can_see(actor, ResourceKind::Project, &project).await? {
            return Err(AppError::forbidden("Not authorized to access this project"));
        }
        Ok(project)
    }

    pub async fn create(&self, actor: &Actor, payload: &CreateProjectPayload) -> Result<Project, AppError> {
        actor.authorize(&[Role::CompanyOwner, Role::SuperAdmin, Role::Pm])?;
        self.ensure_member(actor.company_id, payload.client_id, "Client").await?;
        self.ensure_member(actor.company_id, payload.pm_id, "Project manager").await?;

        let project = self.repo.create(actor.company_id, actor.id, payload).await?;
        tracing::info!(project_id = %project.id, by = %actor.id, "obra criada");
        Ok(project)
    }

    pub async fn update(&self, actor: &Actor, id: Uuid, payload: &UpdateProjectPayload) -> Result<Project, AppError> {
        actor.authorize(&[Role::CompanyOwner, Role::SuperAdmin, Role::Pm])?;
        let project = self.load_visible(actor, id).await?;
        self.ensure_member(project.company_id, payload.client_id, "Client").await?;
        self.ensure_member(project.company_id, payload.pm_id, "Project manager").await?;

        self.repo
            .update(id, payload)
            .await?
            .ok_or_else(|| AppError::not_found("Project"))
    }

    pub async fn assign_pm(&self, actor: &Actor, id: Uuid, payload: &AssignPmPayload) -> Result<Project, AppError> {
        actor.authorize(&[Role::CompanyOwner, Role::SuperAdmin])?;
        let project = self.load_visible(actor, id).await?;

        let pm = self
            .user_repo
            .find_by_id(payload.pm_id)
            .await?
            .filter(|u| u.company_id == project.company_id)
            .ok_or_else(|| AppError::bad_request("Project manager not found in this company"))?;
        if pm.role != Role::Pm {
            return Err(AppError::bad_request("Selected user is not a project manager"));
        }

        let update = UpdateProjectPayload { pm_id: Some(pm.id), ..Default::default() };
        self.repo
            .update(id, &update)
            .await?
            .ok_or_else(|| AppError::not_found("Project"))
    }

    pub async fn delete(&self, actor: &Actor, id: Uuid) -> Result<(), AppError> {
        actor.authorize(&[Role::CompanyOwner, Role::SuperAdmin])?;
        let project = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Project"))?;
        actor.ensure_tenant(project.company_id, "project")?;

        self.repo.delete(id).await?;
        tracing::info!(project_id = %id, by = %actor.id, "obra removida");
        Ok(())
    }

    pub async fn members(&self, actor: &Actor, id: Uuid) -> Result<Vec<UserSummary>, AppError> {
        let project = self.load_visible(actor, id).await?;
        self.repo.members(&project).await
    }

    /// Ids informados precisam ser usuários da empresa; senão 400.
    pub async fn ensure_members(&self, company_id: Uuid, ids: &[Uuid], label: &str) -> Result<(), AppError> {
        let unique: BTreeSet<Uuid> = ids.iter().copied().collect();
        if unique.is_empty() {
            return Ok(());
        }
        let ids: Vec<Uuid> = unique.into_iter().collect();
        let found = self.user_repo.count_in_company(company_id, &ids).await?;
        if found != ids.len() as i64 {
            return Err(AppError::bad_request(format!("{label} not found in this company")));
        }
        Ok(())
    }

    async fn ensure_member(&self, company_id: Uuid, id: Option<Uuid>, label: &str) -> Result<(), AppError> {
        match id {
            Some(id) => self.ensure_members(company_id, &[id], label).await,
            None => Ok(()),
        }
    }
}
