// src/services/photo_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{PhotoRepository, TaskRepository},
    models::{
        auth::Actor,
        photo::{CreatePhotoPayload, Photo, PhotoQuery},
    },
    services::project_service::ProjectService,
    visibility::{ResourceKind, VisibilityResolver, filter::Field},
};

#[derive(Clone)]
pub struct PhotoService {
    repo: PhotoRepository,
    task_repo: TaskRepository,
    project_service: ProjectService,
    resolver: VisibilityResolver,
}

impl PhotoService {
    pub fn new(
        repo: PhotoRepository,
        task_repo: TaskRepository,
        project_service: ProjectService,
        resolver: VisibilityResolver,
    ) -> Self {
        Self { repo, task_repo, project_service, resolver }
    }

    pub async fn list(&self, actor: &Actor, query: &PhotoQuery) -> Result<Vec<Photo>, AppError> {
        let filter = self
            .resolver
            .resolve(actor, ResourceKind::Photo, query.project_id)
            .await?
            .and_eq(Field::TaskId, query.task_id);
        self.repo.list(&filter).await
    }

    pub async fn create(
        &self,
        actor: &Actor,
        payload: &CreatePhotoPayload,
    ) -> Result<Photo, AppError> {
        let project_id = payload
            .project_id
            .ok_or_else(|| AppError::bad_request("Project ID is required"))?;
        let project = self.project_service.load_visible(actor, project_id).await?;

        if let Some(task_id) = payload.task_id {
            let task = self
                .task_repo
                .find_by_id(task_id)
                .await?
                .ok_or_else(|| AppError::not_found("Task"))?;
            if task.project_id != project.id {
                return Err(AppError::bad_request("Task does not belong to this project"));
            }
        }

        let photo = self.repo.create(project.company_id, actor.id, payload).await?;
        tracing::debug!(photo_id = %photo.id, project_id = %project.id, "foto registrada");
        Ok(photo)
    }

    pub async fn delete(&self, actor: &Actor, id: Uuid) -> Result<(), AppError> {
        let photo = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Photo"))?;
        actor.ensure_tenant(photo.company_id, "photo")?;
        self.repo.delete(id).await?;
        Ok(())
    }
}
