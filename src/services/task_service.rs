// src/services/task_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::TaskRepository,
    models::{
        auth::{Actor, Role},
        task::{CreateTaskPayload, Task, TaskQuery, TaskStatus, UpdateTaskPayload},
    },
    services::project_service::ProjectService,
    visibility::{
        ResourceKind, RowFilter, VisibilityResolver,
        filter::{Field, Predicate},
    },
};

#[derive(Clone)]
pub struct TaskService {
    repo: TaskRepository,
    project_service: ProjectService,
    resolver: VisibilityResolver,
}

impl TaskService {
    pub fn new(repo: TaskRepository, project_service: ProjectService, resolver: VisibilityResolver) -> Self {
        Self { repo, project_service, resolver }
    }

    pub async fn list(&self, actor: &Actor, query: &TaskQuery) -> Result<Vec<Task>, AppError> {
        let filter = self
            .resolver
            .resolve(actor, ResourceKind::Task, query.project_id)
            .await?
            .and_eq(Field::AssignedTo, query.assigned_to);
        self.repo.list(&filter, query.status).await
    }

    pub async fn my_tasks(&self, actor: &Actor) -> Result<Vec<Task>, AppError> {
        let filter = RowFilter::for_tenant(actor.tenant_scope()).and(Predicate::Eq(Field::AssignedTo, actor.id));
        self.repo.list(&filter, None).await
    }

    async fn load_visible(&self, actor: &Actor, id: Uuid) -> Result<Task, AppError> {
        let task = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Task"))?;
        actor.ensure_tenant(task.company_id, "task")?;
        if !self.resolver.can_see(actor, ResourceKind::Task, &task).await? {
            return Err(AppError::forbidden("Not authorized to access this task"));
        }
        Ok(task)
    }

    pub async fn create(&self, actor: &Actor, payload: &CreateTaskPayload) -> Result<Task, AppError> {
        if actor.role == Role::Client {
            return Err(AppError::forbidden("Clients cannot create tasks"));
        }
        let project_id = payload
            .project_id
            .ok_or_else(|| AppError::bad_request("Project ID is required"))?;
        let project = self.project_service.load_visible(actor, project_id).await?;
        self.project_service
            .ensure_members(project.company_id, &payload.assigned_to, "Assignee")
            .await?;

        self.repo.create(project.company_id, project.id, actor.id, payload).await
    }

    pub async fn update(&self, actor: &Actor, id: Uuid, payload: &UpdateTaskPayload) -> Result<Task, AppError> {
        if actor.role == Role::Client {
            return Err(AppError::forbidden("Clients cannot update tasks"));
        }
        let task = self.load_visible(actor, id).await?;

        let completing = payload.status == Some(TaskStatus::Completed) && task.status != TaskStatus::Completed;
        if completing && !task.accepts_completion(payload.otp.as_deref()) {
            return Err(AppError::bad_request("Invalid Completion OTP"));
        }
        if let Some(assignees) = &payload.assigned_to {
            self.project_service
                .ensure_members(task.company_id, assignees, "Assignee")
                .await?;
        }

        self.repo
            .update(id, payload)
            .await?
            .ok_or_else(|| AppError::not_found("Task"))
    }

    pub async fn delete(&self, actor: &Actor, id: Uuid) -> Result<(), AppError> {
        let task = self.load_visible(actor, id).await?;
        let manager = matches!(actor.role, Role::SuperAdmin | Role::CompanyOwner | Role::Pm);
        if !manager && task.created_by != actor.id {
            return Err(AppError::forbidden("Not authorized to delete this task"));
        }
        self.repo.delete(id).await?;
        Ok(())
    }
}
