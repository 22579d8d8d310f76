// src/db/task_repo.rs

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::task::{CreateTaskPayload, Task, TaskPriority, TaskStatus, UpdateTaskPayload},
    visibility::RowFilter,
};

#[derive(Clone)]
pub struct TaskRepository {
    pool: PgPool,
}

impl TaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, filter: &RowFilter, status: Option<TaskStatus>) -> Result<Vec<Task>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM tasks");
        filter.push_where(&mut qb);
        if let Some(status) = status {
            qb.push(" AND status = ").push_bind(status);
        }
        qb.push(" ORDER BY due_date ASC NULLS LAST, created_at DESC");
        let tasks = qb.build_query_as::<Task>().fetch_all(&self.pool).await?;
        Ok(tasks)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    pub async fn create(
        &self,
        company_id: Uuid,
        project_id: Uuid,
        created_by: Uuid,
        payload: &CreateTaskPayload,
    ) -> Result<Task, AppError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (
                company_id, project_id, title, description, assigned_to,
                due_date, priority, completion_otp, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(project_id)
        .bind(&payload.title)
        .bind(payload.description.as_deref())
        .bind(&payload.assigned_to)
        .bind(payload.due_date)
        .bind(payload.priority.unwrap_or(TaskPriority::Medium))
        .bind(payload.completion_otp.as_deref())
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(task)
    }

    pub async fn update(&self, id: Uuid, payload: &UpdateTaskPayload) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                assigned_to = COALESCE($4, assigned_to),
                due_date = COALESCE($5, due_date),
                status = COALESCE($6, status),
                priority = COALESCE($7, priority),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.title.as_deref())
        .bind(payload.description.as_deref())
        .bind(payload.assigned_to.as_deref())
        .bind(payload.due_date)
        .bind(payload.status)
        .bind(payload.priority)
        .fetch_optional(&self.pool)
        .await?;
        Ok(task)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
