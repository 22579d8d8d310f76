// src/db/job_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        auth::Actor,
        job::{CreateJobPayload, Job, JobLink, JobStatus, UpdateJobPayload},
    },
    visibility::RowFilter,
};

#[derive(Clone)]
pub struct JobRepository {
    pool: PgPool,
}

impl JobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Obras em que o usuário aparece como encarregado, operário ou criador de frente.
    pub async fn project_links(&self, actor: &Actor) -> Result<Vec<JobLink>, AppError> {
        let links = sqlx::query_as::<_, JobLink>(
            r#"
            SELECT
                project_id,
                COALESCE(bool_or(foreman_id = $2), FALSE) AS is_foreman,
                COALESCE(bool_or($2 = ANY(assigned_workers)), FALSE) AS is_worker,
                COALESCE(bool_or(created_by = $2), FALSE) AS is_creator
            FROM jobs
            WHERE company_id = $1
              AND (foreman_id = $2 OR $2 = ANY(assigned_workers) OR created_by = $2)
            GROUP BY project_id
            "#,
        )
        .bind(actor.company_id)
        .bind(actor.id)
        .fetch_all(&self.pool)
        .await?;
        Ok(links)
    }

    pub async fn list(&self, filter: &RowFilter) -> Result<Vec<Job>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM jobs");
        filter.push_where(&mut qb);
        qb.push(" ORDER BY created_at DESC");
        let jobs = qb.build_query_as::<Job>().fetch_all(&self.pool).await?;
        Ok(jobs)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Job>, AppError> {
        let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(job)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        project_id: Uuid,
        created_by: Uuid,
        payload: &CreateJobPayload,
    ) -> Result<Job, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let job = sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs (
                company_id, project_id, name, location, description, start_date, end_date,
                foreman_id, assigned_workers, budget, status, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(project_id)
        .bind(&payload.name)
        .bind(payload.location.as_deref().unwrap_or_default())
        .bind(payload.description.as_deref().unwrap_or_default())
        .bind(payload.start_date)
        .bind(payload.end_date)
        .bind(payload.foreman_id)
        .bind(&payload.assigned_workers)
        .bind(payload.budget.unwrap_or(Decimal::ZERO))
        .bind(payload.status.unwrap_or(JobStatus::Planning))
        .bind(created_by)
        .fetch_one(executor)
        .await?;
        Ok(job)
    }

    pub async fn update<'e, E>(&self, executor: E, id: Uuid, payload: &UpdateJobPayload) -> Result<Option<Job>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let job = sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs SET
                name = COALESCE($2, name),
                location = COALESCE($3, location),
                description = COALESCE($4, description),
                start_date = COALESCE($5, start_date),
                end_date = COALESCE($6, end_date),
                foreman_id = COALESCE($7, foreman_id),
                assigned_workers = COALESCE($8, assigned_workers),
                budget = COALESCE($9, budget),
                status = COALESCE($10, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.name.as_deref())
        .bind(payload.location.as_deref())
        .bind(payload.description.as_deref())
        .bind(payload.start_date)
        .bind(payload.end_date)
        .bind(payload.foreman_id)
        .bind(payload.assigned_workers.as_deref())
        .bind(payload.budget)
        .bind(payload.status)
        .fetch_optional(executor)
        .await?;
        Ok(job)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Status de todas as frentes de uma obra, base do progresso.
    pub async fn statuses_for_project<'e, E>(&self, executor: E, project_id: Uuid) -> Result<Vec<JobStatus>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let statuses = sqlx::query_scalar::<_, JobStatus>("SELECT status FROM jobs WHERE project_id = $1")
            .bind(project_id)
            .fetch_all(executor)
            .await?;
        Ok(statuses)
    }
}
