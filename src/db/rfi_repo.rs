// src/db/rfi_repo.rs

use chrono::{NaiveDate, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder, types::Json};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::rfi::{
        CreateRfiPayload, Rfi, RfiCategory, RfiComment, RfiCounts, RfiPriority, RfiQuery, UpdateRfiPayload,
        format_rfi_number,
    },
    visibility::RowFilter,
};

/// Recorte usado pelo painel de RFIs.
pub enum RfiSlice {
    Recent,
    HighPriorityOpen,
    Overdue(NaiveDate),
}

#[derive(Clone)]
pub struct RfiRepository {
    pool: PgPool,
}

impl RfiRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, filter: &RowFilter, query: &RfiQuery) -> Result<Vec<Rfi>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM rfis");
        filter.push_where(&mut qb);
        if let Some(status) = query.status {
            qb.push(" AND status = ").push_bind(status);
        }
        if let Some(priority) = query.priority {
            qb.push(" AND priority = ").push_bind(priority);
        }
        qb.push(" ORDER BY created_at DESC");
        let rfis = qb.build_query_as::<Rfi>().fetch_all(&self.pool).await?;
        Ok(rfis)
    }

    pub async fn slice(&self, filter: &RowFilter, slice: RfiSlice, limit: i64) -> Result<Vec<Rfi>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM rfis");
        filter.push_where(&mut qb);
        match slice {
            RfiSlice::Recent => {
                qb.push(" ORDER BY created_at DESC");
            }
            RfiSlice::HighPriorityOpen => {
                qb.push(" AND priority = 'high' AND status <> 'closed' ORDER BY created_at DESC");
            }
            RfiSlice::Overdue(today) => {
                qb.push(" AND status <> 'closed' AND due_date < ")
                    .push_bind(today)
                    .push(" ORDER BY due_date ASC");
            }
        }
        qb.push(" LIMIT ").push_bind(limit);
        let rfis = qb.build_query_as::<Rfi>().fetch_all(&self.pool).await?;
        Ok(rfis)
    }

    pub async fn counts(&self, filter: &RowFilter, today: NaiveDate) -> Result<RfiCounts, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'open') AS open,
                COUNT(*) FILTER (WHERE status = 'in_review') AS in_review,
                COUNT(*) FILTER (WHERE status = 'answered') AS answered,
                COUNT(*) FILTER (WHERE status = 'closed') AS closed,
                COUNT(*) FILTER (WHERE status <> 'closed' AND due_date < "#,
        );
        qb.push_bind(today).push(") AS overdue FROM rfis");
        filter.push_where(&mut qb);
        let counts = qb.build_query_as::<RfiCounts>().fetch_one(&self.pool).await?;
        Ok(counts)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Rfi>, AppError> {
        let rfi = sqlx::query_as::<_, Rfi>("SELECT * FROM rfis WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(rfi)
    }

    /// Numeração por empresa (`RFI-0001`), serializada pelo lock na linha da empresa.
    pub async fn create(
        &self,
        company_id: Uuid,
        project_id: Uuid,
        raised_by: Uuid,
        payload: &CreateRfiPayload,
    ) -> Result<Rfi, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT id FROM companies WHERE id = $1 FOR UPDATE")
            .bind(company_id)
            .execute(&mut *tx)
            .await?;
        let last = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(MAX(SUBSTRING(rfi_number FROM 5)::bigint), 0)
            FROM rfis WHERE company_id = $1
            "#,
        )
        .bind(company_id)
        .fetch_one(&mut *tx)
        .await?;

        let rfi = sqlx::query_as::<_, Rfi>(
            r#"
            INSERT INTO rfis (
                company_id, project_id, rfi_number, subject, description, location,
                category, priority, raised_by, assigned_to, due_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(project_id)
        .bind(format_rfi_number(last + 1))
        .bind(&payload.subject)
        .bind(&payload.description)
        .bind(payload.location.as_deref())
        .bind(payload.category.unwrap_or(RfiCategory::Other))
        .bind(payload.priority.unwrap_or(RfiPriority::Medium))
        .bind(raised_by)
        .bind(payload.assigned_to)
        .bind(payload.due_date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(rfi)
    }

    pub async fn update(&self, id: Uuid, payload: &UpdateRfiPayload) -> Result<Option<Rfi>, AppError> {
        let rfi = sqlx::query_as::<_, Rfi>(
            r#"
            UPDATE rfis SET
                subject = COALESCE($2, subject),
                description = COALESCE($3, description),
                location = COALESCE($4, location),
                category = COALESCE($5, category),
                priority = COALESCE($6, priority),
                status = COALESCE($7, status),
                assigned_to = COALESCE($8, assigned_to),
                due_date = COALESCE($9, due_date),
                official_response = COALESCE($10, official_response),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.subject.as_deref())
        .bind(payload.description.as_deref())
        .bind(payload.location.as_deref())
        .bind(payload.category)
        .bind(payload.priority)
        .bind(payload.status)
        .bind(payload.assigned_to)
        .bind(payload.due_date)
        .bind(payload.official_response.as_deref())
        .fetch_optional(&self.pool)
        .await?;
        Ok(rfi)
    }

    pub async fn add_comment(&self, id: Uuid, author_id: Uuid, text: &str) -> Result<Option<Rfi>, AppError> {
        let comment = RfiComment { author_id, text: text.to_string(), created_at: Utc::now() };
        let rfi = sqlx::query_as::<_, Rfi>(
            r#"
            UPDATE rfis SET comments = comments || jsonb_build_array($2::jsonb), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(Json(comment))
        .fetch_optional(&self.pool)
        .await?;
        Ok(rfi)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM rfis WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

