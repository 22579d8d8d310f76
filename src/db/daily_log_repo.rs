// src/db/daily_log_repo.rs

use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder, types::Json};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::daily_log::{CreateDailyLogPayload, DailyLog},
    visibility::RowFilter,
};

#[derive(Clone)]
pub struct DailyLogRepository {
    pool: PgPool,
}

impl DailyLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, filter: &RowFilter, date: Option<NaiveDate>) -> Result<Vec<DailyLog>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM daily_logs");
        filter.push_where(&mut qb);
        if let Some(date) = date {
            qb.push(" AND log_date = ").push_bind(date);
        }
        qb.push(" ORDER BY log_date DESC, created_at DESC");
        let logs = qb.build_query_as::<DailyLog>().fetch_all(&self.pool).await?;
        Ok(logs)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<DailyLog>, AppError> {
        let log = sqlx::query_as::<_, DailyLog>("SELECT * FROM daily_logs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(log)
    }

    pub async fn create(
        &self,
        company_id: Uuid,
        project_id: Uuid,
        reported_by: Uuid,
        payload: &CreateDailyLogPayload,
    ) -> Result<DailyLog, AppError> {
        let log = sqlx::query_as::<_, DailyLog>(
            r#"
            INSERT INTO daily_logs (
                company_id, project_id, log_date, weather, manpower, work_performed,
                materials_received, equipment_used, safety_observations, delays, visitors, reported_by
            )
            VALUES ($1, $2, COALESCE($3, CURRENT_DATE), $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(project_id)
        .bind(payload.log_date)
        .bind(payload.weather.as_ref().map(Json))
        .bind(Json(&payload.manpower))
        .bind(&payload.work_performed)
        .bind(&payload.materials_received)
        .bind(&payload.equipment_used)
        .bind(payload.safety_observations.as_deref())
        .bind(payload.delays.as_deref())
        .bind(&payload.visitors)
        .bind(reported_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(log)
    }

    pub async fn verify(&self, id: Uuid, verified_by: Uuid) -> Result<Option<DailyLog>, AppError> {
        let log = sqlx::query_as::<_, DailyLog>(
            r#"
            UPDATE daily_logs SET is_verified = TRUE, verified_by = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(verified_by)
        .fetch_optional(&self.pool)
        .await?;
        Ok(log)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM daily_logs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
