// src/db/time_log_repo.rs

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        error::{AppError, map_unique_violation},
        geo::{GeoPoint, GeofenceStatus},
    },
    models::{
        payroll::ApprovedHours,
        time_log::{TimeLog, UpdateTimeLogPayload},
    },
};

pub struct NewTimeLog<'a> {
    pub company_id: Uuid,
    pub user_id: Uuid,
    pub project_id: Option<Uuid>,
    pub position: Option<GeoPoint>,
    pub geofence_status: GeofenceStatus,
    pub device_info: Option<&'a str>,
}

#[derive(Clone)]
pub struct TimeLogRepository {
    pool: PgPool,
}

impl TimeLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_open(&self, user_id: Uuid) -> Result<Option<TimeLog>, AppError> {
        let log = sqlx::query_as::<_, TimeLog>(
            "SELECT * FROM time_logs WHERE user_id = $1 AND clock_out IS NULL",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(log)
    }

    /// Abre um ponto. O índice único parcial barra um segundo ponto aberto,
    /// mesmo quando duas requisições passam pela checagem ao mesmo tempo.
    pub async fn clock_in(&self, new_log: NewTimeLog<'_>) -> Result<TimeLog, AppError> {
        sqlx::query_as::<_, TimeLog>(
            r#"
            INSERT INTO time_logs (
                company_id, user_id, project_id, clock_in,
                latitude_in, longitude_in, geofence_status, device_info
            )
            VALUES ($1, $2, $3, NOW(), $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(new_log.company_id)
        .bind(new_log.user_id)
        .bind(new_log.project_id)
        .bind(new_log.position.map(|p| p.latitude))
        .bind(new_log.position.map(|p| p.longitude))
        .bind(new_log.geofence_status)
        .bind(new_log.device_info)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, |_| AppError::bad_request("User already clocked in")))
    }

    pub async fn clock_out(&self, id: Uuid, position: Option<GeoPoint>) -> Result<Option<TimeLog>, AppError> {
        let log = sqlx::query_as::<_, TimeLog>(
            r#"
            UPDATE time_logs SET
                clock_out = NOW(),
                latitude_out = $2,
                longitude_out = $3,
                updated_at = NOW()
            WHERE id = $1 AND clock_out IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(position.map(|p| p.latitude))
        .bind(position.map(|p| p.longitude))
        .fetch_optional(&self.pool)
        .await?;
        Ok(log)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<TimeLog>, AppError> {
        let log = sqlx::query_as::<_, TimeLog>("SELECT * FROM time_logs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(log)
    }

    pub async fn list(
        &self,
        tenant: Option<Uuid>,
        user_id: Option<Uuid>,
        project_id: Option<Uuid>,
    ) -> Result<Vec<TimeLog>, AppError> {
        let logs = sqlx::query_as::<_, TimeLog>(
            r#"
            SELECT * FROM time_logs
            WHERE ($1::uuid IS NULL OR company_id = $1)
              AND ($2::uuid IS NULL OR user_id = $2)
              AND ($3::uuid IS NULL OR project_id = $3)
            ORDER BY clock_in DESC
            "#,
        )
        .bind(tenant)
        .bind(user_id)
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(logs)
    }

    pub async fn update(&self, id: Uuid, payload: &UpdateTimeLogPayload) -> Result<Option<TimeLog>, AppError> {
        sqlx::query_as::<_, TimeLog>(
            r#"
            UPDATE time_logs SET
                status = COALESCE($2, status),
                clock_in = COALESCE($3, clock_in),
                clock_out = COALESCE($4, clock_out),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.status)
        .bind(payload.clock_in)
        .bind(payload.clock_out)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    /// Horas aprovadas e fechadas no período, agrupadas por funcionário.
    pub async fn approved_hours(
        &self,
        company_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ApprovedHours>, AppError> {
        let rows = sqlx::query_as::<_, ApprovedHours>(
            r#"
            SELECT
                u.id AS user_id,
                u.full_name,
                u.role,
                u.hourly_rate,
                SUM(EXTRACT(EPOCH FROM (t.clock_out - t.clock_in)))::float8 AS total_seconds
            FROM time_logs t
            JOIN users u ON u.id = t.user_id
            WHERE t.company_id = $1
              AND t.status = 'approved'
              AND t.clock_out IS NOT NULL
              AND t.clock_in >= $2
              AND t.clock_out <= $3
            GROUP BY u.id, u.full_name, u.role, u.hourly_rate
            ORDER BY u.full_name
            "#,
        )
        .bind(company_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
