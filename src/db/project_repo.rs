// src/db/project_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::{error::AppError, geo::DEFAULT_GEOFENCE_RADIUS},
    models::{
        auth::{Actor, Role},
        project::{CreateProjectPayload, Project, ProjectProgress, UpdateProjectPayload},
        user::UserSummary,
    },
    visibility::RowFilter,
};

#[derive(Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, filter: &RowFilter) -> Result<Vec<Project>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM projects");
        filter.push_where(&mut qb);
        qb.push(" ORDER BY created_at DESC");
        let projects = qb.build_query_as::<Project>().fetch_all(&self.pool).await?;
        Ok(projects)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>, AppError> {
        let project = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(project)
    }

    /// Tenant dono da obra, usado para validar estreitamentos.
    pub async fn company_of(&self, id: Uuid) -> Result<Option<Uuid>, AppError> {
        let company_id = sqlx::query_scalar::<_, Uuid>("SELECT company_id FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(company_id)
    }

    /// Obras ligadas diretamente ao usuário: cliente da obra (CLIENT)
    /// ou PM/criador (PM).
    pub async fn direct_project_ids(&self, actor: &Actor) -> Result<Vec<Uuid>, AppError> {
        let sql = match actor.role {
            Role::Client => "SELECT id FROM projects WHERE company_id = $1 AND client_id = $2",
            _ => "SELECT id FROM projects WHERE company_id = $1 AND (pm_id = $2 OR created_by = $2)",
        };
        let ids = sqlx::query_scalar::<_, Uuid>(sql)
            .bind(actor.company_id)
            .bind(actor.id)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    pub async fn create(
        &self,
        company_id: Uuid,
        created_by: Uuid,
        payload: &CreateProjectPayload,
    ) -> Result<Project, AppError> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (
                company_id, name, client_id, pm_id, start_date, end_date, budget,
                address, latitude, longitude, geofence_radius, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(&payload.name)
        .bind(payload.client_id)
        .bind(payload.pm_id)
        .bind(payload.start_date)
        .bind(payload.end_date)
        .bind(payload.budget.unwrap_or(Decimal::ZERO))
        .bind(payload.address.as_deref())
        .bind(payload.latitude)
        .bind(payload.longitude)
        .bind(payload.geofence_radius.unwrap_or(DEFAULT_GEOFENCE_RADIUS))
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(project)
    }

    pub async fn update(&self, id: Uuid, payload: &UpdateProjectPayload) -> Result<Option<Project>, AppError> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects SET
                name = COALESCE($2, name),
                client_id = COALESCE($3, client_id),
                pm_id = COALESCE($4, pm_id),
                start_date = COALESCE($5, start_date),
                end_date = COALESCE($6, end_date),
                budget = COALESCE($7, budget),
                status = COALESCE($8, status),
                address = COALESCE($9, address),
                latitude = COALESCE($10, latitude),
                longitude = COALESCE($11, longitude),
                geofence_radius = COALESCE($12, geofence_radius),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.name.as_deref())
        .bind(payload.client_id)
        .bind(payload.pm_id)
        .bind(payload.start_date)
        .bind(payload.end_date)
        .bind(payload.budget)
        .bind(payload.status)
        .bind(payload.address.as_deref())
        .bind(payload.latitude)
        .bind(payload.longitude)
        .bind(payload.geofence_radius)
        .fetch_optional(&self.pool)
        .await?;
        Ok(project)
    }

    /// Grava progresso e status derivados das frentes de trabalho.
    pub async fn set_progress<'e, E>(&self, executor: E, id: Uuid, progress: ProjectProgress) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE projects SET progress = $2, status = $3, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(progress.progress)
            .bind(progress.status)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Equipe da obra: quem tem tarefa nela mais o criador, sem clientes.
    pub async fn members(&self, project: &Project) -> Result<Vec<UserSummary>, AppError> {
        let members = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT u.id, u.full_name, u.email, u.role, u.phone
            FROM users u
            WHERE u.role <> 'CLIENT'
              AND (
                u.id = $2
                OR EXISTS (
                    SELECT 1 FROM tasks t
                    WHERE t.project_id = $1 AND u.id = ANY(t.assigned_to)
                )
              )
            ORDER BY u.full_name
            "#,
        )
        .bind(project.id)
        .bind(project.created_by)
        .fetch_all(&self.pool)
        .await?;
        Ok(members)
    }
}
