// src/db/dashboard_repo.rs

use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::dashboard::{DashboardStats, PlatformStats, TaskStatusCount},
    visibility::RowFilter,
};

/// Filtros já resolvidos para cada recurso do painel.
pub struct DashboardScope {
    pub tenant: Option<Uuid>,
    pub projects: RowFilter,
    pub tasks: RowFilter,
    pub photos: RowFilter,
}

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Todas as contagens no mesmo snapshot
    pub async fn stats(&self, scope: &DashboardScope) -> Result<DashboardStats, AppError> {
        let mut tx = self.pool.begin().await?;

        let tasks_due_today = count(
            &mut tx,
            "tasks",
            &scope.tasks,
            "due_date::date = CURRENT_DATE AND status <> 'completed'",
        )
        .await?;
        let overdue_tasks = count(
            &mut tx,
            "tasks",
            &scope.tasks,
            "due_date < date_trunc('day', NOW()) AND status <> 'completed'",
        )
        .await?;
        let active_projects = count(&mut tx, "projects", &scope.projects, "status = 'active'").await?;
        let photos_today = count(&mut tx, "photos", &scope.photos, "created_at::date = CURRENT_DATE").await?;

        // Quem está com ponto aberto agora
        let employees_on_site = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(DISTINCT user_id) FROM time_logs
            WHERE clock_out IS NULL AND ($1::uuid IS NULL OR company_id = $1)
            "#,
        )
        .bind(scope.tenant)
        .fetch_one(&mut *tx)
        .await?;

        let mut qb = QueryBuilder::<Postgres>::new("SELECT status, COUNT(*) AS count FROM tasks");
        scope.tasks.push_where(&mut qb);
        qb.push(" GROUP BY status ORDER BY status");
        let task_distribution = qb
            .build_query_as::<TaskStatusCount>()
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(DashboardStats {
            tasks_due_today,
            overdue_tasks,
            active_projects,
            employees_on_site,
            photos_today,
            task_distribution,
        })
    }

    pub async fn platform_stats(&self) -> Result<PlatformStats, AppError> {
        let stats = sqlx::query_as::<_, PlatformStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM companies) AS total_companies,
                (SELECT COUNT(*) FROM users) AS total_users,
                (SELECT COUNT(*) FROM projects) AS total_projects,
                (SELECT COUNT(*) FROM companies WHERE subscription_status = 'active') AS active_subscriptions,
                (SELECT COUNT(*) FROM companies WHERE subscription_status = 'pending') AS pending_companies
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(stats)
    }
}

async fn count(
    conn: &mut PgConnection,
    table: &'static str,
    filter: &RowFilter,
    condition: &'static str,
) -> Result<i64, AppError> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM ");
    qb.push(table);
    filter.push_where(&mut qb);
    qb.push(" AND ").push(condition);
    let n = qb.build_query_scalar::<i64>().fetch_one(conn).await?;
    Ok(n)
}
