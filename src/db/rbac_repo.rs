// src/db/rbac_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{auth::Role, rbac::RolePermission},
};

// Linha da empresa vence a da plataforma (company_id NULL ordena por último)
const EFFECTIVE_ROWS: &str = r#"
    SELECT DISTINCT ON (role) *
    FROM role_permissions
    WHERE company_id IS NULL OR company_id = $1
"#;

#[derive(Clone)]
pub struct RbacRepository {
    pool: PgPool,
}

impl RbacRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Permissões efetivas de cada papel para o tenant (`None` = só a plataforma).
    pub async fn list(&self, tenant: Option<Uuid>) -> Result<Vec<RolePermission>, AppError> {
        let sql = format!("{EFFECTIVE_ROWS} ORDER BY role, company_id NULLS LAST");
        let rows = sqlx::query_as::<_, RolePermission>(&sql)
            .bind(tenant)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Erros de banco sobem como `sqlx::Error` para o chamador decidir o fallback.
    pub async fn find(&self, tenant: Option<Uuid>, role: Role) -> Result<Option<RolePermission>, sqlx::Error> {
        let sql = format!("{EFFECTIVE_ROWS} AND role = $2 ORDER BY role, company_id NULLS LAST");
        sqlx::query_as::<_, RolePermission>(&sql)
            .bind(tenant)
            .bind(role)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn upsert(&self, tenant: Option<Uuid>, role: Role, permissions: &[String]) -> Result<RolePermission, AppError> {
        let row = sqlx::query_as::<_, RolePermission>(
            r#"
            INSERT INTO role_permissions (company_id, role, permissions)
            VALUES ($1, $2, $3)
            ON CONFLICT (company_id, role) DO UPDATE
                SET permissions = EXCLUDED.permissions, updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(tenant)
        .bind(role)
        .bind(permissions)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Remove apenas a linha do escopo informado.
    pub async fn delete(&self, tenant: Option<Uuid>, role: Role) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM role_permissions WHERE company_id IS NOT DISTINCT FROM $1 AND role = $2")
            .bind(tenant)
            .bind(role)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Grava a tabela padrão da plataforma só para papéis que ainda não têm linha.
    pub async fn seed_missing(&self, defaults: &[(Role, Vec<String>)]) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;
        for (role, permissions) in defaults {
            let result = sqlx::query(
                r#"
                INSERT INTO role_permissions (company_id, role, permissions)
                VALUES (NULL, $1, $2)
                ON CONFLICT (company_id, role) DO NOTHING
                "#,
            )
            .bind(role)
            .bind(permissions)
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected();
        }
        tx.commit().await?;
        Ok(inserted)
    }
}
