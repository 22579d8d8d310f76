// src/db/user_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::{AppError, map_foreign_key_violation, map_unique_violation},
    models::{
        auth::{Role, User},
        user::{UpdateUserPayload, UserSummary},
    },
};

/// Dados de um novo usuário, já com a senha em hash.
pub struct NewUser<'a> {
    pub company_id: Uuid,
    pub full_name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: Role,
    pub phone: Option<&'a str>,
    pub hourly_rate: Option<Decimal>,
    pub is_active: bool,
}

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE lower(email) = lower($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    // Cria um novo usuário. E-mail duplicado vira `EmailAlreadyExists`.
    pub async fn create_user<'e, E>(&self, executor: E, new_user: NewUser<'_>) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (company_id, full_name, email, password_hash, role, phone, hourly_rate, is_active)
            VALUES ($1, $2, lower($3), $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(new_user.company_id)
        .bind(new_user.full_name)
        .bind(new_user.email)
        .bind(new_user.password_hash)
        .bind(new_user.role)
        .bind(new_user.phone)
        .bind(new_user.hourly_rate)
        .bind(new_user.is_active)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            map_unique_violation(e, |constraint| match constraint {
                "users_email_key" => AppError::EmailAlreadyExists,
                other => AppError::UniqueConstraintViolation(other.to_string()),
            })
        })
    }

    /// Lista usuários; `tenant = None` apenas para o SUPER_ADMIN.
    pub async fn list(&self, tenant: Option<Uuid>, role: Option<Role>) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE ($1::uuid IS NULL OR company_id = $1)
              AND ($2::user_role IS NULL OR role = $2)
            ORDER BY full_name
            "#,
        )
        .bind(tenant)
        .bind(role)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    pub async fn update(&self, id: Uuid, payload: &UpdateUserPayload) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                full_name = COALESCE($2, full_name),
                role = COALESCE($3, role),
                phone = COALESCE($4, phone),
                hourly_rate = COALESCE($5, hourly_rate),
                is_active = COALESCE($6, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.full_name.as_deref())
        .bind(payload.role)
        .bind(payload.phone.as_deref())
        .bind(payload.hourly_rate)
        .bind(payload.is_active)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Quem ainda é autor de obras, frentes, tarefas ou fotos não pode sair do banco: 409.
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                map_foreign_key_violation(e, |_| {
                    AppError::Conflict(
                        "User is referenced by existing records; deactivate the account instead".to_string(),
                    )
                })
            })?;
        Ok(result.rows_affected() > 0)
    }

    /// Ativa ou desativa todos os usuários de uma empresa (aprovação de cadastro).
    pub async fn set_company_active<'e, E>(&self, executor: E, company_id: Uuid, active: bool) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("UPDATE users SET is_active = $2, updated_at = NOW() WHERE company_id = $1")
            .bind(company_id)
            .bind(active)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    /// Quantos dos ids informados pertencem à empresa.
    pub async fn count_in_company(&self, company_id: Uuid, ids: &[Uuid]) -> Result<i64, AppError> {
        let n = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE company_id = $1 AND id = ANY($2)",
        )
        .bind(company_id)
        .bind(ids)
        .fetch_one(&self.pool)
        .await?;
        Ok(n)
    }

    /// Usuários ativos do tenant (ou de todos, com `None`) cujos papéis estão em `roles`.
    pub async fn colleagues_with_roles(
        &self,
        tenant: Option<Uuid>,
        roles: &[Role],
        exclude: Uuid,
    ) -> Result<Vec<UserSummary>, AppError> {
        let roles: Vec<String> = roles.iter().map(|r| r.as_str().to_string()).collect();
        let users = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT id, full_name, email, role, phone
            FROM users
            WHERE ($1::uuid IS NULL OR company_id = $1) AND id <> $2 AND is_active AND role::text = ANY($3)
            ORDER BY full_name
            "#,
        )
        .bind(tenant)
        .bind(exclude)
        .bind(roles)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }
}
