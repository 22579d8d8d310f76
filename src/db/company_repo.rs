// src/db/company_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::{AppError, map_unique_violation},
    models::company::{Company, SubscriptionStatus, UpdateCompanyPayload},
};

#[derive(Clone)]
pub struct CompanyRepository {
    pool: PgPool,
}

impl CompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        name: &str,
        email: &str,
        phone: Option<&str>,
        plan: &str,
        status: SubscriptionStatus,
    ) -> Result<Company, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (name, email, phone, subscription_plan_id, subscription_status)
            VALUES ($1, lower($2), $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(plan)
        .bind(status)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            map_unique_violation(e, |_| {
                AppError::UniqueConstraintViolation("Company with this name already exists".into())
            })
        })
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>, AppError> {
        let company = sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(company)
    }

    pub async fn list_all(&self) -> Result<Vec<Company>, AppError> {
        let companies = sqlx::query_as::<_, Company>("SELECT * FROM companies ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(companies)
    }

    pub async fn update(&self, id: Uuid, payload: &UpdateCompanyPayload) -> Result<Option<Company>, AppError> {
        sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies SET
                name = COALESCE($2, name),
                email = COALESCE(lower($3), email),
                phone = COALESCE($4, phone),
                address = COALESCE($5, address),
                subscription_plan_id = COALESCE($6, subscription_plan_id),
                expire_date = COALESCE($7, expire_date),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.name.as_deref())
        .bind(payload.email.as_deref())
        .bind(payload.phone.as_deref())
        .bind(payload.address.as_deref())
        .bind(payload.subscription_plan_id.as_deref())
        .bind(payload.expire_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, |_| {
                AppError::UniqueConstraintViolation("Company with this name already exists".into())
            })
        })
    }

    pub async fn set_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: SubscriptionStatus,
    ) -> Result<Option<Company>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let company = sqlx::query_as::<_, Company>(
            "UPDATE companies SET subscription_status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(executor)
        .await?;
        Ok(company)
    }

    // Remove a empresa e, em cascata, tudo que pertence ao tenant
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
