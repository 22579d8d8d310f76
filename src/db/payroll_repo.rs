// src/db/payroll_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::payroll::{Payroll, PayrollHistoryEntry, PayrollPreviewEntry, PayrollStatus},
};

#[derive(Clone)]
pub struct PayrollRepository {
    pool: PgPool,
}

impl PayrollRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn insert<'e, E>(
        &self,
        executor: E,
        company_id: Uuid,
        entry: &PayrollPreviewEntry,
        period: (DateTime<Utc>, DateTime<Utc>),
        status: PayrollStatus,
        payment_date: Option<DateTime<Utc>>,
        reference_id: &str,
    ) -> Result<Payroll, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let d = &entry.deductions;
        let payroll = sqlx::query_as::<_, Payroll>(
            r#"
            INSERT INTO payrolls (
                company_id, employee_id, pay_period_start, pay_period_end, total_hours, hourly_rate,
                gross_pay, pension_contribution, insurance_premium, work_comp_levy, income_tax, net_pay,
                status, payment_date, reference_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(entry.user_id)
        .bind(period.0)
        .bind(period.1)
        .bind(entry.total_hours)
        .bind(entry.rate)
        .bind(d.gross_pay)
        .bind(d.pension_contribution)
        .bind(d.insurance_premium)
        .bind(d.work_comp_levy)
        .bind(d.income_tax)
        .bind(d.net_pay)
        .bind(status)
        .bind(payment_date)
        .bind(reference_id)
        .fetch_one(executor)
        .await?;
        Ok(payroll)
    }

    pub async fn history(&self, tenant: Option<Uuid>) -> Result<Vec<PayrollHistoryEntry>, AppError> {
        let rows = sqlx::query_as::<_, PayrollHistoryEntry>(
            r#"
            SELECT p.*, u.full_name AS employee_name, u.role AS employee_role
            FROM payrolls p
            JOIN users u ON u.id = p.employee_id
            WHERE ($1::uuid IS NULL OR p.company_id = $1)
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(tenant)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
