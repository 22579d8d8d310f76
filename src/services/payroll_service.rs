// src/services/payroll_service.rs

use chrono::Utc;
use rust_decimal::{Decimal, prelude::FromPrimitive};
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{PayrollRepository, TimeLogRepository},
    models::{
        auth::Actor,
        payroll::{
            ApprovedHours, Payroll, PayrollHistoryEntry, PayrollPeriodQuery, PayrollPreviewEntry, PayrollStatus,
            RunPayrollPayload,
        },
    },
    services::payroll_calculator::{self, DEFAULT_PAY_PERIODS},
};

/// Valor-hora usado quando o funcionário não tem um cadastrado.
pub const FALLBACK_HOURLY_RATE: Decimal = Decimal::from_parts(30, 0, 0, false, 0);

const SECONDS_PER_HOUR: Decimal = Decimal::from_parts(3600, 0, 0, false, 0);

/// Referência de pagamento: `PAY-` + 9 caracteres alfanuméricos maiúsculos.
pub fn new_reference_id() -> String {
    let raw = uuid::Uuid::new_v4().simple().to_string().to_uppercase();
    format!("PAY-{}", &raw[..9])
}

/// Monta a linha da prévia a partir das horas aprovadas.
pub fn preview_entry(hours: &ApprovedHours) -> PayrollPreviewEntry {
    let rate = hours.hourly_rate.unwrap_or(FALLBACK_HOURLY_RATE);
    let total_hours = Decimal::from_f64(hours.total_seconds).unwrap_or_default() / SECONDS_PER_HOUR;
    let deductions = payroll_calculator::calculate(total_hours * rate, DEFAULT_PAY_PERIODS);

    PayrollPreviewEntry {
        user_id: hours.user_id,
        name: hours.full_name.clone(),
        role: hours.role,
        total_hours: total_hours.round_dp(2),
        rate,
        deductions,
    }
}

#[derive(Clone)]
pub struct PayrollService {
    repo: PayrollRepository,
    time_log_repo: TimeLogRepository,
    pool: PgPool,
}

impl PayrollService {
    pub fn new(repo: PayrollRepository, time_log_repo: TimeLogRepository, pool: PgPool) -> Self {
        Self { repo, time_log_repo, pool }
    }

    pub async fn preview(&self, actor: &Actor, period: &PayrollPeriodQuery) -> Result<Vec<PayrollPreviewEntry>, AppError> {
        if !period.is_valid() {
            return Err(AppError::bad_request("startDate must be before endDate"));
        }
        let hours = self
            .time_log_repo
            .approved_hours(actor.company_id, period.start_date, period.end_date)
            .await?;
        Ok(hours.iter().map(preview_entry).collect())
    }

    /// Recalcula a prévia e grava tudo numa transação, já como pago.
    pub async fn run(&self, actor: &Actor, payload: &RunPayrollPayload) -> Result<Vec<Payroll>, AppError> {
        let entries = self.preview(actor, payload).await?;
        let period = (payload.start_date, payload.end_date);
        let paid_at = Utc::now();

        let mut tx = self.pool.begin().await?;
        let mut saved = Vec::with_capacity(entries.len());
        for entry in &entries {
            let payroll = self
                .repo
                .insert(
                    &mut *tx,
                    actor.company_id,
                    entry,
                    period,
                    PayrollStatus::Paid,
                    Some(paid_at),
                    &new_reference_id(),
                )
                .await?;
            saved.push(payroll);
        }
        tx.commit().await?;

        tracing::info!(company_id = %actor.company_id, records = saved.len(), "folha de pagamento processada");
        Ok(saved)
    }

    pub async fn history(&self, actor: &Actor) -> Result<Vec<PayrollHistoryEntry>, AppError> {
        self.repo.history(actor.tenant_scope()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::Role;

    fn hours(seconds: f64, rate: Option<&str>) -> ApprovedHours {
        ApprovedHours {
            user_id: uuid::Uuid::new_v4(),
            full_name: "Ana Souza".into(),
            role: Role::Worker,
            hourly_rate: rate.map(|r| r.parse().expect("decimal")),
            total_seconds: seconds,
        }
    }

    #[test]
    fn falls_back_to_default_rate() {
        let entry = preview_entry(&hours(36_000.0, None));
        assert_eq!(entry.rate, Decimal::from(30));
        assert_eq!(entry.total_hours, Decimal::from(10));
        assert_eq!(entry.deductions.gross_pay, Decimal::from(300));
    }

    #[test]
    fn gross_is_hours_times_rate() {
        // 40h a 25/h
        let entry = preview_entry(&hours(144_000.0, Some("25")));
        assert_eq!(entry.total_hours, Decimal::from(40));
        assert_eq!(entry.deductions.gross_pay, Decimal::from(1000));
        assert_eq!(entry.deductions.pension_contribution, "55.49".parse::<Decimal>().expect("decimal"));
    }

    #[test]
    fn reference_ids_are_prefixed_and_uppercase() {
        let reference = new_reference_id();
        assert!(reference.starts_with("PAY-"));
        assert_eq!(reference.len(), 13);
        assert!(reference[4..].chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
        assert_ne!(reference, new_reference_id());
    }
}
