// src/models/payroll.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::auth::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payroll_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PayrollStatus {
    Pending,
    Processing,
    Paid,
    Held,
}

/// Resultado da calculadora de descontos para um período.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Deductions {
    pub gross_pay: Decimal,
    pub pension_contribution: Decimal,
    pub insurance_premium: Decimal,
    /// Encargo do empregador; não sai do líquido.
    pub work_comp_levy: Decimal,
    pub income_tax: Decimal,
    pub net_pay: Decimal,
}

// Registro imutável gravado pelo "run"
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payroll {
    pub id: Uuid,
    pub company_id: Uuid,
    pub employee_id: Uuid,
    pub pay_period_start: DateTime<Utc>,
    pub pay_period_end: DateTime<Utc>,
    pub total_hours: Decimal,
    pub hourly_rate: Decimal,
    pub gross_pay: Decimal,
    pub pension_contribution: Decimal,
    pub insurance_premium: Decimal,
    pub work_comp_levy: Decimal,
    pub income_tax: Decimal,
    pub net_pay: Decimal,
    pub status: PayrollStatus,
    pub payment_date: Option<DateTime<Utc>>,
    #[schema(example = "PAY-7QK2M9XAB")]
    pub reference_id: String,
    pub created_at: DateTime<Utc>,
}

/// Histórico com o nome do funcionário.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayrollHistoryEntry {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub payroll: Payroll,
    pub employee_name: String,
    pub employee_role: Role,
}

/// Horas aprovadas de um funcionário no período, vindas do banco.
#[derive(Debug, Clone, FromRow)]
pub struct ApprovedHours {
    pub user_id: Uuid,
    pub full_name: String,
    pub role: Role,
    pub hourly_rate: Option<Decimal>,
    pub total_seconds: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayrollPreviewEntry {
    pub user_id: Uuid,
    pub name: String,
    pub role: Role,
    pub total_hours: Decimal,
    pub rate: Decimal,
    #[serde(flatten)]
    pub deductions: Deductions,
}

#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PayrollPeriodQuery {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl PayrollPeriodQuery {
    pub fn is_valid(&self) -> bool {
        self.start_date < self.end_date
    }
}

// O corpo do run só informa o período; os valores são recalculados no servidor.
pub type RunPayrollPayload = PayrollPeriodQuery;
