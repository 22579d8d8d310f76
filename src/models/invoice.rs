// src/models/invoice.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, money},
    visibility::filter::{Field, Filterable},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "invoice_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Unpaid,
    PartiallyPaid,
    Paid,
    Overdue,
    Void,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    #[validate(length(min = 1, message = "Item description is required."))]
    pub description: String,
    #[serde(default = "default_quantity")]
    pub quantity: Decimal,
    #[serde(default)]
    pub unit_price: Decimal,
    /// Sempre recalculado como quantidade × preço unitário.
    #[serde(default)]
    pub total: Decimal,
}

fn default_quantity() -> Decimal {
    Decimal::ONE
}

/// Recalcula o total de cada item e devolve o total da fatura.
pub fn compute_total(items: &mut [InvoiceItem]) -> Result<Decimal, AppError> {
    for item in items.iter_mut() {
        item.total = money::line_total(item.quantity, item.unit_price)?;
    }
    money::checked_sum(items.iter().map(|item| item.total))
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,
    pub company_id: Uuid,
    pub project_id: Uuid,
    pub client_id: Uuid,
    #[schema(example = "FAT-2025-014")]
    pub invoice_number: String,
    #[schema(value_type = Vec<InvoiceItem>)]
    pub items: Json<Vec<InvoiceItem>>,
    pub total_amount: Decimal,
    pub status: InvoiceStatus,
    #[schema(value_type = Option<String>, format = Date)]
    pub due_date: Option<NaiveDate>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Filterable for Invoice {
    fn field_values(&self, field: Field) -> Vec<Uuid> {
        match field {
            Field::Id => vec![self.id],
            Field::CompanyId => vec![self.company_id],
            Field::ProjectId => vec![self.project_id],
            Field::ClientId => vec![self.client_id],
            Field::CreatedBy => vec![self.created_by],
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoicePayload {
    pub project_id: Option<Uuid>,
    /// Quando ausente, vale o cliente da obra.
    pub client_id: Option<Uuid>,
    #[validate(length(min = 1, message = "Invoice number is required."))]
    pub invoice_number: String,
    #[validate(nested)]
    #[serde(default)]
    pub items: Vec<InvoiceItem>,
    #[schema(value_type = Option<String>, format = Date)]
    pub due_date: Option<NaiveDate>,
    pub status: Option<InvoiceStatus>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInvoicePayload {
    #[validate(nested)]
    pub items: Option<Vec<InvoiceItem>>,
    #[schema(value_type = Option<String>, format = Date)]
    pub due_date: Option<NaiveDate>,
    pub status: Option<InvoiceStatus>,
}

impl UpdateInvoicePayload {
    /// `paid_at` é carimbado quando a fatura passa a `paid`.
    pub fn marks_paid(&self, current: InvoiceStatus) -> bool {
        self.status == Some(InvoiceStatus::Paid) && current != InvoiceStatus::Paid
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct InvoiceQuery {
    pub project_id: Option<Uuid>,
    pub status: Option<InvoiceStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn item(quantity: &str, unit_price: &str) -> InvoiceItem {
        InvoiceItem {
            description: "Medição da etapa 2".into(),
            quantity: dec(quantity),
            unit_price: dec(unit_price),
            total: dec("999"),
        }
    }

    #[test]
    fn item_totals_are_recomputed() {
        let mut items = vec![item("3", "1200.50"), item("1", "99.99")];
        let total = compute_total(&mut items).unwrap();
        assert_eq!(items[0].total, dec("3601.50"));
        assert_eq!(total, dec("3701.49"));
    }

    #[test]
    fn oversized_invoices_are_rejected() {
        let mut items = vec![item("1000000", "1000000")];
        let err = compute_total(&mut items).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn paid_transition_is_detected_once() {
        let payload = UpdateInvoicePayload { status: Some(InvoiceStatus::Paid), ..Default::default() };
        assert!(payload.marks_paid(InvoiceStatus::Unpaid));
        assert!(!payload.marks_paid(InvoiceStatus::Paid));
        assert!(!UpdateInvoicePayload::default().marks_paid(InvoiceStatus::Overdue));
    }

    #[test]
    fn statuses_use_snake_case_on_the_wire() {
        let status: InvoiceStatus = serde_json::from_str("\"partially_paid\"").unwrap();
        assert_eq!(status, InvoiceStatus::PartiallyPaid);
    }
}
