// src/models/purchase_order.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, money},
    models::auth::Role,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "purchase_order_status")]
pub enum PurchaseOrderStatus {
    Draft,
    #[sqlx(rename = "Pending Approval")]
    #[serde(rename = "Pending Approval")]
    PendingApproval,
    Approved,
    Sent,
    Delivered,
    Closed,
    Cancelled,
}

impl PurchaseOrderStatus {
    /// Status inicial de acordo com quem cria o pedido.
    pub fn initial_for(role: Role) -> Self {
        match role {
            Role::Pm | Role::CompanyOwner => PurchaseOrderStatus::PendingApproval,
            _ => PurchaseOrderStatus::Draft,
        }
    }
}

/// Transições disparadas por rota própria (`/{id}/approve` etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseOrderAction {
    Approve,
    Send,
    Deliver,
    Close,
    Cancel,
}

impl PurchaseOrderAction {
    pub fn target_status(self) -> PurchaseOrderStatus {
        match self {
            PurchaseOrderAction::Approve => PurchaseOrderStatus::Approved,
            PurchaseOrderAction::Send => PurchaseOrderStatus::Sent,
            PurchaseOrderAction::Deliver => PurchaseOrderStatus::Delivered,
            PurchaseOrderAction::Close => PurchaseOrderStatus::Closed,
            PurchaseOrderAction::Cancel => PurchaseOrderStatus::Cancelled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderItem {
    #[validate(length(min = 1, message = "Item name is required."))]
    pub item_name: String,
    pub description: Option<String>,
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

/// Subtotal, imposto (15%) e total de um pedido.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurchaseOrderTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total_amount: Decimal,
}

impl PurchaseOrderTotals {
    pub const TAX_RATE: Decimal = Decimal::from_parts(15, 0, 0, false, 2);

    /// Recalcula o total de cada item e os totais do pedido.
    /// Valores negativos ou que não cabem na coluna monetária viram 400.
    pub fn compute(items: &mut [PurchaseOrderItem]) -> Result<Self, AppError> {
        for item in items.iter_mut() {
            item.total = money::line_total(item.quantity, item.unit_price)?;
        }
        let subtotal = money::checked_sum(items.iter().map(|item| item.total))?;
        let tax = money::ensure_storable((subtotal * Self::TAX_RATE).round_dp(2))?;
        let total_amount = money::checked_sum([subtotal, tax])?;
        Ok(Self { subtotal, tax, total_amount })
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrder {
    pub id: Uuid,
    pub company_id: Uuid,
    #[schema(example = "PO-000042")]
    pub po_number: String,
    pub project_id: Uuid,
    pub vendor_name: String,
    pub vendor_email: String,
    pub created_by: Uuid,
    #[schema(value_type = Vec<PurchaseOrderItem>)]
    pub items: Json<Vec<PurchaseOrderItem>>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total_amount: Decimal,
    pub status: PurchaseOrderStatus,
    pub notes: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub expected_delivery_date: Option<NaiveDate>,
    pub approved_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PurchaseOrder {
    /// Quem pode excluir: dono/PM, ou o autor enquanto ainda for rascunho.
    pub fn deletable_by(&self, actor_id: Uuid, role: Role) -> bool {
        matches!(role, Role::CompanyOwner | Role::Pm | Role::SuperAdmin)
            || (self.created_by == actor_id && self.status == PurchaseOrderStatus::Draft)
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePurchaseOrderPayload {
    pub project_id: Option<Uuid>,
    #[validate(length(min = 1, message = "Vendor name is required."))]
    pub vendor_name: String,
    #[validate(email(message = "Invalid vendor e-mail."))]
    pub vendor_email: String,
    #[validate(nested)]
    #[serde(default)]
    pub items: Vec<PurchaseOrderItem>,
    pub notes: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub expected_delivery_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePurchaseOrderPayload {
    #[validate(length(min = 1, message = "Vendor name is required."))]
    pub vendor_name: Option<String>,
    #[validate(email(message = "Invalid vendor e-mail."))]
    pub vendor_email: Option<String>,
    #[validate(nested)]
    pub items: Option<Vec<PurchaseOrderItem>>,
    pub notes: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub expected_delivery_date: Option<NaiveDate>,
    pub status: Option<PurchaseOrderStatus>,
}

impl UpdatePurchaseOrderPayload {
    /// Só o campo `status` foi enviado.
    pub fn is_status_only(&self) -> bool {
        self.status.is_some()
            && self.vendor_name.is_none()
            && self.vendor_email.is_none()
            && self.items.is_none()
            && self.notes.is_none()
            && self.expected_delivery_date.is_none()
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PurchaseOrderQuery {
    pub project_id: Option<Uuid>,
    pub status: Option<PurchaseOrderStatus>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn item(quantity: &str, unit_price: &str) -> PurchaseOrderItem {
        PurchaseOrderItem {
            item_name: "Cimento CP-II".into(),
            description: None,
            quantity: dec(quantity),
            unit_price: dec(unit_price),
            total: Decimal::ZERO,
        }
    }

    #[test]
    fn totals_include_fifteen_percent_tax() {
        let mut items = vec![item("10", "32.50"), item("2", "100")];
        let totals = PurchaseOrderTotals::compute(&mut items).unwrap();
        assert_eq!(items[0].total, dec("325.00"));
        assert_eq!(items[1].total, dec("200"));
        assert_eq!(totals.subtotal, dec("525.00"));
        assert_eq!(totals.tax, dec("78.75"));
        assert_eq!(totals.total_amount, dec("603.75"));
    }

    #[test]
    fn actions_map_to_statuses() {
        let action: PurchaseOrderAction = serde_json::from_str("\"deliver\"").unwrap();
        assert_eq!(action.target_status(), PurchaseOrderStatus::Delivered);
        assert_eq!(PurchaseOrderAction::Cancel.target_status(), PurchaseOrderStatus::Cancelled);
    }

    #[test]
    fn empty_order_totals_zero() {
        let totals = PurchaseOrderTotals::compute(&mut []).unwrap();
        assert_eq!(totals.total_amount, Decimal::ZERO);
    }

    #[test]
    fn huge_items_are_rejected_instead_of_overflowing() {
        let payload: PurchaseOrderItem =
            serde_json::from_str(r#"{"itemName":"aco","quantity":1e15,"unitPrice":1e15}"#).unwrap();
        let err = PurchaseOrderTotals::compute(&mut [payload]).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(err.to_string(), "Amount is too large");

        let mut items = vec![item("79228162514264337593543950335", "2")];
        assert!(PurchaseOrderTotals::compute(&mut items).is_err());
    }

    #[test]
    fn totals_must_fit_the_money_column() {
        let mut items = vec![item("1", "999999999999.99")];
        assert!(PurchaseOrderTotals::compute(&mut items).is_err());

        let mut items = vec![item("1", "1000000")];
        assert_eq!(PurchaseOrderTotals::compute(&mut items).unwrap().total_amount, dec("1150000.00"));
    }

    #[test]
    fn negative_quantities_or_prices_are_rejected() {
        let mut items = vec![item("-1", "10")];
        let err = PurchaseOrderTotals::compute(&mut items).unwrap_err();
        assert_eq!(err.to_string(), "Quantity and unit price must not be negative");

        let mut items = vec![item("3", "-0.01")];
        assert!(PurchaseOrderTotals::compute(&mut items).is_err());
    }

    #[test]
    fn managers_submit_for_approval() {
        assert_eq!(PurchaseOrderStatus::initial_for(Role::Pm), PurchaseOrderStatus::PendingApproval);
        assert_eq!(
            PurchaseOrderStatus::initial_for(Role::CompanyOwner),
            PurchaseOrderStatus::PendingApproval
        );
        assert_eq!(PurchaseOrderStatus::initial_for(Role::Foreman), PurchaseOrderStatus::Draft);
    }

    #[test]
    fn pending_approval_has_a_space_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&PurchaseOrderStatus::PendingApproval).unwrap(),
            "\"Pending Approval\""
        );
    }

    #[test]
    fn status_only_detection() {
        let payload = UpdatePurchaseOrderPayload {
            status: Some(PurchaseOrderStatus::Cancelled),
            ..Default::default()
        };
        assert!(payload.is_status_only());

        let payload = UpdatePurchaseOrderPayload {
            status: Some(PurchaseOrderStatus::Cancelled),
            notes: Some("urgente".into()),
            ..Default::default()
        };
        assert!(!payload.is_status_only());
    }
}
