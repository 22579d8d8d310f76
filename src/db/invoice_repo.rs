// src/db/invoice_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder, types::Json};
use uuid::Uuid;

use crate::{
    common::error::{AppError, map_unique_violation},
    models::invoice::{Invoice, InvoiceItem, InvoiceStatus},
    visibility::RowFilter,
};

pub struct NewInvoice<'a> {
    pub company_id: Uuid,
    pub project_id: Uuid,
    pub client_id: Uuid,
    pub created_by: Uuid,
    pub invoice_number: &'a str,
    pub items: Vec<InvoiceItem>,
    pub total_amount: Decimal,
    pub status: InvoiceStatus,
    pub due_date: Option<NaiveDate>,
}

/// Campos alteráveis; `None` mantém o valor atual.
#[derive(Default)]
pub struct InvoiceChanges {
    pub items: Option<(Vec<InvoiceItem>, Decimal)>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<InvoiceStatus>,
    pub mark_paid: bool,
}

fn duplicate_number(_: &str) -> AppError {
    AppError::Conflict("Invoice number already exists in this company".to_string())
}

#[derive(Clone)]
pub struct InvoiceRepository {
    pool: PgPool,
}

impl InvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, filter: &RowFilter, status: Option<InvoiceStatus>) -> Result<Vec<Invoice>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM invoices");
        filter.push_where(&mut qb);
        if let Some(status) = status {
            qb.push(" AND status = ").push_bind(status);
        }
        qb.push(" ORDER BY created_at DESC");
        let invoices = qb.build_query_as::<Invoice>().fetch_all(&self.pool).await?;
        Ok(invoices)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Invoice>, AppError> {
        let invoice = sqlx::query_as::<_, Invoice>("SELECT * FROM invoices WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(invoice)
    }

    /// Número repetido na mesma empresa vira 409.
    pub async fn create(&self, new_invoice: NewInvoice<'_>) -> Result<Invoice, AppError> {
        sqlx::query_as::<_, Invoice>(
            r#"
            INSERT INTO invoices (
                company_id, project_id, client_id, invoice_number, items,
                total_amount, status, due_date, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(new_invoice.company_id)
        .bind(new_invoice.project_id)
        .bind(new_invoice.client_id)
        .bind(new_invoice.invoice_number)
        .bind(Json(new_invoice.items))
        .bind(new_invoice.total_amount)
        .bind(new_invoice.status)
        .bind(new_invoice.due_date)
        .bind(new_invoice.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, duplicate_number))
    }

    pub async fn update(&self, id: Uuid, changes: InvoiceChanges) -> Result<Option<Invoice>, AppError> {
        let (items, total_amount) = match changes.items {
            Some((items, total)) => (Some(Json(items)), Some(total)),
            None => (None, None),
        };
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            UPDATE invoices SET
                items = COALESCE($2, items),
                total_amount = COALESCE($3, total_amount),
                due_date = COALESCE($4, due_date),
                status = COALESCE($5, status),
                paid_at = CASE WHEN $6 THEN NOW() ELSE paid_at END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(items)
        .bind(total_amount)
        .bind(changes.due_date)
        .bind(changes.status)
        .bind(changes.mark_paid)
        .fetch_optional(&self.pool)
        .await?;
        Ok(invoice)
    }
}
