// src/db/purchase_order_repo.rs

use sqlx::{Executor, PgPool, Postgres, types::Json};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::purchase_order::{
        PurchaseOrder, PurchaseOrderItem, PurchaseOrderQuery, PurchaseOrderStatus, PurchaseOrderTotals,
        UpdatePurchaseOrderPayload,
    },
};

pub struct NewPurchaseOrder<'a> {
    pub company_id: Uuid,
    pub project_id: Uuid,
    pub created_by: Uuid,
    pub vendor_name: &'a str,
    pub vendor_email: &'a str,
    pub items: Vec<PurchaseOrderItem>,
    pub totals: PurchaseOrderTotals,
    pub status: PurchaseOrderStatus,
    pub notes: Option<&'a str>,
    pub expected_delivery_date: Option<chrono::NaiveDate>,
}

#[derive(Clone)]
pub struct PurchaseOrderRepository {
    pool: PgPool,
}

impl PurchaseOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Número sequencial no formato `PO-000001`.
    pub async fn next_number<'e, E>(&self, executor: E) -> Result<String, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let seq = sqlx::query_scalar::<_, i64>("SELECT nextval('purchase_order_number_seq')")
            .fetch_one(executor)
            .await?;
        Ok(format_po_number(seq))
    }

    pub async fn create(&self, new_po: NewPurchaseOrder<'_>) -> Result<PurchaseOrder, AppError> {
        let mut tx = self.pool.begin().await?;
        let po_number = self.next_number(&mut *tx).await?;

        let po = sqlx::query_as::<_, PurchaseOrder>(
            r#"
            INSERT INTO purchase_orders (
                company_id, po_number, project_id, vendor_name, vendor_email, created_by,
                items, subtotal, tax, total_amount, status, notes, expected_delivery_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(new_po.company_id)
        .bind(&po_number)
        .bind(new_po.project_id)
        .bind(new_po.vendor_name)
        .bind(new_po.vendor_email)
        .bind(new_po.created_by)
        .bind(Json(new_po.items))
        .bind(new_po.totals.subtotal)
        .bind(new_po.totals.tax)
        .bind(new_po.totals.total_amount)
        .bind(new_po.status)
        .bind(new_po.notes)
        .bind(new_po.expected_delivery_date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(po)
    }

    /// `created_by` restringe a lista aos pedidos do próprio autor.
    pub async fn list(
        &self,
        tenant: Option<Uuid>,
        created_by: Option<Uuid>,
        query: &PurchaseOrderQuery,
    ) -> Result<Vec<PurchaseOrder>, AppError> {
        let pos = sqlx::query_as::<_, PurchaseOrder>(
            r#"
            SELECT * FROM purchase_orders
            WHERE ($1::uuid IS NULL OR company_id = $1)
              AND ($2::uuid IS NULL OR created_by = $2)
              AND ($3::uuid IS NULL OR project_id = $3)
              AND ($4::purchase_order_status IS NULL OR status = $4)
              AND ($5::timestamptz IS NULL OR created_at >= $5)
              AND ($6::timestamptz IS NULL OR created_at <= $6)
            ORDER BY created_at DESC
            "#,
        )
        .bind(tenant)
        .bind(created_by)
        .bind(query.project_id)
        .bind(query.status)
        .bind(query.start_date)
        .bind(query.end_date)
        .fetch_all(&self.pool)
        .await?;
        Ok(pos)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<PurchaseOrder>, AppError> {
        let po = sqlx::query_as::<_, PurchaseOrder>("SELECT * FROM purchase_orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(po)
    }

    /// Atualiza conteúdo e/ou status. Itens novos vêm com totais já recalculados.
    pub async fn update(
        &self,
        id: Uuid,
        payload: &UpdatePurchaseOrderPayload,
        items: Option<(Vec<PurchaseOrderItem>, PurchaseOrderTotals)>,
    ) -> Result<Option<PurchaseOrder>, AppError> {
        let (items, totals) = match items {
            Some((items, totals)) => (Some(Json(items)), Some(totals)),
            None => (None, None),
        };
        let po = sqlx::query_as::<_, PurchaseOrder>(
            r#"
            UPDATE purchase_orders SET
                vendor_name = COALESCE($2, vendor_name),
                vendor_email = COALESCE($3, vendor_email),
                items = COALESCE($4, items),
                subtotal = COALESCE($5, subtotal),
                tax = COALESCE($6, tax),
                total_amount = COALESCE($7, total_amount),
                notes = COALESCE($8, notes),
                expected_delivery_date = COALESCE($9, expected_delivery_date),
                status = COALESCE($10, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.vendor_name.as_deref())
        .bind(payload.vendor_email.as_deref())
        .bind(items)
        .bind(totals.map(|t| t.subtotal))
        .bind(totals.map(|t| t.tax))
        .bind(totals.map(|t| t.total_amount))
        .bind(payload.notes.as_deref())
        .bind(payload.expected_delivery_date)
        .bind(payload.status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(po)
    }

    pub async fn set_status(
        &self,
        id: Uuid,
        status: PurchaseOrderStatus,
        approved_by: Option<Uuid>,
    ) -> Result<Option<PurchaseOrder>, AppError> {
        let po = sqlx::query_as::<_, PurchaseOrder>(
            r#"
            UPDATE purchase_orders SET
                status = $2,
                approved_by = COALESCE($3, approved_by),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(approved_by)
        .fetch_optional(&self.pool)
        .await?;
        Ok(po)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM purchase_orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn format_po_number(seq: i64) -> String {
    format!("PO-{seq:06}")
}

#[cfg(test)]
mod tests {
    use super::format_po_number;

    #[test]
    fn po_numbers_are_zero_padded() {
        assert_eq!(format_po_number(1), "PO-000001");
        assert_eq!(format_po_number(42), "PO-000042");
        assert_eq!(format_po_number(1_234_567), "PO-1234567");
    }
}
