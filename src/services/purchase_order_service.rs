// src/services/purchase_order_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{PurchaseOrderRepository, purchase_order_repo::NewPurchaseOrder},
    models::{
        auth::{Actor, Role},
        purchase_order::{
            CreatePurchaseOrderPayload, PurchaseOrder, PurchaseOrderAction, PurchaseOrderQuery,
            PurchaseOrderStatus, PurchaseOrderTotals, UpdatePurchaseOrderPayload,
        },
    },
    services::project_service::ProjectService,
};

/// Regras de edição de um pedido já carregado.
pub fn check_update(actor: &Actor, po: &PurchaseOrder, payload: &UpdatePurchaseOrderPayload) -> Result<(), AppError> {
    let status_only = payload.is_status_only();
    if !status_only && po.status != PurchaseOrderStatus::Draft {
        return Err(AppError::bad_request("Only Draft POs can be edited"));
    }
    let admin = matches!(actor.role, Role::CompanyOwner | Role::SuperAdmin);
    if status_only && !admin && po.status != PurchaseOrderStatus::Draft {
        return Err(AppError::forbidden("Only Admins can change status after submission"));
    }
    Ok(())
}

#[derive(Clone)]
pub struct PurchaseOrderService {
    repo: PurchaseOrderRepository,
    project_service: ProjectService,
}

impl PurchaseOrderService {
    pub fn new(repo: PurchaseOrderRepository, project_service: ProjectService) -> Self {
        Self { repo, project_service }
    }

    pub async fn create(&self, actor: &Actor, payload: &CreatePurchaseOrderPayload) -> Result<PurchaseOrder, AppError> {
        if matches!(actor.role, Role::Client | Role::Worker) {
            return Err(AppError::forbidden("Not authorized to create Purchase Orders"));
        }
        let project_id = payload
            .project_id
            .ok_or_else(|| AppError::bad_request("Project ID is required"))?;
        let project = self.project_service.load_visible(actor, project_id).await?;

        let mut items = payload.items.clone();
        let totals = PurchaseOrderTotals::compute(&mut items)?;

        let po = self
            .repo
            .create(NewPurchaseOrder {
                company_id: project.company_id,
                project_id: project.id,
                created_by: actor.id,
                vendor_name: &payload.vendor_name,
                vendor_email: &payload.vendor_email,
                items,
                totals,
                status: PurchaseOrderStatus::initial_for(actor.role),
                notes: payload.notes.as_deref(),
                expected_delivery_date: payload.expected_delivery_date,
            })
            .await?;

        tracing::info!(po_number = %po.po_number, status = ?po.status, "pedido de compra criado");
        Ok(po)
    }

    /// Encarregado só vê os próprios pedidos.
    pub async fn list(&self, actor: &Actor, query: &PurchaseOrderQuery) -> Result<Vec<PurchaseOrder>, AppError> {
        let created_by = (actor.role == Role::Foreman).then_some(actor.id);
        self.repo.list(actor.tenant_scope(), created_by, query).await
    }

    pub async fn get(&self, actor: &Actor, id: Uuid) -> Result<PurchaseOrder, AppError> {
        let po = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Purchase Order"))?;
        actor.ensure_tenant(po.company_id, "Purchase Order")?;
        Ok(po)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: Uuid,
        payload: &UpdatePurchaseOrderPayload,
    ) -> Result<PurchaseOrder, AppError> {
        let po = self.get(actor, id).await?;
        check_update(actor, &po, payload)?;

        let items = payload
            .items
            .clone()
            .map(|mut items| -> Result<_, AppError> {
                let totals = PurchaseOrderTotals::compute(&mut items)?;
                Ok((items, totals))
            })
            .transpose()?;
        self.repo
            .update(id, payload, items)
            .await?
            .ok_or_else(|| AppError::not_found("Purchase Order"))
    }

    pub async fn transition(&self, actor: &Actor, id: Uuid, action: PurchaseOrderAction) -> Result<PurchaseOrder, AppError> {
        if !matches!(actor.role, Role::CompanyOwner | Role::Pm | Role::SuperAdmin) {
            return Err(AppError::forbidden("Only Admin/PM can perform this action"));
        }
        self.get(actor, id).await?;

        let approved_by = (action == PurchaseOrderAction::Approve).then_some(actor.id);
        let po = self
            .repo
            .set_status(id, action.target_status(), approved_by)
            .await?
            .ok_or_else(|| AppError::not_found("Purchase Order"))?;

        tracing::info!(po_number = %po.po_number, status = ?po.status, "status do pedido alterado");
        Ok(po)
    }

    pub async fn delete(&self, actor: &Actor, id: Uuid) -> Result<(), AppError> {
        let po = self.get(actor, id).await?;
        if !po.deletable_by(actor.id, actor.role) {
            return Err(AppError::forbidden("Not authorized to delete this Purchase Order"));
        }
        self.repo.delete(id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use sqlx::types::Json;

    fn actor(role: Role) -> Actor {
        Actor { id: Uuid::new_v4(), role, company_id: Uuid::new_v4() }
    }

    fn po(status: PurchaseOrderStatus, created_by: Uuid) -> PurchaseOrder {
        PurchaseOrder {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            po_number: "PO-000001".into(),
            project_id: Uuid::new_v4(),
            vendor_name: "Casa do Construtor".into(),
            vendor_email: "vendas@casa.com".into(),
            created_by,
            items: Json(Vec::new()),
            subtotal: Decimal::ZERO,
            tax: Decimal::ZERO,
            total_amount: Decimal::ZERO,
            status,
            notes: None,
            expected_delivery_date: None,
            approved_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn content_change() -> UpdatePurchaseOrderPayload {
        UpdatePurchaseOrderPayload { notes: Some("urgente".into()), ..Default::default() }
    }

    fn status_change() -> UpdatePurchaseOrderPayload {
        UpdatePurchaseOrderPayload { status: Some(PurchaseOrderStatus::PendingApproval), ..Default::default() }
    }

    #[test]
    fn content_edits_only_while_draft() {
        let foreman = actor(Role::Foreman);
        assert!(check_update(&foreman, &po(PurchaseOrderStatus::Draft, foreman.id), &content_change()).is_ok());

        let err = check_update(&foreman, &po(PurchaseOrderStatus::Approved, foreman.id), &content_change()).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m == "Only Draft POs can be edited"));
    }

    #[test]
    fn status_after_submission_needs_owner() {
        let pm = actor(Role::Pm);
        let submitted = po(PurchaseOrderStatus::PendingApproval, pm.id);
        let err = check_update(&pm, &submitted, &status_change()).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let owner = actor(Role::CompanyOwner);
        assert!(check_update(&owner, &submitted, &status_change()).is_ok());

        // Rascunho: o autor pode submeter
        let foreman = actor(Role::Foreman);
        assert!(check_update(&foreman, &po(PurchaseOrderStatus::Draft, foreman.id), &status_change()).is_ok());
    }

    #[test]
    fn deletion_rules() {
        let foreman = actor(Role::Foreman);
        assert!(po(PurchaseOrderStatus::Draft, foreman.id).deletable_by(foreman.id, foreman.role));
        assert!(!po(PurchaseOrderStatus::Sent, foreman.id).deletable_by(foreman.id, foreman.role));
        assert!(!po(PurchaseOrderStatus::Draft, Uuid::new_v4()).deletable_by(foreman.id, foreman.role));
        assert!(po(PurchaseOrderStatus::Sent, foreman.id).deletable_by(Uuid::new_v4(), Role::Pm));
    }
}
