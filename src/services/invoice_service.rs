// src/services/invoice_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{InvoiceRepository, invoice_repo::{InvoiceChanges, NewInvoice}},
    models::{
        auth::{Actor, Role},
        invoice::{
            CreateInvoicePayload, Invoice, InvoiceQuery, InvoiceStatus, UpdateInvoicePayload, compute_total,
        },
    },
    services::project_service::ProjectService,
    visibility::{ResourceKind, VisibilityResolver},
};

const BILLING_ROLES: [Role; 3] = [Role::SuperAdmin, Role::CompanyOwner, Role::Pm];

/// Cliente da fatura: o informado, senão o cliente da obra.
fn billed_client(requested: Option<Uuid>, project_client: Option<Uuid>) -> Result<Uuid, AppError> {
    requested
        .or(project_client)
        .ok_or_else(|| AppError::bad_request("Client ID is required"))
}

#[derive(Clone)]
pub struct InvoiceService {
    repo: InvoiceRepository,
    project_service: ProjectService,
    resolver: VisibilityResolver,
}

impl InvoiceService {
    pub fn new(repo: InvoiceRepository, project_service: ProjectService, resolver: VisibilityResolver) -> Self {
        Self { repo, project_service, resolver }
    }

    /// CLIENT recebe só as faturas emitidas contra ele.
    pub async fn list(&self, actor: &Actor, query: &InvoiceQuery) -> Result<Vec<Invoice>, AppError> {
        let filter = self
            .resolver
            .resolve(actor, ResourceKind::Invoice, query.project_id)
            .await?;
        self.repo.list(&filter, query.status).await
    }

    pub async fn get(&self, actor: &Actor, id: Uuid) -> Result<Invoice, AppError> {
        let invoice = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Invoice"))?;
        actor.ensure_tenant(invoice.company_id, "invoice")?;
        if !self.resolver.can_see(actor, ResourceKind::Invoice, &invoice).await? {
            return Err(AppError::forbidden("Not authorized to access this invoice"));
        }
        Ok(invoice)
    }

    pub async fn create(&self, actor: &Actor, payload: &CreateInvoicePayload) -> Result<Invoice, AppError> {
        actor.authorize(&BILLING_ROLES)?;
        let project_id = payload
            .project_id
            .ok_or_else(|| AppError::bad_request("Project ID is required"))?;
        let project = self.project_service.load_visible(actor, project_id).await?;

        let client_id = billed_client(payload.client_id, project.client_id)?;
        self.project_service
            .ensure_members(project.company_id, &[client_id], "Client")
            .await?;

        let mut items = payload.items.clone();
        let total_amount = compute_total(&mut items)?;

        let invoice = self
            .repo
            .create(NewInvoice {
                company_id: project.company_id,
                project_id: project.id,
                client_id,
                created_by: actor.id,
                invoice_number: &payload.invoice_number,
                items,
                total_amount,
                status: payload.status.unwrap_or(InvoiceStatus::Unpaid),
                due_date: payload.due_date,
            })
            .await?;

        tracing::info!(
            invoice_number = %invoice.invoice_number,
            total = %invoice.total_amount,
            by = %actor.id,
            "fatura emitida"
        );
        Ok(invoice)
    }

    pub async fn update(&self, actor: &Actor, id: Uuid, payload: &UpdateInvoicePayload) -> Result<Invoice, AppError> {
        actor.authorize(&BILLING_ROLES)?;
        let invoice = self.get(actor, id).await?;

        let items = match &payload.items {
            Some(items) => {
                let mut items = items.clone();
                let total = compute_total(&mut items)?;
                Some((items, total))
            }
            None => None,
        };
        let changes = InvoiceChanges {
            items,
            due_date: payload.due_date,
            status: payload.status,
            mark_paid: payload.marks_paid(invoice.status),
        };

        let updated = self
            .repo
            .update(id, changes)
            .await?
            .ok_or_else(|| AppError::not_found("Invoice"))?;
        tracing::info!(invoice_id = %id, status = ?updated.status, by = %actor.id, "fatura atualizada");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_client_wins_over_the_project_client() {
        let (explicit, from_project) = (Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(billed_client(Some(explicit), Some(from_project)).unwrap(), explicit);
        assert_eq!(billed_client(None, Some(from_project)).unwrap(), from_project);
    }

    #[test]
    fn invoice_without_any_client_is_a_bad_request() {
        let err = billed_client(None, None).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(err.to_string(), "Client ID is required");
    }

    #[test]
    fn only_managers_issue_invoices() {
        let company_id = Uuid::new_v4();
        for role in [Role::Foreman, Role::Worker, Role::Engineer, Role::Client, Role::Subcontractor] {
            let actor = Actor { id: Uuid::new_v4(), role, company_id };
            assert!(actor.authorize(&BILLING_ROLES).is_err(), "{role}");
        }
        let pm = Actor { id: Uuid::new_v4(), role: Role::Pm, company_id };
        assert!(pm.authorize(&BILLING_ROLES).is_ok());
    }
}
