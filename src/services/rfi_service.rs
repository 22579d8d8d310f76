// src/services/rfi_service.rs

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{RfiRepository, rfi_repo::RfiSlice},
    models::{
        auth::{Actor, Role},
        rfi::{CreateRfiPayload, Rfi, RfiCommentPayload, RfiQuery, RfiStats, UpdateRfiPayload},
    },
    services::project_service::ProjectService,
    visibility::{ResourceKind, VisibilityResolver},
};

const STATS_LIST_LIMIT: i64 = 5;

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Texto do comentário sem espaços nas pontas; vazio é 400.
fn comment_text(payload: &RfiCommentPayload) -> Result<&str, AppError> {
    let text = payload.text.trim();
    if text.is_empty() {
        return Err(AppError::bad_request("Comment text is required"));
    }
    Ok(text)
}

#[derive(Clone)]
pub struct RfiService {
    repo: RfiRepository,
    project_service: ProjectService,
    resolver: VisibilityResolver,
}

impl RfiService {
    pub fn new(repo: RfiRepository, project_service: ProjectService, resolver: VisibilityResolver) -> Self {
        Self { repo, project_service, resolver }
    }

    pub async fn list(&self, actor: &Actor, query: &RfiQuery) -> Result<Vec<Rfi>, AppError> {
        let filter = self
            .resolver
            .resolve(actor, ResourceKind::Rfi, query.project_id)
            .await?;
        let today = today();
        let rfis = self.repo.list(&filter, query).await?;
        Ok(rfis.into_iter().map(|rfi| rfi.with_overdue_flag(today)).collect())
    }

    /// Contadores e listas curtas do painel, dentro do alcance de quem pede.
    pub async fn stats(&self, actor: &Actor) -> Result<RfiStats, AppError> {
        let filter = self.resolver.resolve(actor, ResourceKind::Rfi, None).await?;
        let today = today();

        let stats = self.repo.counts(&filter, today).await?;
        let recent = self.repo.slice(&filter, RfiSlice::Recent, STATS_LIST_LIMIT).await?;
        let high = self.repo.slice(&filter, RfiSlice::HighPriorityOpen, STATS_LIST_LIMIT).await?;
        let overdue = self.repo.slice(&filter, RfiSlice::Overdue(today), STATS_LIST_LIMIT).await?;

        let flag = |rfis: Vec<Rfi>| -> Vec<Rfi> { rfis.into_iter().map(|r| r.with_overdue_flag(today)).collect() };
        Ok(RfiStats {
            stats,
            recent_rfis: flag(recent),
            high_priority_rfis: flag(high),
            overdue_rfis: flag(overdue),
        })
    }

    pub async fn get(&self, actor: &Actor, id: Uuid) -> Result<Rfi, AppError> {
        let rfi = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("RFI"))?;
        actor.ensure_tenant(rfi.company_id, "RFI")?;
        if !self.resolver.can_see(actor, ResourceKind::Rfi, &rfi).await? {
            return Err(AppError::forbidden("Not authorized to access this RFI"));
        }
        Ok(rfi.with_overdue_flag(today()))
    }

    pub async fn create(&self, actor: &Actor, payload: &CreateRfiPayload) -> Result<Rfi, AppError> {
        let project_id = payload
            .project_id
            .ok_or_else(|| AppError::bad_request("Project ID is required"))?;
        let project = self.project_service.load_visible(actor, project_id).await?;
        if let Some(assignee) = payload.assigned_to {
            self.project_service
                .ensure_members(project.company_id, &[assignee], "Assignee")
                .await?;
        }

        let rfi = self.repo.create(project.company_id, project.id, actor.id, payload).await?;
        tracing::info!(rfi_number = %rfi.rfi_number, project_id = %project.id, "RFI aberta");
        Ok(rfi.with_overdue_flag(today()))
    }

    pub async fn update(&self, actor: &Actor, id: Uuid, payload: &UpdateRfiPayload) -> Result<Rfi, AppError> {
        let rfi = self.get(actor, id).await?;
        if let Some(assignee) = payload.assigned_to {
            self.project_service
                .ensure_members(rfi.company_id, &[assignee], "Assignee")
                .await?;
        }

        let updated = self
            .repo
            .update(id, payload)
            .await?
            .ok_or_else(|| AppError::not_found("RFI"))?;
        tracing::debug!(rfi_id = %id, status = ?updated.status, "RFI atualizada");
        Ok(updated.with_overdue_flag(today()))
    }

    pub async fn add_comment(&self, actor: &Actor, id: Uuid, payload: &RfiCommentPayload) -> Result<Rfi, AppError> {
        let text = comment_text(payload)?;
        self.get(actor, id).await?;
        let rfi = self
            .repo
            .add_comment(id, actor.id, text)
            .await?
            .ok_or_else(|| AppError::not_found("RFI"))?;
        Ok(rfi.with_overdue_flag(today()))
    }

    pub async fn delete(&self, actor: &Actor, id: Uuid) -> Result<(), AppError> {
        actor.authorize(&[Role::CompanyOwner, Role::Pm, Role::SuperAdmin])?;
        let rfi = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("RFI"))?;
        actor.ensure_tenant(rfi.company_id, "RFI")?;
        self.repo.delete(id).await?;
        tracing::info!(rfi_number = %rfi.rfi_number, by = %actor.id, "RFI removida");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_comments_are_rejected() {
        for text in ["", "   ", "\n\t"] {
            let err = comment_text(&RfiCommentPayload { text: text.into() }).unwrap_err();
            assert_eq!(err.to_string(), "Comment text is required");
        }
    }

    #[test]
    fn comment_text_is_trimmed() {
        let payload = RfiCommentPayload { text: "  Ver prancha E-04 \n".into() };
        assert_eq!(comment_text(&payload).unwrap(), "Ver prancha E-04");
    }

    #[test]
    fn missing_text_field_defaults_to_empty() {
        let payload: RfiCommentPayload = serde_json::from_str("{}").unwrap();
        assert!(comment_text(&payload).is_err());
    }
}
