// src/services/dashboard_service.rs

use crate::{
    common::error::AppError,
    db::{DashboardRepository, dashboard_repo::DashboardScope},
    models::{auth::Actor, dashboard::DashboardStats},
    visibility::{ResourceKind, VisibilityResolver, policy},
};

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
    resolver: VisibilityResolver,
}

impl DashboardService {
    pub fn new(repo: DashboardRepository, resolver: VisibilityResolver) -> Self {
        Self { repo, resolver }
    }

    /// Números do painel, contados só sobre o que o ator enxerga.
    pub async fn stats(&self, actor: &Actor) -> Result<DashboardStats, AppError> {
        let relations = self.resolver.relations(actor).await?;
        let scope = DashboardScope {
            tenant: actor.tenant_scope(),
            projects: policy::base_filter(actor, ResourceKind::Project, &relations),
            tasks: policy::base_filter(actor, ResourceKind::Task, &relations),
            photos: policy::base_filter(actor, ResourceKind::Photo, &relations),
        };
        self.repo.stats(&scope).await
    }
}
