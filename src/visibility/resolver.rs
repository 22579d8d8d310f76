// src/visibility/resolver.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{job_repo::JobRepository, project_repo::ProjectRepository},
    models::auth::{Actor, Role},
    visibility::{
        filter::{Field, Filterable, Predicate, RowFilter},
        policy::{self, ProjectAccess, Relations, ResourceKind},
    },
};

/// Monta o filtro de leitura de cada recurso para quem está chamando.
#[derive(Clone)]
pub struct VisibilityResolver {
    project_repo: ProjectRepository,
    job_repo: JobRepository,
}

impl VisibilityResolver {
    pub fn new(project_repo: ProjectRepository, job_repo: JobRepository) -> Self {
        Self { project_repo, job_repo }
    }

    pub async fn relations(&self, actor: &Actor) -> Result<Relations, AppError> {
        if !policy::needs_relations(actor.role) {
            return Ok(Relations::default());
        }

        let direct = match actor.role {
            Role::Client | Role::Pm => self.project_repo.direct_project_ids(actor).await?,
            _ => Vec::new(),
        };
        // Clientes não participam de frentes de trabalho
        let links = if actor.role == Role::Client {
            Vec::new()
        } else {
            self.job_repo.project_links(actor).await?
        };

        Ok(Relations::from_links(direct, &links))
    }

    pub async fn project_access(&self, actor: &Actor) -> Result<ProjectAccess, AppError> {
        let relations = self.relations(actor).await?;
        Ok(ProjectAccess::for_actor(actor, &relations))
    }

    /// Filtro completo para listar `kind`, opcionalmente estreitado a uma obra.
    /// Estreitar para uma obra fora do conjunto permitido é 403, nunca lista vazia.
    pub async fn resolve(
        &self,
        actor: &Actor,
        kind: ResourceKind,
        project_id: Option<Uuid>,
    ) -> Result<RowFilter, AppError> {
        let relations = self.relations(actor).await?;
        let filter = policy::base_filter(actor, kind, &relations);

        match project_id {
            Some(project_id) => {
                let access = ProjectAccess::for_actor(actor, &relations);
                self.ensure_project_visible(actor, &access, project_id).await?;
                Ok(narrow_to_project(filter, kind, project_id))
            }
            None => Ok(filter),
        }
    }

    pub async fn ensure_project_visible(
        &self,
        actor: &Actor,
        access: &ProjectAccess,
        project_id: Uuid,
    ) -> Result<(), AppError> {
        match access {
            ProjectAccess::Only(_) => check_membership(access, project_id),
            ProjectAccess::Tenant => {
                let company_id = self.project_repo.company_of(project_id).await?;
                check_tenant_project(actor, company_id)
            }
        }
    }

    /// Checagem de um único registro já carregado.
    pub async fn can_see<R: Filterable>(
        &self,
        actor: &Actor,
        kind: ResourceKind,
        row: &R,
    ) -> Result<bool, AppError> {
        let relations = self.relations(actor).await?;
        Ok(policy::base_filter(actor, kind, &relations).matches(row))
    }
}

fn check_membership(access: &ProjectAccess, project_id: Uuid) -> Result<(), AppError> {
    if access.allows(project_id) {
        Ok(())
    } else {
        Err(AppError::forbidden("Not authorized to access this project"))
    }
}

/// Papéis sem restrição de obra: a obra precisa existir (404) e ser do tenant (403).
fn check_tenant_project(actor: &Actor, company_id: Option<Uuid>) -> Result<(), AppError> {
    let company_id = company_id.ok_or_else(|| AppError::not_found("Project"))?;
    actor.ensure_tenant(company_id, "project")
}

fn narrow_to_project(filter: RowFilter, kind: ResourceKind, project_id: Uuid) -> RowFilter {
    let field = match kind {
        ResourceKind::Project => Field::Id,
        _ => Field::ProjectId,
    };
    filter.and(Predicate::Eq(field, project_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::JobLink;

    #[test]
    fn client_narrowing_to_foreign_project_is_forbidden() {
        let client = Actor { id: Uuid::new_v4(), role: Role::Client, company_id: Uuid::new_v4() };
        let mine = Uuid::new_v4();
        let relations = Relations::from_links([mine], &[]);
        let access = ProjectAccess::for_actor(&client, &relations);

        assert!(check_membership(&access, mine).is_ok());
        let err = check_membership(&access, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn owner_narrowing_to_another_company_is_forbidden() {
        let owner = Actor { id: Uuid::new_v4(), role: Role::CompanyOwner, company_id: Uuid::new_v4() };
        assert_eq!(ProjectAccess::for_actor(&owner, &Relations::default()), ProjectAccess::Tenant);

        assert!(check_tenant_project(&owner, Some(owner.company_id)).is_ok());
        let err = check_tenant_project(&owner, Some(Uuid::new_v4())).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn narrowing_to_an_unknown_project_is_not_found() {
        for role in [Role::CompanyOwner, Role::Engineer, Role::SuperAdmin] {
            let actor = Actor { id: Uuid::new_v4(), role, company_id: Uuid::new_v4() };
            let err = check_tenant_project(&actor, None).unwrap_err();
            assert!(matches!(err, AppError::NotFound(_)), "{role}");
        }
    }

    #[test]
    fn super_admin_narrows_into_any_company() {
        let admin = Actor { id: Uuid::new_v4(), role: Role::SuperAdmin, company_id: Uuid::new_v4() };
        assert!(check_tenant_project(&admin, Some(Uuid::new_v4())).is_ok());
    }

    #[test]
    fn foreman_without_jobs_cannot_narrow_anywhere() {
        let foreman = Actor { id: Uuid::new_v4(), role: Role::Foreman, company_id: Uuid::new_v4() };
        let access = ProjectAccess::for_actor(&foreman, &Relations::default());
        assert!(check_membership(&access, Uuid::new_v4()).is_err());
    }

    #[test]
    fn worker_may_narrow_to_a_staffed_project() {
        let worker = Actor { id: Uuid::new_v4(), role: Role::Worker, company_id: Uuid::new_v4() };
        let staffed = Uuid::new_v4();
        let links = [JobLink { project_id: staffed, is_foreman: false, is_worker: true, is_creator: false }];
        let access = ProjectAccess::for_actor(&worker, &Relations::from_links([], &links));
        assert!(check_membership(&access, staffed).is_ok());
    }

    #[test]
    fn narrowing_targets_the_right_column() {
        let project_id = Uuid::new_v4();
        let on_projects = narrow_to_project(RowFilter::default(), ResourceKind::Project, project_id);
        assert_eq!(on_projects.predicates, vec![Predicate::Eq(Field::Id, project_id)]);

        let on_photos = narrow_to_project(RowFilter::default(), ResourceKind::Photo, project_id);
        assert_eq!(on_photos.predicates, vec![Predicate::Eq(Field::ProjectId, project_id)]);

        for kind in [ResourceKind::Invoice, ResourceKind::DailyLog, ResourceKind::Rfi] {
            let narrowed = narrow_to_project(RowFilter::default(), kind, project_id);
            assert_eq!(narrowed.predicates, vec![Predicate::Eq(Field::ProjectId, project_id)], "{kind:?}");
        }
    }

    #[test]
    fn client_cannot_narrow_invoices_to_a_project_outside_their_set() {
        let client = Actor { id: Uuid::new_v4(), role: Role::Client, company_id: Uuid::new_v4() };
        let (mine, other) = (Uuid::new_v4(), Uuid::new_v4());
        let relations = Relations::from_links([mine], &[]);
        let access = ProjectAccess::for_actor(&client, &relations);

        assert!(check_membership(&access, mine).is_ok());
        let err = check_membership(&access, other).unwrap_err();
        assert_eq!(err.to_string(), "Not authorized to access this project");

        // Dentro do conjunto, o filtro ainda exige que a fatura seja do próprio cliente
        let filter = narrow_to_project(
            policy::base_filter(&client, ResourceKind::Invoice, &relations),
            ResourceKind::Invoice,
            mine,
        );
        assert_eq!(filter.tenant, Some(client.company_id));
        assert_eq!(
            filter.predicates,
            vec![Predicate::Eq(Field::ClientId, client.id), Predicate::Eq(Field::ProjectId, mine)]
        );
    }
}
