// src/visibility/policy.rs

use std::collections::BTreeSet;

use uuid::Uuid;

use crate::{
    models::{
        auth::{Actor, Role},
        job::JobLink,
    },
    visibility::filter::{Field, Predicate, RowFilter},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Project,
    Job,
    Task,
    Photo,
    Invoice,
    DailyLog,
    Rfi,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 7] = [
        ResourceKind::Project,
        ResourceKind::Job,
        ResourceKind::Task,
        ResourceKind::Photo,
        ResourceKind::Invoice,
        ResourceKind::DailyLog,
        ResourceKind::Rfi,
    ];
}

/// Vínculos do usuário com as obras, carregados uma vez por requisição.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relations {
    /// CLIENT: obras em que é o cliente. PM: obras que gerencia ou criou.
    pub direct_projects: BTreeSet<Uuid>,
    pub foreman_projects: BTreeSet<Uuid>,
    pub worker_projects: BTreeSet<Uuid>,
    pub created_job_projects: BTreeSet<Uuid>,
}

impl Relations {
    pub fn from_links(direct: impl IntoIterator<Item = Uuid>, links: &[JobLink]) -> Self {
        let mut relations = Relations {
            direct_projects: direct.into_iter().collect(),
            ..Default::default()
        };
        for link in links {
            if link.is_foreman {
                relations.foreman_projects.insert(link.project_id);
            }
            if link.is_worker {
                relations.worker_projects.insert(link.project_id);
            }
            if link.is_creator {
                relations.created_job_projects.insert(link.project_id);
            }
        }
        relations
    }

    /// Obras alcançadas pelo PM através das frentes de trabalho.
    fn pm_job_projects(&self) -> BTreeSet<Uuid> {
        self.foreman_projects
            .union(&self.created_job_projects)
            .copied()
            .collect()
    }

    fn pm_projects(&self) -> BTreeSet<Uuid> {
        self.direct_projects
            .union(&self.pm_job_projects())
            .copied()
            .collect()
    }
}

/// Papéis cuja visibilidade depende dos vínculos com as obras.
pub fn needs_relations(role: Role) -> bool {
    matches!(role, Role::Pm | Role::Foreman | Role::Worker | Role::Client)
}

/// Conjunto de obras que o usuário pode ver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectAccess {
    /// Todas as obras do tenant (ou de todos, para o SUPER_ADMIN).
    Tenant,
    Only(BTreeSet<Uuid>),
}

impl ProjectAccess {
    pub fn for_actor(actor: &Actor, relations: &Relations) -> Self {
        match actor.role {
            Role::Client => ProjectAccess::Only(relations.direct_projects.clone()),
            Role::Pm => ProjectAccess::Only(relations.pm_projects()),
            Role::Foreman => ProjectAccess::Only(relations.foreman_projects.clone()),
            Role::Worker => ProjectAccess::Only(relations.worker_projects.clone()),
            _ => ProjectAccess::Tenant,
        }
    }

    pub fn allows(&self, project_id: Uuid) -> bool {
        match self {
            ProjectAccess::Tenant => true,
            ProjectAccess::Only(ids) => ids.contains(&project_id),
        }
    }

    pub fn predicate(&self, field: Field) -> Option<Predicate> {
        match self {
            ProjectAccess::Tenant => None,
            ProjectAccess::Only(ids) => Some(Predicate::In(field, ids.iter().copied().collect())),
        }
    }
}

fn ids(set: &BTreeSet<Uuid>) -> Vec<Uuid> {
    set.iter().copied().collect()
}

type PolicyFn = fn(&Actor, &Relations) -> Predicate;

// Papel × recurso → predicado. Combinação ausente = sem restrição além do tenant.
const POLICIES: &[(Role, ResourceKind, PolicyFn)] = &[
    // Obras
    (Role::Client, ResourceKind::Project, |a, _| Predicate::Eq(Field::ClientId, a.id)),
    (Role::Pm, ResourceKind::Project, |a, r| {
        Predicate::Any(vec![
            Predicate::Eq(Field::PmId, a.id),
            Predicate::Eq(Field::CreatedBy, a.id),
            Predicate::In(Field::Id, ids(&r.pm_job_projects())),
        ])
    }),
    (Role::Foreman, ResourceKind::Project, |_, r| Predicate::In(Field::Id, ids(&r.foreman_projects))),
    (Role::Worker, ResourceKind::Project, |_, r| Predicate::In(Field::Id, ids(&r.worker_projects))),
    // Frentes de trabalho
    (Role::Pm, ResourceKind::Job, |a, r| {
        Predicate::Any(vec![
            Predicate::In(Field::ProjectId, ids(&r.pm_projects())),
            Predicate::Eq(Field::CreatedBy, a.id),
            Predicate::Eq(Field::ForemanId, a.id),
        ])
    }),
    (Role::Foreman, ResourceKind::Job, |a, _| Predicate::Eq(Field::ForemanId, a.id)),
    (Role::Worker, ResourceKind::Job, |a, _| Predicate::Eq(Field::AssignedWorkers, a.id)),
    (Role::Client, ResourceKind::Job, |_, r| Predicate::In(Field::ProjectId, ids(&r.direct_projects))),
    // Tarefas
    (Role::Worker, ResourceKind::Task, |a, _| Predicate::Eq(Field::AssignedTo, a.id)),
    (Role::Subcontractor, ResourceKind::Task, |a, _| Predicate::Eq(Field::AssignedTo, a.id)),
    (Role::Foreman, ResourceKind::Task, |a, r| {
        Predicate::Any(vec![
            Predicate::Eq(Field::AssignedTo, a.id),
            Predicate::In(Field::ProjectId, ids(&r.foreman_projects)),
        ])
    }),
    (Role::Pm, ResourceKind::Task, |a, r| {
        Predicate::Any(vec![
            Predicate::In(Field::ProjectId, ids(&r.pm_projects())),
            Predicate::Eq(Field::CreatedBy, a.id),
        ])
    }),
    (Role::Client, ResourceKind::Task, |_, r| Predicate::In(Field::ProjectId, ids(&r.direct_projects))),
    // Fotos
    (Role::Pm, ResourceKind::Photo, |_, r| Predicate::In(Field::ProjectId, ids(&r.pm_projects()))),
    (Role::Foreman, ResourceKind::Photo, |_, r| Predicate::In(Field::ProjectId, ids(&r.foreman_projects))),
    (Role::Worker, ResourceKind::Photo, |_, r| Predicate::In(Field::ProjectId, ids(&r.worker_projects))),
    (Role::Client, ResourceKind::Photo, |_, r| Predicate::In(Field::ProjectId, ids(&r.direct_projects))),
    // Faturas: o cliente vê as emitidas contra ele
    (Role::Client, ResourceKind::Invoice, |a, _| Predicate::Eq(Field::ClientId, a.id)),
    (Role::Pm, ResourceKind::Invoice, |_, r| Predicate::In(Field::ProjectId, ids(&r.pm_projects()))),
    (Role::Foreman, ResourceKind::Invoice, |_, r| Predicate::In(Field::ProjectId, ids(&r.foreman_projects))),
    (Role::Worker, ResourceKind::Invoice, |_, r| Predicate::In(Field::ProjectId, ids(&r.worker_projects))),
    // Diários de obra
    (Role::Pm, ResourceKind::DailyLog, |_, r| Predicate::In(Field::ProjectId, ids(&r.pm_projects()))),
    (Role::Foreman, ResourceKind::DailyLog, |_, r| Predicate::In(Field::ProjectId, ids(&r.foreman_projects))),
    (Role::Worker, ResourceKind::DailyLog, |_, r| Predicate::In(Field::ProjectId, ids(&r.worker_projects))),
    (Role::Client, ResourceKind::DailyLog, |_, r| Predicate::In(Field::ProjectId, ids(&r.direct_projects))),
    // RFIs
    (Role::Pm, ResourceKind::Rfi, |_, r| Predicate::In(Field::ProjectId, ids(&r.pm_projects()))),
    (Role::Foreman, ResourceKind::Rfi, |_, r| Predicate::In(Field::ProjectId, ids(&r.foreman_projects))),
    (Role::Worker, ResourceKind::Rfi, |_, r| Predicate::In(Field::ProjectId, ids(&r.worker_projects))),
    (Role::Client, ResourceKind::Rfi, |_, r| Predicate::In(Field::ProjectId, ids(&r.direct_projects))),
];

pub fn role_predicate(actor: &Actor, kind: ResourceKind, relations: &Relations) -> Option<Predicate> {
    POLICIES
        .iter()
        .find(|(role, k, _)| *role == actor.role && *k == kind)
        .map(|(_, _, build)| build(actor, relations))
}

/// Filtro base (tenant + papel) para um tipo de recurso.
pub fn base_filter(actor: &Actor, kind: ResourceKind, relations: &Relations) -> RowFilter {
    let filter = RowFilter::for_tenant(actor.tenant_scope());
    match role_predicate(actor, kind, relations) {
        Some(predicate) => filter.and(predicate),
        None => filter,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visibility::filter::Filterable;

    struct Fixture {
        company_id: Uuid,
        id: Uuid,
        project_id: Uuid,
        client_id: Option<Uuid>,
        pm_id: Option<Uuid>,
        created_by: Uuid,
        foreman_id: Option<Uuid>,
        assigned: Vec<Uuid>,
    }

    impl Filterable for Fixture {
        fn field_values(&self, field: Field) -> Vec<Uuid> {
            match field {
                Field::Id => vec![self.id],
                Field::CompanyId => vec![self.company_id],
                Field::ProjectId => vec![self.project_id],
                Field::ClientId => self.client_id.into_iter().collect(),
                Field::PmId => self.pm_id.into_iter().collect(),
                Field::CreatedBy => vec![self.created_by],
                Field::ForemanId => self.foreman_id.into_iter().collect(),
                Field::AssignedWorkers | Field::AssignedTo => self.assigned.clone(),
                Field::TaskId => Vec::new(),
            }
        }
    }

    fn fixture(company_id: Uuid) -> Fixture {
        let id = Uuid::new_v4();
        Fixture {
            company_id,
            id,
            project_id: id,
            client_id: None,
            pm_id: None,
            created_by: Uuid::new_v4(),
            foreman_id: None,
            assigned: Vec::new(),
        }
    }

    fn actor(role: Role, company_id: Uuid) -> Actor {
        Actor { id: Uuid::new_v4(), role, company_id }
    }

    fn link(project_id: Uuid, is_foreman: bool, is_worker: bool, is_creator: bool) -> JobLink {
        JobLink { project_id, is_foreman, is_worker, is_creator }
    }

    fn visible(filter: &RowFilter, rows: &[Fixture]) -> BTreeSet<Uuid> {
        rows.iter().filter(|r| filter.matches(*r)).map(|r| r.id).collect()
    }

    #[test]
    fn worker_sees_exactly_the_projects_behind_their_jobs() {
        let tenant = Uuid::new_v4();
        let worker = actor(Role::Worker, tenant);
        let projects: Vec<Fixture> = (0..4).map(|_| fixture(tenant)).collect();
        let links = [
            link(projects[0].id, false, true, false),
            link(projects[2].id, false, true, false),
        ];
        let relations = Relations::from_links([], &links);

        let filter = base_filter(&worker, ResourceKind::Project, &relations);
        let expected: BTreeSet<Uuid> = [projects[0].id, projects[2].id].into();
        assert_eq!(visible(&filter, &projects), expected);
        assert_eq!(
            ProjectAccess::for_actor(&worker, &relations),
            ProjectAccess::Only(expected)
        );
    }

    #[test]
    fn pm_sees_created_and_foreman_projects() {
        let tenant = Uuid::new_v4();
        let pm = actor(Role::Pm, tenant);
        let mut a = fixture(tenant);
        a.created_by = pm.id;
        let b = fixture(tenant);
        let c = fixture(tenant);
        // A vem direto (created_by); B vem de uma frente em que é encarregado
        let relations = Relations::from_links([a.id], &[link(b.id, true, false, false)]);

        let filter = base_filter(&pm, ResourceKind::Project, &relations);
        let rows = [a, b, c];
        let expected: BTreeSet<Uuid> = [rows[0].id, rows[1].id].into();
        assert_eq!(visible(&filter, &rows), expected);
        assert_eq!(ProjectAccess::for_actor(&pm, &relations), ProjectAccess::Only(expected));
    }

    #[test]
    fn pm_project_set_is_deduplicated() {
        let tenant = Uuid::new_v4();
        let pm = actor(Role::Pm, tenant);
        let p = Uuid::new_v4();
        let relations = Relations::from_links([p], &[link(p, true, false, true)]);
        assert_eq!(
            ProjectAccess::for_actor(&pm, &relations),
            ProjectAccess::Only([p].into())
        );
    }

    #[test]
    fn client_sees_only_own_projects() {
        let tenant = Uuid::new_v4();
        let client = actor(Role::Client, tenant);
        let mut mine = fixture(tenant);
        mine.client_id = Some(client.id);
        let other = fixture(tenant);
        let filter = base_filter(&client, ResourceKind::Project, &Relations::default());
        let mine_id = mine.id;
        assert_eq!(visible(&filter, &[mine, other]), [mine_id].into());
    }

    #[test]
    fn super_admin_bypasses_tenant_scope() {
        let admin = actor(Role::SuperAdmin, Uuid::new_v4());
        let rows: Vec<Fixture> = (0..3).map(|_| fixture(Uuid::new_v4())).collect();
        for kind in ResourceKind::ALL {
            let filter = base_filter(&admin, kind, &Relations::default());
            assert_eq!(filter.tenant, None);
            assert_eq!(visible(&filter, &rows).len(), 3);
        }
    }

    #[test]
    fn owner_is_unrestricted_within_own_tenant_only() {
        let tenant = Uuid::new_v4();
        let owner = actor(Role::CompanyOwner, tenant);
        let rows = [fixture(tenant), fixture(tenant), fixture(Uuid::new_v4())];
        let filter = base_filter(&owner, ResourceKind::Project, &Relations::default());
        assert_eq!(visible(&filter, &rows).len(), 2);
    }

    #[test]
    fn job_rules_per_role() {
        let tenant = Uuid::new_v4();
        let foreman = actor(Role::Foreman, tenant);
        let worker = actor(Role::Worker, tenant);

        let mut led = fixture(tenant);
        led.foreman_id = Some(foreman.id);
        let mut staffed = fixture(tenant);
        staffed.assigned = vec![worker.id, Uuid::new_v4()];
        let unrelated = fixture(tenant);
        let (led_id, staffed_id) = (led.id, staffed.id);
        let rows = [led, staffed, unrelated];

        let f = base_filter(&foreman, ResourceKind::Job, &Relations::default());
        assert_eq!(visible(&f, &rows), [led_id].into());

        let w = base_filter(&worker, ResourceKind::Job, &Relations::default());
        assert_eq!(visible(&w, &rows), [staffed_id].into());
    }

    #[test]
    fn pm_jobs_include_created_and_led_ones_outside_their_projects() {
        let tenant = Uuid::new_v4();
        let pm = actor(Role::Pm, tenant);
        let managed_project = Uuid::new_v4();

        let mut in_project = fixture(tenant);
        in_project.project_id = managed_project;
        let mut created = fixture(tenant);
        created.created_by = pm.id;
        let mut led = fixture(tenant);
        led.foreman_id = Some(pm.id);
        let unrelated = fixture(tenant);
        let expected: BTreeSet<Uuid> = [in_project.id, created.id, led.id].into();

        let relations = Relations::from_links([managed_project], &[]);
        let filter = base_filter(&pm, ResourceKind::Job, &relations);
        assert_eq!(visible(&filter, &[in_project, created, led, unrelated]), expected);
    }

    #[test]
    fn task_rules_per_role() {
        let tenant = Uuid::new_v4();
        let foreman = actor(Role::Foreman, tenant);
        let sub = actor(Role::Subcontractor, tenant);
        let foreman_project = Uuid::new_v4();

        let mut assigned_to_foreman = fixture(tenant);
        assigned_to_foreman.assigned = vec![foreman.id];
        let mut in_foreman_project = fixture(tenant);
        in_foreman_project.project_id = foreman_project;
        let mut assigned_to_sub = fixture(tenant);
        assigned_to_sub.assigned = vec![sub.id];
        let ids = [assigned_to_foreman.id, in_foreman_project.id, assigned_to_sub.id];
        let rows = [assigned_to_foreman, in_foreman_project, assigned_to_sub];

        let relations = Relations::from_links([], &[link(foreman_project, true, false, false)]);
        let f = base_filter(&foreman, ResourceKind::Task, &relations);
        assert_eq!(visible(&f, &rows), [ids[0], ids[1]].into());

        let s = base_filter(&sub, ResourceKind::Task, &Relations::default());
        assert_eq!(visible(&s, &rows), [ids[2]].into());
    }

    #[test]
    fn photos_follow_the_project_set() {
        let tenant = Uuid::new_v4();
        let client = actor(Role::Client, tenant);
        let mine = Uuid::new_v4();
        let mut photo_mine = fixture(tenant);
        photo_mine.project_id = mine;
        let photo_other = fixture(tenant);
        let mine_photo_id = photo_mine.id;

        let relations = Relations::from_links([mine], &[]);
        let filter = base_filter(&client, ResourceKind::Photo, &relations);
        assert_eq!(visible(&filter, &[photo_mine, photo_other]), [mine_photo_id].into());
    }

    #[test]
    fn engineers_and_subcontractors_see_tenant_projects() {
        let tenant = Uuid::new_v4();
        for role in [Role::Engineer, Role::Subcontractor] {
            let a = actor(role, tenant);
            assert_eq!(ProjectAccess::for_actor(&a, &Relations::default()), ProjectAccess::Tenant);
            assert!(role_predicate(&a, ResourceKind::Project, &Relations::default()).is_none());
            assert!(!needs_relations(role));
        }
    }

    #[test]
    fn every_restricted_role_has_a_rule_for_every_resource() {
        let tenant = Uuid::new_v4();
        for role in [Role::Pm, Role::Foreman, Role::Worker, Role::Client] {
            let a = actor(role, tenant);
            for kind in ResourceKind::ALL {
                assert!(
                    role_predicate(&a, kind, &Relations::default()).is_some(),
                    "{role} has no rule for {kind:?}"
                );
            }
        }
    }

    #[test]
    fn client_sees_only_invoices_billed_to_them() {
        let tenant = Uuid::new_v4();
        let client = actor(Role::Client, tenant);
        let shared_project = Uuid::new_v4();

        let mut mine = fixture(tenant);
        mine.project_id = shared_project;
        mine.client_id = Some(client.id);
        // Mesma obra, mas faturada para outro cliente
        let mut someone_else = fixture(tenant);
        someone_else.project_id = shared_project;
        someone_else.client_id = Some(Uuid::new_v4());
        let mut foreign_tenant = fixture(Uuid::new_v4());
        foreign_tenant.client_id = Some(client.id);
        let mine_id = mine.id;

        let relations = Relations::from_links([shared_project], &[]);
        let filter = base_filter(&client, ResourceKind::Invoice, &relations);
        assert_eq!(visible(&filter, &[mine, someone_else, foreign_tenant]), [mine_id].into());
    }

    #[test]
    fn daily_logs_and_rfis_follow_the_project_set() {
        let tenant = Uuid::new_v4();
        let foreman = actor(Role::Foreman, tenant);
        let led = Uuid::new_v4();
        let mut on_led = fixture(tenant);
        on_led.project_id = led;
        let elsewhere = fixture(tenant);
        let on_led_id = on_led.id;
        let rows = [on_led, elsewhere];

        let relations = Relations::from_links([], &[link(led, true, false, false)]);
        for kind in [ResourceKind::DailyLog, ResourceKind::Rfi] {
            let filter = base_filter(&foreman, kind, &relations);
            assert_eq!(visible(&filter, &rows), [on_led_id].into(), "{kind:?}");
        }
    }

    #[test]
    fn engineers_see_every_rfi_in_the_tenant() {
        let tenant = Uuid::new_v4();
        let engineer = actor(Role::Engineer, tenant);
        let rows = [fixture(tenant), fixture(tenant), fixture(Uuid::new_v4())];
        let filter = base_filter(&engineer, ResourceKind::Rfi, &Relations::default());
        assert_eq!(visible(&filter, &rows).len(), 2);
    }
}
