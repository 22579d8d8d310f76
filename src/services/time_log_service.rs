// src/services/time_log_service.rs

use uuid::Uuid;

use crate::{
    common::{error::AppError, geo},
    db::{ProjectRepository, TimeLogRepository, UserRepository, time_log_repo::NewTimeLog},
    models::{
        auth::{Actor, Role},
        time_log::{ClockInPayload, ClockOutPayload, TimeLog, TimeLogQuery, UpdateTimeLogPayload},
    },
    services::rbac_service::{CLOCK_IN_CREW, RbacService},
};

#[derive(Clone)]
pub struct TimeLogService {
    repo: TimeLogRepository,
    project_repo: ProjectRepository,
    user_repo: UserRepository,
    rbac_service: RbacService,
}

impl TimeLogService {
    pub fn new(
        repo: TimeLogRepository,
        project_repo: ProjectRepository,
        user_repo: UserRepository,
        rbac_service: RbacService,
    ) -> Self {
        Self { repo, project_repo, user_repo, rbac_service }
    }

    /// Resolve para quem o ponto é batido. Bater o ponto de outro exige CLOCK_IN_CREW.
    async fn target_user(&self, actor: &Actor, requested: Option<Uuid>) -> Result<(Uuid, Uuid), AppError> {
        let Some(user_id) = crew_member(actor, requested) else {
            return Ok((actor.id, actor.company_id));
        };
        let may_clock_crew = self.rbac_service.has_permission(actor, CLOCK_IN_CREW).await;
        ensure_crew_permission(may_clock_crew)?;

        let member_company = self.user_repo.find_by_id(user_id).await?.map(|user| user.company_id);
        let company_id = ensure_crew_member(actor, member_company)?;
        Ok((user_id, company_id))
    }

    pub async fn clock_in(&self, actor: &Actor, payload: &ClockInPayload) -> Result<TimeLog, AppError> {
        let (user_id, company_id) = self.target_user(actor, payload.user_id).await?;

        ensure_not_clocked_in(self.repo.find_open(user_id).await?.as_ref())?;

        let position = payload.position();
        let mut geofence_status = geo::GeofenceStatus::Unknown;
        if let Some(project_id) = payload.project_id {
            let project = self
                .project_repo
                .find_by_id(project_id)
                .await?
                .ok_or_else(|| AppError::not_found("Project"))?;
            actor.ensure_tenant(project.company_id, "project")?;
            geofence_status = geo::geofence_status(position, project.site(), Some(project.geofence_radius));
        }

        let log = self
            .repo
            .clock_in(NewTimeLog {
                company_id,
                user_id,
                project_id: payload.project_id,
                position,
                geofence_status,
                device_info: payload.device_info.as_deref(),
            })
            .await?;

        tracing::info!(%user_id, geofence = ?geofence_status, "ponto aberto");
        Ok(log)
    }

    pub async fn clock_out(&self, actor: &Actor, payload: &ClockOutPayload) -> Result<TimeLog, AppError> {
        let (user_id, _) = self.target_user(actor, payload.user_id).await?;
        let open = self
            .repo
            .find_open(user_id)
            .await?
            .ok_or_else(|| AppError::bad_request("User not clocked in"))?;

        let position = match (payload.latitude, payload.longitude) {
            (Some(latitude), Some(longitude)) => Some(geo::GeoPoint { latitude, longitude }),
            _ => None,
        };
        self.repo
            .clock_out(open.id, position)
            .await?
            .ok_or_else(|| AppError::bad_request("User not clocked in"))
    }

    pub async fn list(&self, actor: &Actor, query: &TimeLogQuery) -> Result<Vec<TimeLog>, AppError> {
        self.repo
            .list(actor.tenant_scope(), query.user_id, query.project_id)
            .await
    }

    /// Aprovação/ajuste pelo dono ou PM.
    pub async fn update(&self, actor: &Actor, id: Uuid, payload: &UpdateTimeLogPayload) -> Result<TimeLog, AppError> {
        actor.authorize(&[Role::CompanyOwner, Role::Pm, Role::SuperAdmin])?;
        let log = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("TimeLog"))?;
        actor.ensure_tenant(log.company_id, "time log")?;

        let clock_in = payload.clock_in.unwrap_or(log.clock_in);
        if payload.clock_out.or(log.clock_out).is_some_and(|clock_out| clock_out < clock_in) {
            return Err(AppError::bad_request("Clock out must be after clock in"));
        }

        self.repo
            .update(id, payload)
            .await?
            .ok_or_else(|| AppError::not_found("TimeLog"))
    }
}

/// Outro usuário para quem o ponto será batido; `None` quando é o próprio.
fn crew_member(actor: &Actor, requested: Option<Uuid>) -> Option<Uuid> {
    requested.filter(|user_id| *user_id != actor.id)
}

fn ensure_crew_permission(may_clock_crew: bool) -> Result<(), AppError> {
    if may_clock_crew {
        Ok(())
    } else {
        Err(AppError::forbidden("Not authorized to clock in other users"))
    }
}

/// Membro precisa existir (404) e ser do mesmo tenant (403). Devolve a empresa dele.
fn ensure_crew_member(actor: &Actor, member_company: Option<Uuid>) -> Result<Uuid, AppError> {
    let company_id = member_company.ok_or_else(|| AppError::not_found("User"))?;
    actor.ensure_tenant(company_id, "user")?;
    Ok(company_id)
}

fn ensure_not_clocked_in(open: Option<&TimeLog>) -> Result<(), AppError> {
    match open {
        Some(log) if log.is_open() => Err(AppError::bad_request("User already clocked in")),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{common::geo::GeofenceStatus, models::time_log::TimeLogStatus};
    use chrono::Utc;

    fn actor(role: Role) -> Actor {
        Actor { id: Uuid::new_v4(), role, company_id: Uuid::new_v4() }
    }

    fn open_log(user: &Actor) -> TimeLog {
        let now = Utc::now();
        TimeLog {
            id: Uuid::new_v4(),
            company_id: user.company_id,
            user_id: user.id,
            project_id: None,
            clock_in: now,
            clock_out: None,
            latitude_in: None,
            longitude_in: None,
            latitude_out: None,
            longitude_out: None,
            geofence_status: GeofenceStatus::Unknown,
            status: TimeLogStatus::Pending,
            device_info: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn second_clock_in_is_rejected() {
        let worker = actor(Role::Worker);
        assert!(ensure_not_clocked_in(None).is_ok());

        let log = open_log(&worker);
        let err = ensure_not_clocked_in(Some(&log)).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert_eq!(err.to_string(), "User already clocked in");
    }

    #[test]
    fn closed_log_does_not_block_a_new_shift() {
        let worker = actor(Role::Worker);
        let mut log = open_log(&worker);
        log.clock_out = Some(Utc::now());
        assert!(ensure_not_clocked_in(Some(&log)).is_ok());
    }

    #[test]
    fn own_id_is_not_a_crew_clock_in() {
        let foreman = actor(Role::Foreman);
        assert_eq!(crew_member(&foreman, None), None);
        assert_eq!(crew_member(&foreman, Some(foreman.id)), None);

        let other = Uuid::new_v4();
        assert_eq!(crew_member(&foreman, Some(other)), Some(other));
    }

    #[test]
    fn crew_clock_in_requires_the_permission() {
        assert!(ensure_crew_permission(true).is_ok());
        let err = ensure_crew_permission(false).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn crew_member_must_exist_in_the_same_company() {
        let foreman = actor(Role::Foreman);
        assert_eq!(ensure_crew_member(&foreman, Some(foreman.company_id)).unwrap(), foreman.company_id);

        let missing = ensure_crew_member(&foreman, None).unwrap_err();
        assert!(matches!(missing, AppError::NotFound(_)));

        let foreign = ensure_crew_member(&foreman, Some(Uuid::new_v4())).unwrap_err();
        assert!(matches!(foreign, AppError::Forbidden(_)));
    }

    #[test]
    fn super_admin_clocks_any_tenant_and_keeps_the_member_company() {
        let admin = actor(Role::SuperAdmin);
        let tenant = Uuid::new_v4();
        assert_eq!(ensure_crew_member(&admin, Some(tenant)).unwrap(), tenant);
    }
}
