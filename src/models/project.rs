// src/models/project.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::geo::GeoPoint,
    models::job::JobStatus,
    visibility::filter::{Field, Filterable},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "project_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Planning,
    Active,
    OnHold,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub company_id: Uuid,
    #[schema(example = "Residencial Aurora")]
    pub name: String,
    pub client_id: Option<Uuid>,
    pub pm_id: Option<Uuid>,
    #[schema(value_type = Option<String>, format = Date, example = "2025-03-01")]
    pub start_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date, example = "2025-12-15")]
    pub end_date: Option<NaiveDate>,
    #[schema(example = "250000.00")]
    pub budget: Decimal,
    #[schema(example = 50)]
    pub progress: i32,
    pub status: ProjectStatus,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[schema(example = 200.0)]
    pub geofence_radius: f64,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn site(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint { latitude, longitude }),
            _ => None,
        }
    }
}

impl Filterable for Project {
    fn field_values(&self, field: Field) -> Vec<Uuid> {
        match field {
            Field::Id => vec![self.id],
            Field::CompanyId => vec![self.company_id],
            Field::ClientId => self.client_id.into_iter().collect(),
            Field::PmId => self.pm_id.into_iter().collect(),
            Field::CreatedBy => vec![self.created_by],
            _ => Vec::new(),
        }
    }
}

/// Progresso e status derivados das frentes de trabalho (jobs) da obra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct ProjectProgress {
    pub progress: i32,
    pub status: ProjectStatus,
}

impl ProjectProgress {
    pub fn from_jobs(statuses: &[JobStatus]) -> Self {
        let total = statuses.len() as i64;
        let completed = statuses
            .iter()
            .filter(|s| **s == JobStatus::Completed)
            .count() as i64;

        // round(completed / total * 100), arredondando .5 para cima
        let progress = if total == 0 {
            0
        } else {
            ((completed * 200 + total) / (2 * total)) as i32
        };

        let any_running = statuses
            .iter()
            .any(|s| matches!(s, JobStatus::Active | JobStatus::OnHold));

        let status = if progress == 100 {
            ProjectStatus::Completed
        } else if progress > 0 || any_running {
            ProjectStatus::Active
        } else {
            ProjectStatus::Planning
        };

        Self { progress, status }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectPayload {
    #[validate(length(min = 1, message = "Project name is required."))]
    #[schema(example = "Residencial Aurora")]
    pub name: String,
    pub client_id: Option<Uuid>,
    pub pm_id: Option<Uuid>,
    #[schema(value_type = Option<String>, format = Date)]
    pub start_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<NaiveDate>,
    pub budget: Option<Decimal>,
    pub address: Option<String>,
    #[validate(range(min = -90.0, max = 90.0, message = "Invalid latitude."))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "Invalid longitude."))]
    pub longitude: Option<f64>,
    #[validate(range(min = 1.0, message = "Geofence radius must be positive."))]
    pub geofence_radius: Option<f64>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectPayload {
    #[validate(length(min = 1, message = "Project name is required."))]
    pub name: Option<String>,
    pub client_id: Option<Uuid>,
    pub pm_id: Option<Uuid>,
    #[schema(value_type = Option<String>, format = Date)]
    pub start_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<NaiveDate>,
    pub budget: Option<Decimal>,
    pub status: Option<ProjectStatus>,
    pub address: Option<String>,
    #[validate(range(min = -90.0, max = 90.0, message = "Invalid latitude."))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "Invalid longitude."))]
    pub longitude: Option<f64>,
    #[validate(range(min = 1.0, message = "Geofence radius must be positive."))]
    pub geofence_radius: Option<f64>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignPmPayload {
    pub pm_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_jobs_means_planning() {
        let p = ProjectProgress::from_jobs(&[]);
        assert_eq!(p, ProjectProgress { progress: 0, status: ProjectStatus::Planning });
    }

    #[test]
    fn single_completed_job_completes_the_project() {
        let p = ProjectProgress::from_jobs(&[JobStatus::Completed]);
        assert_eq!(p, ProjectProgress { progress: 100, status: ProjectStatus::Completed });
    }

    #[test]
    fn adding_a_planning_job_halves_progress() {
        let p = ProjectProgress::from_jobs(&[JobStatus::Completed, JobStatus::Planning]);
        assert_eq!(p, ProjectProgress { progress: 50, status: ProjectStatus::Active });
    }

    #[test]
    fn running_job_activates_without_progress() {
        let p = ProjectProgress::from_jobs(&[JobStatus::OnHold, JobStatus::Planning]);
        assert_eq!(p, ProjectProgress { progress: 0, status: ProjectStatus::Active });
    }

    #[test]
    fn progress_rounds_half_up() {
        let one_of_three = ProjectProgress::from_jobs(&[
            JobStatus::Completed,
            JobStatus::Planning,
            JobStatus::Planning,
        ]);
        assert_eq!(one_of_three.progress, 33);

        let two_of_three = ProjectProgress::from_jobs(&[
            JobStatus::Completed,
            JobStatus::Completed,
            JobStatus::Planning,
        ]);
        assert_eq!(two_of_three.progress, 67);

        let mut eight = vec![JobStatus::Planning; 7];
        eight.push(JobStatus::Completed);
        assert_eq!(ProjectProgress::from_jobs(&eight).progress, 13);
    }
}
