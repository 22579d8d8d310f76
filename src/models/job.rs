// src/models/job.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::visibility::filter::{Field, Filterable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "job_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum JobStatus {
    Planning,
    Active,
    OnHold,
    Completed,
}

// Uma frente de trabalho dentro de uma obra
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub company_id: Uuid,
    pub project_id: Uuid,
    #[schema(example = "Fundação bloco B")]
    pub name: String,
    pub location: String,
    pub description: String,
    #[schema(value_type = Option<String>, format = Date)]
    pub start_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<NaiveDate>,
    pub foreman_id: Option<Uuid>,
    pub assigned_workers: Vec<Uuid>,
    pub budget: Decimal,
    pub status: JobStatus,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Filterable for Job {
    fn field_values(&self, field: Field) -> Vec<Uuid> {
        match field {
            Field::Id => vec![self.id],
            Field::CompanyId => vec![self.company_id],
            Field::ProjectId => vec![self.project_id],
            Field::ForemanId => self.foreman_id.into_iter().collect(),
            Field::AssignedWorkers => self.assigned_workers.clone(),
            Field::CreatedBy => vec![self.created_by],
            _ => Vec::new(),
        }
    }
}

/// Vínculo de um usuário com as obras através das frentes de trabalho.
#[derive(Debug, Clone, FromRow)]
pub struct JobLink {
    pub project_id: Uuid,
    pub is_foreman: bool,
    pub is_worker: bool,
    pub is_creator: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobPayload {
    pub project_id: Option<Uuid>,
    #[validate(length(min = 1, message = "Job name is required."))]
    pub name: String,
    pub location: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub start_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<NaiveDate>,
    pub foreman_id: Option<Uuid>,
    #[serde(default)]
    pub assigned_workers: Vec<Uuid>,
    pub budget: Option<Decimal>,
    pub status: Option<JobStatus>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobPayload {
    #[validate(length(min = 1, message = "Job name is required."))]
    pub name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub start_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Option<NaiveDate>,
    pub foreman_id: Option<Uuid>,
    pub assigned_workers: Option<Vec<Uuid>>,
    pub budget: Option<Decimal>,
    pub status: Option<JobStatus>,
}

impl UpdateJobPayload {
    pub fn is_status_only(&self) -> bool {
        self.name.is_none()
            && self.location.is_none()
            && self.description.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.foreman_id.is_none()
            && self.assigned_workers.is_none()
            && self.budget.is_none()
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignForemanPayload {
    pub foreman_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignWorkersPayload {
    pub worker_ids: Vec<Uuid>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct JobQuery {
    pub project_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn on_hold_uses_a_hyphen_on_the_wire() {
        assert_eq!(serde_json::to_string(&JobStatus::OnHold).unwrap(), "\"on-hold\"");
        let parsed: JobStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(parsed, JobStatus::Completed);
    }

    #[test]
    fn status_only_update_is_detected() {
        let status = UpdateJobPayload { status: Some(JobStatus::Completed), ..Default::default() };
        assert!(status.is_status_only());
        let rename = UpdateJobPayload { name: Some("Nova frente".into()), ..Default::default() };
        assert!(!rename.is_status_only());
    }
}
