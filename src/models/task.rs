// src/models/task.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::visibility::filter::{Field, Filterable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Review,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "task_priority")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub company_id: Uuid,
    pub project_id: Uuid,
    #[schema(example = "Concretar laje do 3º andar")]
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: Vec<Uuid>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    // O código de conclusão nunca sai na resposta
    #[serde(skip_serializing, default)]
    #[schema(ignore)]
    pub completion_otp: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Concluir uma tarefa protegida exige o código correto.
    pub fn accepts_completion(&self, otp: Option<&str>) -> bool {
        match self.completion_otp.as_deref() {
            Some(expected) => otp == Some(expected),
            None => true,
        }
    }
}

impl Filterable for Task {
    fn field_values(&self, field: Field) -> Vec<Uuid> {
        match field {
            Field::Id => vec![self.id],
            Field::CompanyId => vec![self.company_id],
            Field::ProjectId => vec![self.project_id],
            Field::AssignedTo => self.assigned_to.clone(),
            Field::CreatedBy => vec![self.created_by],
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskPayload {
    pub project_id: Option<Uuid>,
    #[validate(length(min = 1, message = "Task title is required."))]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub assigned_to: Vec<Uuid>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Option<TaskPriority>,
    #[validate(length(min = 4, max = 12, message = "Completion code must have 4 to 12 characters."))]
    pub completion_otp: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskPayload {
    #[validate(length(min = 1, message = "Task title is required."))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub assigned_to: Option<Vec<Uuid>>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    /// Código informado pelo cliente ao concluir.
    pub otp: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TaskQuery {
    pub project_id: Option<Uuid>,
    pub status: Option<TaskStatus>,
    pub assigned_to: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(otp: Option<&str>) -> Task {
        let now = Utc::now();
        Task {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            title: "Laje".into(),
            description: None,
            assigned_to: vec![],
            due_date: None,
            status: TaskStatus::InProgress,
            priority: TaskPriority::Medium,
            completion_otp: otp.map(str::to_string),
            created_by: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn unprotected_task_completes_freely() {
        assert!(task(None).accepts_completion(None));
    }

    #[test]
    fn protected_task_needs_matching_code() {
        let t = task(Some("4821"));
        assert!(t.accepts_completion(Some("4821")));
        assert!(!t.accepts_completion(Some("0000")));
        assert!(!t.accepts_completion(None));
    }

    #[test]
    fn completion_code_is_not_serialized() {
        let json = serde_json::to_value(task(Some("4821"))).unwrap();
        assert!(json.get("completionOtp").is_none());
        assert_eq!(json["status"], "in_progress");
    }
}
