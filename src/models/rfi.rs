// src/models/rfi.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::visibility::filter::{Field, Filterable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "rfi_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RfiCategory {
    Design,
    Structural,
    Mechanical,
    Electrical,
    Civil,
    Safety,
    Material,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "rfi_priority", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RfiPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "rfi_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RfiStatus {
    Open,
    InReview,
    Answered,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RfiComment {
    pub author_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Rfi {
    pub id: Uuid,
    pub company_id: Uuid,
    pub project_id: Uuid,
    #[schema(example = "RFI-0007")]
    pub rfi_number: String,
    pub subject: String,
    pub description: String,
    pub location: Option<String>,
    pub category: RfiCategory,
    pub priority: RfiPriority,
    pub status: RfiStatus,
    pub raised_by: Uuid,
    pub assigned_to: Option<Uuid>,
    #[schema(value_type = Option<String>, format = Date)]
    pub due_date: Option<NaiveDate>,
    pub official_response: Option<String>,
    #[schema(value_type = Vec<RfiComment>)]
    pub comments: Json<Vec<RfiComment>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Calculado na leitura, não existe no banco.
    #[sqlx(skip)]
    pub is_overdue: bool,
}

impl Rfi {
    /// Vencida: tem prazo no passado e ainda não foi fechada.
    pub fn overdue_on(&self, today: NaiveDate) -> bool {
        self.status != RfiStatus::Closed && self.due_date.is_some_and(|due| due < today)
    }

    pub fn with_overdue_flag(mut self, today: NaiveDate) -> Self {
        self.is_overdue = self.overdue_on(today);
        self
    }
}

impl Filterable for Rfi {
    fn field_values(&self, field: Field) -> Vec<Uuid> {
        match field {
            Field::Id => vec![self.id],
            Field::CompanyId => vec![self.company_id],
            Field::ProjectId => vec![self.project_id],
            _ => Vec::new(),
        }
    }
}

pub fn format_rfi_number(seq: i64) -> String {
    format!("RFI-{seq:04}")
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRfiPayload {
    pub project_id: Option<Uuid>,
    #[validate(length(min = 1, message = "Subject is required."))]
    pub subject: String,
    #[validate(length(min = 1, message = "Description is required."))]
    pub description: String,
    pub location: Option<String>,
    pub category: Option<RfiCategory>,
    pub priority: Option<RfiPriority>,
    pub assigned_to: Option<Uuid>,
    #[schema(value_type = Option<String>, format = Date)]
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRfiPayload {
    #[validate(length(min = 1, message = "Subject is required."))]
    pub subject: Option<String>,
    #[validate(length(min = 1, message = "Description is required."))]
    pub description: Option<String>,
    pub location: Option<String>,
    pub category: Option<RfiCategory>,
    pub priority: Option<RfiPriority>,
    pub status: Option<RfiStatus>,
    pub assigned_to: Option<Uuid>,
    #[schema(value_type = Option<String>, format = Date)]
    pub due_date: Option<NaiveDate>,
    pub official_response: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RfiCommentPayload {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RfiQuery {
    pub project_id: Option<Uuid>,
    pub status: Option<RfiStatus>,
    pub priority: Option<RfiPriority>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RfiCounts {
    pub total: i64,
    pub open: i64,
    pub in_review: i64,
    pub answered: i64,
    pub closed: i64,
    pub overdue: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RfiStats {
    pub stats: RfiCounts,
    pub recent_rfis: Vec<Rfi>,
    pub high_priority_rfis: Vec<Rfi>,
    pub overdue_rfis: Vec<Rfi>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rfi(status: RfiStatus, due_date: Option<NaiveDate>) -> Rfi {
        let now = Utc::now();
        Rfi {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            rfi_number: format_rfi_number(1),
            subject: "Cota da viga V12".into(),
            description: "Divergência entre arquitetura e estrutura".into(),
            location: None,
            category: RfiCategory::Structural,
            priority: RfiPriority::High,
            status,
            raised_by: Uuid::new_v4(),
            assigned_to: None,
            due_date,
            official_response: None,
            comments: Json(Vec::new()),
            created_at: now,
            updated_at: now,
            is_overdue: false,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, d).unwrap()
    }

    #[test]
    fn numbers_are_zero_padded_per_company() {
        assert_eq!(format_rfi_number(1), "RFI-0001");
        assert_eq!(format_rfi_number(123), "RFI-0123");
        assert_eq!(format_rfi_number(12345), "RFI-12345");
    }

    #[test]
    fn past_due_open_rfis_are_overdue() {
        let today = day(10);
        assert!(rfi(RfiStatus::Open, Some(day(9))).with_overdue_flag(today).is_overdue);
        assert!(rfi(RfiStatus::Answered, Some(day(1))).overdue_on(today));
        assert!(!rfi(RfiStatus::Open, Some(day(10))).overdue_on(today));
        assert!(!rfi(RfiStatus::Open, None).overdue_on(today));
    }

    #[test]
    fn closed_rfis_are_never_overdue() {
        assert!(!rfi(RfiStatus::Closed, Some(day(1))).overdue_on(day(20)));
    }

    #[test]
    fn overdue_flag_is_serialized() {
        let json = serde_json::to_value(rfi(RfiStatus::Open, Some(day(1))).with_overdue_flag(day(2))).unwrap();
        assert_eq!(json["isOverdue"], true);
        assert_eq!(json["status"], "open");
        assert_eq!(json["rfiNumber"], "RFI-0001");
    }
}
