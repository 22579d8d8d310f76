// src/models/daily_log.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::visibility::filter::{Field, Filterable};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Weather {
    #[schema(example = "Ensolarado")]
    pub status: Option<String>,
    #[schema(example = "28.5")]
    pub temperature: Option<Decimal>,
}

/// Efetivo do dia por função.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManpowerEntry {
    #[validate(length(min = 1, message = "Manpower role is required."))]
    #[schema(example = "Pedreiro")]
    pub role: String,
    #[validate(range(min = 0, message = "Manpower count must not be negative."))]
    pub count: i32,
    #[serde(default)]
    pub hours: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyLog {
    pub id: Uuid,
    pub company_id: Uuid,
    pub project_id: Uuid,
    #[schema(value_type = String, format = Date)]
    pub log_date: NaiveDate,
    #[schema(value_type = Option<Weather>)]
    pub weather: Option<Json<Weather>>,
    #[schema(value_type = Vec<ManpowerEntry>)]
    pub manpower: Json<Vec<ManpowerEntry>>,
    pub work_performed: String,
    pub materials_received: Vec<String>,
    pub equipment_used: Vec<String>,
    pub safety_observations: Option<String>,
    pub delays: Option<String>,
    pub visitors: Vec<String>,
    pub reported_by: Uuid,
    pub is_verified: bool,
    pub verified_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DailyLog {
    pub fn total_workers(&self) -> i64 {
        self.manpower.iter().map(|entry| i64::from(entry.count)).sum()
    }
}

impl Filterable for DailyLog {
    fn field_values(&self, field: Field) -> Vec<Uuid> {
        match field {
            Field::Id => vec![self.id],
            Field::CompanyId => vec![self.company_id],
            Field::ProjectId => vec![self.project_id],
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDailyLogPayload {
    pub project_id: Option<Uuid>,
    /// Padrão: hoje.
    #[schema(value_type = Option<String>, format = Date)]
    pub log_date: Option<NaiveDate>,
    pub weather: Option<Weather>,
    #[validate(nested)]
    #[serde(default)]
    pub manpower: Vec<ManpowerEntry>,
    #[validate(length(min = 1, message = "Work performed is required."))]
    pub work_performed: String,
    #[serde(default)]
    pub materials_received: Vec<String>,
    #[serde(default)]
    pub equipment_used: Vec<String>,
    pub safety_observations: Option<String>,
    pub delays: Option<String>,
    #[serde(default)]
    pub visitors: Vec<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DailyLogQuery {
    pub project_id: Option<Uuid>,
    /// Diários de um único dia.
    pub date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_requires_the_work_performed() {
        let payload: CreateDailyLogPayload = serde_json::from_str(
            r#"{"projectId":null,"workPerformed":"","manpower":[{"role":"Pedreiro","count":4}]}"#,
        )
        .unwrap();
        assert!(payload.validate().is_err());
        assert!(payload.materials_received.is_empty());
        assert_eq!(payload.manpower[0].hours, Decimal::ZERO);
    }

    #[test]
    fn negative_manpower_is_invalid() {
        let payload: CreateDailyLogPayload = serde_json::from_str(
            r#"{"workPerformed":"Forma da laje","manpower":[{"role":"Servente","count":-2}]}"#,
        )
        .unwrap();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn weather_is_optional_and_camel_cased() {
        let payload: CreateDailyLogPayload = serde_json::from_str(
            r#"{"workPerformed":"Alvenaria","weather":{"status":"Chuva","temperature":19.5},"logDate":"2025-04-02"}"#,
        )
        .unwrap();
        assert!(payload.validate().is_ok());
        assert_eq!(payload.log_date, NaiveDate::from_ymd_opt(2025, 4, 2));
        assert_eq!(payload.weather.and_then(|w| w.status).as_deref(), Some("Chuva"));
    }
}
