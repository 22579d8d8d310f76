// src/models/time_log.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::geo::{GeoPoint, GeofenceStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "time_log_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TimeLogStatus {
    Pending,
    Approved,
    Rejected,
}

// Um registro de ponto. Sem `clock_out` = usuário está batendo ponto agora.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimeLog {
    pub id: Uuid,
    pub company_id: Uuid,
    pub user_id: Uuid,
    pub project_id: Option<Uuid>,
    pub clock_in: DateTime<Utc>,
    pub clock_out: Option<DateTime<Utc>>,
    pub latitude_in: Option<f64>,
    pub longitude_in: Option<f64>,
    pub latitude_out: Option<f64>,
    pub longitude_out: Option<f64>,
    pub geofence_status: GeofenceStatus,
    pub status: TimeLogStatus,
    pub device_info: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TimeLog {
    pub fn is_open(&self) -> bool {
        self.clock_out.is_none()
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClockInPayload {
    pub project_id: Option<Uuid>,
    #[validate(range(min = -90.0, max = 90.0, message = "Invalid latitude."))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "Invalid longitude."))]
    pub longitude: Option<f64>,
    pub device_info: Option<String>,
    /// Ponto da equipe: o encarregado bate o ponto de outro usuário.
    pub user_id: Option<Uuid>,
}

impl ClockInPayload {
    pub fn position(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint { latitude, longitude }),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClockOutPayload {
    #[validate(range(min = -90.0, max = 90.0, message = "Invalid latitude."))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "Invalid longitude."))]
    pub longitude: Option<f64>,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTimeLogPayload {
    pub status: Option<TimeLogStatus>,
    pub clock_in: Option<DateTime<Utc>>,
    pub clock_out: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TimeLogQuery {
    pub user_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
}
