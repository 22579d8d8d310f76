// src/models/photo.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::visibility::filter::{Field, Filterable};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: Uuid,
    pub company_id: Uuid,
    pub project_id: Option<Uuid>,
    pub task_id: Option<Uuid>,
    pub uploaded_by: Uuid,
    #[schema(example = "https://cdn.obra.app/photos/laje.jpg")]
    pub image_url: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Filterable for Photo {
    fn field_values(&self, field: Field) -> Vec<Uuid> {
        match field {
            Field::Id => vec![self.id],
            Field::CompanyId => vec![self.company_id],
            Field::ProjectId => self.project_id.into_iter().collect(),
            Field::TaskId => self.task_id.into_iter().collect(),
            Field::CreatedBy => vec![self.uploaded_by],
            _ => Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePhotoPayload {
    pub project_id: Option<Uuid>,
    pub task_id: Option<Uuid>,
    #[validate(url(message = "Please provide a valid imageUrl."))]
    pub image_url: String,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PhotoQuery {
    pub project_id: Option<Uuid>,
    pub task_id: Option<Uuid>,
}
