// src/db/photo_repo.rs

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::photo::{CreatePhotoPayload, Photo},
    visibility::RowFilter,
};

#[derive(Clone)]
pub struct PhotoRepository {
    pool: PgPool,
}

impl PhotoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, filter: &RowFilter) -> Result<Vec<Photo>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM photos");
        filter.push_where(&mut qb);
        qb.push(" ORDER BY created_at DESC");
        let photos = qb.build_query_as::<Photo>().fetch_all(&self.pool).await?;
        Ok(photos)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Photo>, AppError> {
        let photo = sqlx::query_as::<_, Photo>("SELECT * FROM photos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(photo)
    }

    pub async fn create(
        &self,
        company_id: Uuid,
        uploaded_by: Uuid,
        payload: &CreatePhotoPayload,
    ) -> Result<Photo, AppError> {
        let photo = sqlx::query_as::<_, Photo>(
            r#"
            INSERT INTO photos (company_id, project_id, task_id, uploaded_by, image_url, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(company_id)
        .bind(payload.project_id)
        .bind(payload.task_id)
        .bind(uploaded_by)
        .bind(&payload.image_url)
        .bind(payload.description.as_deref())
        .fetch_one(&self.pool)
        .await?;
        Ok(photo)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM photos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
