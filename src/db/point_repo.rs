// src/db/point_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::pricing::DroppingPoint};

#[derive(Clone)]
pub struct PointRepository {
    pool: PgPool,
}

impl PointRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        location_name: &str,
        address: &str,
        created_by: Uuid,
    ) -> Result<DroppingPoint, AppError> {
        let point = sqlx::query_as::<_, DroppingPoint>(
            r#"
            INSERT INTO dropping_point (location_name, address, created_by)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(location_name)
        .bind(address)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(point)
    }

    pub async fn list(&self) -> Result<Vec<DroppingPoint>, AppError> {
        let points = sqlx::query_as::<_, DroppingPoint>(
            "SELECT * FROM dropping_point ORDER BY location_name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(points)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<DroppingPoint>, AppError> {
        let point = sqlx::query_as::<_, DroppingPoint>("SELECT * FROM dropping_point WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(point)
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM dropping_point WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    // Edição administrativa; não mexe em preços nem pedidos já referenciados.
    pub async fn update(
        &self,
        id: Uuid,
        location_name: &str,
        address: &str,
    ) -> Result<Option<DroppingPoint>, AppError> {
        let point = sqlx::query_as::<_, DroppingPoint>(
            r#"
            UPDATE dropping_point
            SET location_name = $1, address = $2, updated_at = NOW()
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(location_name)
        .bind(address)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(point)
    }
}
