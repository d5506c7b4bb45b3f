// src/services/point_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::PointRepository,
    models::{auth::CurrentUser, pricing::DroppingPoint},
    services::policy,
};

#[derive(Clone)]
pub struct PointService {
    point_repo: PointRepository,
}

impl PointService {
    pub fn new(point_repo: PointRepository) -> Self {
        Self { point_repo }
    }

    // Pontos de entrega são criados por staff.
    pub async fn create_point(
        &self,
        actor: &CurrentUser,
        location_name: &str,
        address: &str,
    ) -> Result<DroppingPoint, AppError> {
        policy::ensure_staff(actor)?;
        self.point_repo.create(location_name, address, actor.id).await
    }

    pub async fn list_points(&self) -> Result<Vec<DroppingPoint>, AppError> {
        self.point_repo.list().await
    }

    pub async fn get_point(&self, id: Uuid) -> Result<DroppingPoint, AppError> {
        self.point_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::PointNotFound)
    }

    pub async fn update_point(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        location_name: &str,
        address: &str,
    ) -> Result<DroppingPoint, AppError> {
        policy::ensure_staff(actor)?;
        self.point_repo
            .update(id, location_name, address)
            .await?
            .ok_or(AppError::PointNotFound)
    }
}
