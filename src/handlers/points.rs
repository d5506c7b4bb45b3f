// src/handlers/points.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::pricing::DroppingPoint,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePointPayload {
    #[validate(length(min = 1, message = "O nome do local é obrigatório."))]
    #[schema(example = "City Center Collection")]
    pub location_name: String,

    #[validate(length(min = 1, message = "O endereço é obrigatório."))]
    #[schema(example = "123 Main Street, Downtown")]
    pub address: String,
}

// POST /api/dropping-point (staff)
#[utoipa::path(
    post,
    path = "/api/dropping-point",
    tag = "DroppingPoints",
    request_body = CreatePointPayload,
    responses(
        (status = 201, description = "Ponto de entrega criado", body = DroppingPoint),
        (status = 403, description = "Exige papel de staff")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_point(
    State(app_state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Json(payload): Json<CreatePointPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let point = app_state
        .point_service
        .create_point(&actor, &payload.location_name, &payload.address)
        .await?;

    Ok((StatusCode::CREATED, Json(point)))
}

// GET /api/dropping-point
#[utoipa::path(
    get,
    path = "/api/dropping-point",
    tag = "DroppingPoints",
    responses(
        (status = 200, description = "Lista de pontos de entrega", body = [DroppingPoint])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_points(
    State(app_state): State<AppState>,
    AuthenticatedUser(_actor): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let points = app_state.point_service.list_points().await?;
    Ok((StatusCode::OK, Json(points)))
}

// GET /api/dropping-point/{id}
#[utoipa::path(
    get,
    path = "/api/dropping-point/{id}",
    tag = "DroppingPoints",
    params(("id" = Uuid, Path, description = "ID do ponto de entrega")),
    responses(
        (status = 200, description = "Ponto de entrega", body = DroppingPoint),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_point(
    State(app_state): State<AppState>,
    AuthenticatedUser(_actor): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let point = app_state.point_service.get_point(id).await?;
    Ok((StatusCode::OK, Json(point)))
}

// PUT /api/dropping-point/{id} (staff): edição administrativa
#[utoipa::path(
    put,
    path = "/api/dropping-point/{id}",
    tag = "DroppingPoints",
    params(("id" = Uuid, Path, description = "ID do ponto de entrega")),
    request_body = CreatePointPayload,
    responses(
        (status = 200, description = "Ponto atualizado", body = DroppingPoint),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_point(
    State(app_state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreatePointPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let point = app_state
        .point_service
        .update_point(&actor, id, &payload.location_name, &payload.address)
        .await?;

    Ok((StatusCode::OK, Json(point)))
}
