// src/handlers/prices.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, validation::validate_positive},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::pricing::{CurrentPrice, DailyPrice, WasteCategory},
};

// ---
// Payload: CreatePrice
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePricePayload {
    pub dropping_point_id: Uuid,

    pub category: WasteCategory,

    #[validate(custom(function = "validate_positive"))]
    #[schema(example = "50.00")]
    pub price: Decimal,
}

// POST /api/daily-price (staff)
// A segunda submissão do mesmo dia sobrescreve a primeira (upsert).
#[utoipa::path(
    post,
    path = "/api/daily-price",
    tag = "DailyPrices",
    request_body = CreatePricePayload,
    responses(
        (status = 201, description = "Preço do dia registrado", body = DailyPrice),
        (status = 400, description = "Preço inválido"),
        (status = 404, description = "Ponto de entrega não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_price(
    State(app_state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Json(payload): Json<CreatePricePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let price = app_state
        .price_service
        .set_price(&actor, payload.dropping_point_id, payload.category, payload.price)
        .await?;

    Ok((StatusCode::CREATED, Json(price)))
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct CurrentPricesQuery {
    pub dropping_point_id: Option<Uuid>,
}

// GET /api/daily-price?droppingPointId=...
// Janela de 7 dias: categoria sem linha recente fica de fora da resposta
// ("preço não definido"), mesmo que exista linha antiga.
#[utoipa::path(
    get,
    path = "/api/daily-price",
    tag = "DailyPrices",
    params(CurrentPricesQuery),
    responses(
        (status = 200, description = "Preços correntes na ordem fixa de categorias", body = [CurrentPrice])
    ),
    security(("api_jwt" = []))
)]
pub async fn get_current_prices(
    State(app_state): State<AppState>,
    AuthenticatedUser(_actor): AuthenticatedUser,
    Query(query): Query<CurrentPricesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let prices = app_state
        .price_service
        .current_prices(query.dropping_point_id)
        .await?;

    Ok((StatusCode::OK, Json(prices)))
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PriceHistoryQuery {
    pub dropping_point_id: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

// GET /api/daily-price/history: série completa, linhas antigas incluídas.
#[utoipa::path(
    get,
    path = "/api/daily-price/history",
    tag = "DailyPrices",
    params(PriceHistoryQuery),
    responses(
        (status = 200, description = "Histórico de preços, mais recente primeiro", body = [DailyPrice])
    ),
    security(("api_jwt" = []))
)]
pub async fn get_price_history(
    State(app_state): State<AppState>,
    AuthenticatedUser(_actor): AuthenticatedUser,
    Query(query): Query<PriceHistoryQuery>,
) -> Result<impl IntoResponse, AppError> {
    let prices = app_state
        .price_service
        .price_history(query.dropping_point_id, query.from, query.to)
        .await?;

    Ok((StatusCode::OK, Json(prices)))
}

// DELETE /api/daily-price/{id} (staff)
#[utoipa::path(
    delete,
    path = "/api/daily-price/{id}",
    tag = "DailyPrices",
    params(("id" = Uuid, Path, description = "ID da linha de preço")),
    responses(
        (status = 204, description = "Preço removido"),
        (status = 404, description = "Preço não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_price(
    State(app_state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.price_service.delete_price(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_prices() {
        let payload = CreatePricePayload {
            dropping_point_id: Uuid::new_v4(),
            category: WasteCategory::Heavy,
            price: Decimal::ZERO,
        };
        assert!(payload.validate().is_err());

        let payload = CreatePricePayload {
            dropping_point_id: Uuid::new_v4(),
            category: WasteCategory::Heavy,
            price: Decimal::from(-5),
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn accepts_positive_prices() {
        let payload = CreatePricePayload {
            dropping_point_id: Uuid::new_v4(),
            category: WasteCategory::Cast,
            price: Decimal::new(5550, 2), // 55.50
        };
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn unknown_category_fails_deserialization() {
        let raw = r#"{"droppingPointId":"550e8400-e29b-41d4-a716-446655440000","category":"glass","price":10}"#;
        assert!(serde_json::from_str::<CreatePricePayload>(raw).is_err());
    }
}
