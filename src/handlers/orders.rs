// src/handlers/orders.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, validation::validate_positive},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        orders::{CompletionMismatch, OrderCompletion, OrderStatus, OrderView, PickupOrder},
        pricing::WasteCategory,
    },
};

// ---
// Payload: CreateOrder
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
    pub dropping_point_id: Uuid,

    pub category: WasteCategory,

    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    #[schema(example = 10)]
    pub quantity: i32,

    // Total pré-calculado pelo cliente (quantidade x preço unitário). Se
    // omitido, o servidor resolve contra o preço corrente.
    #[validate(custom(function = "validate_positive"))]
    #[schema(example = "500.00")]
    pub price: Option<Decimal>,

    #[validate(length(min = 1, message = "O telefone é obrigatório."))]
    pub phone_number: String,

    pub comment: Option<String>,

    // Referência opaca do serviço de upload; guardada verbatim.
    pub image: Option<String>,
}

// POST /api/pickup-order (fornecedor)
#[utoipa::path(
    post,
    path = "/api/pickup-order",
    tag = "PickupOrders",
    request_body = CreateOrderPayload,
    responses(
        (status = 201, description = "Pedido criado com status pending", body = PickupOrder),
        (status = 404, description = "Ponto de entrega não encontrado"),
        (status = 422, description = "Sem preço corrente para calcular o total")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_order(
    State(app_state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Json(payload): Json<CreateOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let order = app_state
        .order_service
        .create_order(
            &actor,
            payload.dropping_point_id,
            payload.category,
            payload.quantity,
            payload.price,
            &payload.phone_number,
            payload.comment.as_deref(),
            payload.image.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

// GET /api/pickup-order: staff vê tudo; fornecedor só os próprios.
#[utoipa::path(
    get,
    path = "/api/pickup-order",
    tag = "PickupOrders",
    responses(
        (status = 200, description = "Pedidos visíveis ao ator, mais recente primeiro", body = [OrderView])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_orders(
    State(app_state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let orders = app_state.order_service.list_orders(&actor).await?;
    Ok((StatusCode::OK, Json(orders)))
}

// GET /api/pickup-order/{id}
#[utoipa::path(
    get,
    path = "/api/pickup-order/{id}",
    tag = "PickupOrders",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Detalhe do pedido", body = OrderView),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_order(
    State(app_state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state.order_service.get_order(&actor, id).await?;
    Ok((StatusCode::OK, Json(order)))
}

// ---
// Payload: UpdateStatus
// ---
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusPayload {
    pub status: OrderStatus,
    // Para 'assigned': responsável pelo pedido. Default: o próprio staff.
    pub assigned_to: Option<Uuid>,
}

// PUT /api/pickup-order/{id}/status (staff)
#[utoipa::path(
    put,
    path = "/api/pickup-order/{id}/status",
    tag = "PickupOrders",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    request_body = UpdateStatusPayload,
    responses(
        (status = 200, description = "Pedido atualizado", body = PickupOrder),
        (status = 403, description = "Fornecedores não transicionam pedidos"),
        (status = 409, description = "Outra transição venceu a corrida"),
        (status = 422, description = "Transição inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_status(
    State(app_state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state
        .order_service
        .transition(&actor, id, payload.status, payload.assigned_to)
        .await?;

    Ok((StatusCode::OK, Json(order)))
}

// ---
// Payload: Conclusão
// ---
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletionPayload {
    pub completion_notes: Option<String>,
}

// POST /api/pickup-order/{id}/completion (staff)
// Passo isolado da sequência em duas chamadas: só insere o registro de
// auditoria; a transição para completed é chamada à parte.
#[utoipa::path(
    post,
    path = "/api/pickup-order/{id}/completion",
    tag = "PickupOrders",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    request_body = CompletionPayload,
    responses(
        (status = 201, description = "Registro de conclusão criado", body = OrderCompletion),
        (status = 409, description = "Pedido já possui registro de conclusão")
    ),
    security(("api_jwt" = []))
)]
pub async fn record_completion(
    State(app_state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CompletionPayload>,
) -> Result<impl IntoResponse, AppError> {
    let completion = app_state
        .order_service
        .record_completion(&actor, id, payload.completion_notes.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(completion)))
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletedOrderResponse {
    pub order: PickupOrder,
    pub completion: OrderCompletion,
}

// POST /api/pickup-order/{id}/complete (staff)
// Registro + transição em UMA transação.
#[utoipa::path(
    post,
    path = "/api/pickup-order/{id}/complete",
    tag = "PickupOrders",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    request_body = CompletionPayload,
    responses(
        (status = 200, description = "Pedido concluído atomicamente", body = CompletedOrderResponse),
        (status = 409, description = "Outra transição venceu a corrida"),
        (status = 422, description = "Pedido não está em assigned")
    ),
    security(("api_jwt" = []))
)]
pub async fn complete_order(
    State(app_state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CompletionPayload>,
) -> Result<impl IntoResponse, AppError> {
    let (order, completion) = app_state
        .order_service
        .complete_order(&actor, id, payload.completion_notes.as_deref())
        .await?;

    Ok((StatusCode::OK, Json(CompletedOrderResponse { order, completion })))
}

// GET /api/pickup-order/reconciliation (staff)
// Pedidos com registro de conclusão mas status ainda não 'completed'.
#[utoipa::path(
    get,
    path = "/api/pickup-order/reconciliation",
    tag = "PickupOrders",
    responses(
        (status = 200, description = "Descasamentos conclusão/status", body = [CompletionMismatch])
    ),
    security(("api_jwt" = []))
)]
pub async fn completion_mismatches(
    State(app_state): State<AppState>,
    AuthenticatedUser(actor): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let mismatches = app_state.order_service.completion_mismatches(&actor).await?;
    Ok((StatusCode::OK, Json(mismatches)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_payload() -> CreateOrderPayload {
        CreateOrderPayload {
            dropping_point_id: Uuid::new_v4(),
            category: WasteCategory::Heavy,
            quantity: 10,
            price: Some(Decimal::from(500)),
            phone_number: "0712345678".into(),
            comment: None,
            image: None,
        }
    }

    #[test]
    fn valid_payload_passes() {
        assert!(base_payload().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_quantity() {
        let mut payload = base_payload();
        payload.quantity = 0;
        assert!(payload.validate().is_err());
    }

    #[test]
    fn rejects_non_positive_price_when_supplied() {
        let mut payload = base_payload();
        payload.price = Some(Decimal::ZERO);
        assert!(payload.validate().is_err());
    }

    #[test]
    fn omitted_price_is_allowed() {
        let mut payload = base_payload();
        payload.price = None;
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn rejects_empty_phone_number() {
        let mut payload = base_payload();
        payload.phone_number = String::new();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn status_payload_parses_frontend_shape() {
        // A UI de staff envia { status, assigned_to } ao aprovar.
        let raw = r#"{"status":"assigned","assignedTo":"550e8400-e29b-41d4-a716-446655440000"}"#;
        let payload: UpdateStatusPayload = serde_json::from_str(raw).unwrap();
        assert_eq!(payload.status, OrderStatus::Assigned);
        assert!(payload.assigned_to.is_some());
    }
}
