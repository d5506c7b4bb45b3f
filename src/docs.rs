// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,
        handlers::auth::grant_role,

        // --- Dropping Points ---
        handlers::points::create_point,
        handlers::points::list_points,
        handlers::points::get_point,
        handlers::points::update_point,

        // --- Daily Prices ---
        handlers::prices::create_price,
        handlers::prices::get_current_prices,
        handlers::prices::get_price_history,
        handlers::prices::delete_price,

        // --- Pickup Orders ---
        handlers::orders::create_order,
        handlers::orders::list_orders,
        handlers::orders::get_order,
        handlers::orders::update_status,
        handlers::orders::record_completion,
        handlers::orders::complete_order,
        handlers::orders::completion_mismatches,
    ),
    components(
        schemas(
            models::auth::Role,
            models::auth::CurrentUser,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::pricing::WasteCategory,
            models::pricing::DroppingPoint,
            models::pricing::DailyPrice,
            models::pricing::CurrentPrice,
            models::orders::OrderStatus,
            models::orders::PickupOrder,
            models::orders::OrderView,
            models::orders::OrderCompletion,
            models::orders::CompletionMismatch,
            handlers::auth::GrantRolePayload,
            handlers::points::CreatePointPayload,
            handlers::prices::CreatePricePayload,
            handlers::orders::CreateOrderPayload,
            handlers::orders::UpdateStatusPayload,
            handlers::orders::CompletionPayload,
            handlers::orders::CompletedOrderResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registro, login e papéis"),
        (name = "DroppingPoints", description = "Pontos de entrega"),
        (name = "DailyPrices", description = "Preços diários com data de vigência"),
        (name = "PickupOrders", description = "Ciclo de vida dos pedidos de coleta"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_jwt",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}
