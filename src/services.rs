pub mod auth;
pub use auth::AuthService;
pub mod order_service;
pub use order_service::OrderService;
pub mod point_service;
pub use point_service::PointService;
pub mod policy;
pub mod price_service;
pub use price_service::PriceService;
