pub mod order_repo;
pub use order_repo::OrderRepository;
pub mod point_repo;
pub use point_repo::PointRepository;
pub mod price_repo;
pub use price_repo::PriceRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
