pub mod auth;
pub mod orders;
pub mod points;
pub mod prices;
