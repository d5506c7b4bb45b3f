// src/config.rs

use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{env, time::Duration};

use crate::{
    db::{OrderRepository, PointRepository, PriceRepository, UserRepository},
    services::{AuthService, OrderService, PointService, PriceService},
};

// O estado compartilhado, montado UMA vez por processo: os services são
// instâncias explícitas com o handle do banco injetado.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub point_service: PointService,
    pub price_service: PriceService,
    pub order_service: OrderService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let point_repo = PointRepository::new(db_pool.clone());
        let price_repo = PriceRepository::new(db_pool.clone());
        let order_repo = OrderRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo, jwt_secret, db_pool.clone());
        let point_service = PointService::new(point_repo.clone());
        let price_service = PriceService::new(price_repo.clone(), point_repo.clone());
        let order_service =
            OrderService::new(order_repo, point_repo, price_repo, db_pool.clone());

        Ok(Self {
            db_pool,
            auth_service,
            point_service,
            price_service,
            order_service,
        })
    }
}
