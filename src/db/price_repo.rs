// src/db/price_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::pricing::{CurrentPrice, DailyPrice, WasteCategory},
};

#[derive(Clone)]
pub struct PriceRepository {
    pool: PgPool,
}

impl PriceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Upsert na chave (ponto, categoria, data de hoje). Submissões concorrentes
    // do mesmo dia viram last-write-wins, nunca linhas duplicadas nem erro.
    pub async fn upsert_price(
        &self,
        dropping_point_id: Uuid,
        category: WasteCategory,
        price: Decimal,
        created_by: Uuid,
    ) -> Result<DailyPrice, AppError> {
        let daily_price = sqlx::query_as::<_, DailyPrice>(
            r#"
            INSERT INTO daily_price (dropping_point_id, category, price, created_by)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (dropping_point_id, category, effective_date)
            DO UPDATE SET price = EXCLUDED.price, created_by = EXCLUDED.created_by
            RETURNING *
            "#,
        )
        .bind(dropping_point_id)
        .bind(category)
        .bind(price)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(daily_price)
    }

    // Para cada (ponto, categoria), a linha mais recente dentro da janela de
    // 7 dias; desempate por effective_date e depois created_at. Linhas mais
    // antigas que a janela são invisíveis mesmo sem substituta.
    pub async fn current_prices(
        &self,
        dropping_point_id: Option<Uuid>,
    ) -> Result<Vec<CurrentPrice>, AppError> {
        let prices = sqlx::query_as::<_, CurrentPrice>(
            r#"
            WITH latest_prices AS (
                SELECT DISTINCT ON (dp.dropping_point_id, dp.category) dp.*
                FROM daily_price dp
                WHERE ($1::uuid IS NULL OR dp.dropping_point_id = $1)
                  AND dp.effective_date >= CURRENT_DATE - INTERVAL '7 days'
                ORDER BY dp.dropping_point_id, dp.category, dp.effective_date DESC, dp.created_at DESC
            )
            SELECT
                lp.id, lp.dropping_point_id, lp.category, lp.price,
                lp.effective_date, lp.created_by, lp.created_at,
                dpp.location_name,
                u.name AS created_by_name
            FROM latest_prices lp
            LEFT JOIN dropping_point dpp ON lp.dropping_point_id = dpp.id
            LEFT JOIN users u ON lp.created_by = u.id
            ORDER BY dpp.location_name, lp.category
            "#,
        )
        .bind(dropping_point_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(prices)
    }

    // Resolução pontual usada para o snapshot de preço do pedido.
    pub async fn current_unit_price(
        &self,
        dropping_point_id: Uuid,
        category: WasteCategory,
    ) -> Result<Option<DailyPrice>, AppError> {
        let price = sqlx::query_as::<_, DailyPrice>(
            r#"
            SELECT * FROM daily_price
            WHERE dropping_point_id = $1
              AND category = $2
              AND effective_date >= CURRENT_DATE - INTERVAL '7 days'
            ORDER BY effective_date DESC, created_at DESC
            LIMIT 1
            "#,
        )
        .bind(dropping_point_id)
        .bind(category)
        .fetch_optional(&self.pool)
        .await?;
        Ok(price)
    }

    // Histórico completo (inclui linhas fora da janela), para auditoria.
    pub async fn history(
        &self,
        dropping_point_id: Option<Uuid>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<DailyPrice>, AppError> {
        let prices = sqlx::query_as::<_, DailyPrice>(
            r#"
            SELECT * FROM daily_price
            WHERE ($1::uuid IS NULL OR dropping_point_id = $1)
              AND ($2::date IS NULL OR effective_date >= $2)
              AND ($3::date IS NULL OR effective_date <= $3)
            ORDER BY effective_date DESC, created_at DESC
            "#,
        )
        .bind(dropping_point_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        Ok(prices)
    }

    // Hard delete. Pedidos guardam snapshot do preço, então apagar uma linha
    // nunca invalida pedidos históricos.
    pub async fn delete(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM daily_price WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
