// src/db/order_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        orders::{CompletionMismatch, OrderCompletion, OrderStatus, OrderView, PickupOrder},
        pricing::WasteCategory,
    },
};

#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        order_id: &str,
        vendor_id: Uuid,
        dropping_point_id: Uuid,
        category: WasteCategory,
        quantity: i32,
        price: Decimal,
        phone_number: &str,
        comment: Option<&str>,
        image: Option<&str>,
    ) -> Result<PickupOrder, AppError> {
        let order = sqlx::query_as::<_, PickupOrder>(
            r#"
            INSERT INTO pickup_order (
                order_id, vendor_id, dropping_point_id, category,
                quantity, price, phone_number, comment, image
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(vendor_id)
        .bind(dropping_point_id)
        .bind(category)
        .bind(quantity)
        .bind(price)
        .bind(phone_number)
        .bind(comment)
        .bind(image)
        .fetch_one(&self.pool)
        .await?;
        Ok(order)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<PickupOrder>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, PickupOrder>("SELECT * FROM pickup_order WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(order)
    }

    pub async fn find_detail(&self, id: Uuid) -> Result<Option<OrderView>, AppError> {
        let order = sqlx::query_as::<_, OrderView>(
            r#"
            SELECT o.*, dpp.location_name, u.name AS vendor_name
            FROM pickup_order o
            LEFT JOIN dropping_point dpp ON o.dropping_point_id = dpp.id
            LEFT JOIN users u ON o.vendor_id = u.id
            WHERE o.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(order)
    }

    // Listagem mais recente primeiro. `vendor_filter = None` => todos os
    // pedidos (staff); `Some(id)` => apenas os do fornecedor.
    pub async fn list(&self, vendor_filter: Option<Uuid>) -> Result<Vec<OrderView>, AppError> {
        let orders = sqlx::query_as::<_, OrderView>(
            r#"
            SELECT o.*, dpp.location_name, u.name AS vendor_name
            FROM pickup_order o
            LEFT JOIN dropping_point dpp ON o.dropping_point_id = dpp.id
            LEFT JOIN users u ON o.vendor_id = u.id
            WHERE ($1::uuid IS NULL OR o.vendor_id = $1)
            ORDER BY o.created_at DESC
            "#,
        )
        .bind(vendor_filter)
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    // Atualização condicional (compare-and-swap no status anterior): de duas
    // transições concorrentes, só uma afeta a linha; a perdedora recebe None.
    pub async fn update_status_if<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        expected: OrderStatus,
        next: OrderStatus,
        assigned_to: Option<Uuid>,
    ) -> Result<Option<PickupOrder>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, PickupOrder>(
            r#"
            UPDATE pickup_order
            SET status = $1,
                assigned_to = COALESCE($2, assigned_to),
                updated_at = NOW()
            WHERE id = $3 AND status = $4
            RETURNING *
            "#,
        )
        .bind(next)
        .bind(assigned_to)
        .bind(id)
        .bind(expected)
        .fetch_optional(executor)
        .await?;
        Ok(order)
    }

    pub async fn insert_completion<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
        completed_by: Uuid,
        completion_notes: Option<&str>,
    ) -> Result<OrderCompletion, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, OrderCompletion>(
            r#"
            INSERT INTO order_completion (order_id, completed_by, completion_notes)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(completed_by)
        .bind(completion_notes)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            // UNIQUE (order_id): a conclusão é 1-para-1 com o pedido.
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::CompletionAlreadyRecorded;
                }
            }
            e.into()
        })
    }

    // Leitura de reconciliação: registro de conclusão existe, mas o status do
    // pedido ainda não é 'completed'.
    pub async fn completion_mismatches(&self) -> Result<Vec<CompletionMismatch>, AppError> {
        let mismatches = sqlx::query_as::<_, CompletionMismatch>(
            r#"
            SELECT o.id, o.order_id, o.status, oc.completed_by, oc.completed_at
            FROM pickup_order o
            JOIN order_completion oc ON oc.order_id = o.id
            WHERE o.status <> 'completed'
            ORDER BY oc.completed_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(mismatches)
    }
}
