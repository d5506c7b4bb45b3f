// src/services/order_service.rs

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{OrderRepository, PointRepository, PriceRepository},
    models::{
        auth::{CurrentUser, Role},
        orders::{CompletionMismatch, OrderCompletion, OrderStatus, OrderView, PickupOrder},
        pricing::WasteCategory,
    },
    services::policy,
};

#[derive(Clone)]
pub struct OrderService {
    order_repo: OrderRepository,
    point_repo: PointRepository,
    price_repo: PriceRepository,
    pool: PgPool,
}

impl OrderService {
    pub fn new(
        order_repo: OrderRepository,
        point_repo: PointRepository,
        price_repo: PriceRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            order_repo,
            point_repo,
            price_repo,
            pool,
        }
    }

    // --- CRIAÇÃO ---
    // Toda validação acontece antes do INSERT: nunca fica um pedido
    // "pending-mas-malformado" no banco.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_order(
        &self,
        actor: &CurrentUser,
        dropping_point_id: Uuid,
        category: WasteCategory,
        quantity: i32,
        price: Option<Decimal>,
        phone_number: &str,
        comment: Option<&str>,
        image: Option<&str>,
    ) -> Result<PickupOrder, AppError> {
        if !actor.has_role(Role::Vendor) {
            return Err(AppError::Forbidden(
                "Somente fornecedores podem criar pedidos de coleta.".into(),
            ));
        }

        if !self.point_repo.exists(dropping_point_id).await? {
            return Err(AppError::PointNotFound);
        }

        // Snapshot do preço: ou o cliente manda o total já calculado, ou
        // resolvemos quantidade x preço unitário corrente agora. Mudanças de
        // preço futuras nunca recalculam este valor.
        let price = match price {
            Some(value) => value,
            None => {
                let unit = self
                    .price_repo
                    .current_unit_price(dropping_point_id, category)
                    .await?
                    .ok_or(AppError::StalePrice)?;
                unit.price * Decimal::from(quantity)
            }
        };

        let order_id = generate_order_id();

        let order = self
            .order_repo
            .create(
                &order_id,
                actor.id,
                dropping_point_id,
                category,
                quantity,
                price,
                phone_number,
                comment,
                image,
            )
            .await?;

        tracing::info!("Pedido {} criado pelo fornecedor {}", order.order_id, actor.id);
        Ok(order)
    }

    // --- TRANSIÇÃO DE STATUS ---
    // Leitura + atualização condicional: não há lock entre as duas, então o
    // UPDATE exige o status lido. Se outra transição venceu a corrida, a linha
    // não é afetada e o chamador recebe TransitionConflict.
    pub async fn transition(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        new_status: OrderStatus,
        assigned_to: Option<Uuid>,
    ) -> Result<PickupOrder, AppError> {
        let order = self
            .order_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::OrderNotFound)?;

        policy::ensure_transition(actor, order.status, new_status)?;

        // 'assigned' exige um responsável, gravado atomicamente com o status.
        let assignee = match new_status {
            OrderStatus::Assigned => Some(assigned_to.unwrap_or(actor.id)),
            _ => None,
        };

        let updated = self
            .order_repo
            .update_status_if(&self.pool, id, order.status, new_status, assignee)
            .await?
            .ok_or(AppError::TransitionConflict)?;

        tracing::info!(
            "Pedido {} transicionado {} -> {} por {}",
            updated.order_id,
            order.status,
            new_status,
            actor.id
        );
        Ok(updated)
    }

    // --- REGISTRO DE CONCLUSÃO (passo isolado) ---
    // Mantido pela compatibilidade com clientes que fazem a sequência em duas
    // chamadas (registro + transição). O descasamento que essa sequência pode
    // deixar é detectável via completion_mismatches().
    pub async fn record_completion(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        completion_notes: Option<&str>,
    ) -> Result<OrderCompletion, AppError> {
        policy::ensure_staff(actor)?;

        let order = self
            .order_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::OrderNotFound)?;

        if order.status != OrderStatus::Assigned {
            return Err(AppError::InvalidTransition {
                from: order.status,
                to: OrderStatus::Completed,
            });
        }

        self.order_repo
            .insert_completion(&self.pool, id, actor.id, completion_notes)
            .await
    }

    // --- CONCLUSÃO ATÔMICA ---
    // Registro de conclusão + transição assigned -> completed em UMA transação:
    // ou os dois efeitos acontecem, ou nenhum.
    pub async fn complete_order(
        &self,
        actor: &CurrentUser,
        id: Uuid,
        completion_notes: Option<&str>,
    ) -> Result<(PickupOrder, OrderCompletion), AppError> {
        policy::ensure_staff(actor)?;

        let mut tx = self.pool.begin().await?;

        let order = self
            .order_repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::OrderNotFound)?;

        if order.status != OrderStatus::Assigned {
            return Err(AppError::InvalidTransition {
                from: order.status,
                to: OrderStatus::Completed,
            });
        }

        let completion = self
            .order_repo
            .insert_completion(&mut *tx, id, actor.id, completion_notes)
            .await?;

        // Se outra transição venceu a corrida, o rollback desfaz o registro
        // de conclusão inserido acima.
        let updated = self
            .order_repo
            .update_status_if(&mut *tx, id, OrderStatus::Assigned, OrderStatus::Completed, None)
            .await?
            .ok_or(AppError::TransitionConflict)?;

        tx.commit().await?;

        tracing::info!("Pedido {} concluído por {}", updated.order_id, actor.id);
        Ok((updated, completion))
    }

    // --- LISTAGEM ---
    // Regra de autorização aplicada aqui, não no transporte: staff enxerga
    // tudo; fornecedor só os próprios pedidos.
    pub async fn list_orders(&self, actor: &CurrentUser) -> Result<Vec<OrderView>, AppError> {
        self.order_repo.list(policy::vendor_scope(actor)).await
    }

    pub async fn get_order(&self, actor: &CurrentUser, id: Uuid) -> Result<OrderView, AppError> {
        let order = self
            .order_repo
            .find_detail(id)
            .await?
            .ok_or(AppError::OrderNotFound)?;

        if !actor.is_staff() && order.vendor_id != actor.id {
            return Err(AppError::Forbidden(
                "Você só pode consultar seus próprios pedidos.".into(),
            ));
        }
        Ok(order)
    }

    // Leitura de reconciliação para a sequência em duas chamadas.
    pub async fn completion_mismatches(
        &self,
        actor: &CurrentUser,
    ) -> Result<Vec<CompletionMismatch>, AppError> {
        policy::ensure_staff(actor)?;
        self.order_repo.completion_mismatches().await
    }
}

// Identificador legível mostrado ao fornecedor (ex: "Order #ORD-...").
fn generate_order_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string()[..6].to_uppercase();
    format!("ORD-{}-{}", Utc::now().format("%Y%m%d"), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_id_has_readable_shape() {
        let order_id = generate_order_id();
        assert!(order_id.starts_with("ORD-"));
        // ORD- + AAAAMMDD + - + 6 hex
        assert_eq!(order_id.len(), 19);
        let suffix = order_id.rsplit('-').next().unwrap();
        assert_eq!(suffix.len(), 6);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn order_ids_do_not_repeat() {
        let a = generate_order_id();
        let b = generate_order_id();
        assert_ne!(a, b);
    }
}
