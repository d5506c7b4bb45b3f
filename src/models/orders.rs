// src/models/orders.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::pricing::WasteCategory;

// --- 1. Status do pedido ---
// Máquina de estados:
//   pending  -> assigned  -> completed (terminal)
//       \-> cancelled (terminal)
//   assigned -> cancelled (terminal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "order_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Assigned,
    Completed,
    Cancelled,
}

impl OrderStatus {
    // Arestas permitidas da máquina de estados. Qualquer outra combinação
    // (incluindo sair de um estado terminal) é uma transição inválida.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Assigned) | (Pending, Cancelled) | (Assigned, Completed) | (Assigned, Cancelled)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Assigned => "assigned",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- 2. Pedido de coleta ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PickupOrder {
    pub id: Uuid,
    #[schema(example = "ORD-20260830-4F3A2B")]
    pub order_id: String,
    pub vendor_id: Uuid,
    pub dropping_point_id: Uuid,
    pub category: WasteCategory,
    #[schema(example = 10)]
    pub quantity: i32,
    // Snapshot capturado na criação; mudanças de preço posteriores nunca
    // alteram pedidos existentes.
    #[schema(example = "500.00")]
    pub price: Decimal,
    pub phone_number: String,
    pub comment: Option<String>,
    // Referência opaca devolvida pelo serviço de upload; guardada verbatim.
    pub image: Option<String>,
    pub status: OrderStatus,
    pub assigned_to: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- 3. Visão de listagem/detalhe ---
// Pedido + nomes do ponto e do fornecedor, como a UI consome.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: Uuid,
    pub order_id: String,
    pub vendor_id: Uuid,
    pub dropping_point_id: Uuid,
    pub category: WasteCategory,
    pub quantity: i32,
    pub price: Decimal,
    pub phone_number: String,
    pub comment: Option<String>,
    pub image: Option<String>,
    pub status: OrderStatus,
    pub assigned_to: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub location_name: Option<String>,
    pub vendor_name: Option<String>,
}

// --- 4. Registro de conclusão ---
// Auditoria append-only, 1-para-1 com um pedido concluído.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderCompletion {
    pub id: Uuid,
    pub order_id: Uuid,
    pub completed_by: Uuid,
    pub completion_notes: Option<String>,
    pub completed_at: DateTime<Utc>,
}

// --- 5. Reconciliação ---
// Pedido com registro de conclusão mas status ainda não "completed":
// o estado intermediário que a sequência em duas chamadas pode deixar.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletionMismatch {
    pub id: Uuid,
    pub order_id: String,
    pub status: OrderStatus,
    pub completed_by: Uuid,
    pub completed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::OrderStatus::*;
    use super::*;

    #[test]
    fn pending_cannot_jump_to_completed() {
        assert!(!Pending.can_transition_to(Completed));
    }

    #[test]
    fn happy_path_edges_are_allowed() {
        assert!(Pending.can_transition_to(Assigned));
        assert!(Assigned.can_transition_to(Completed));
    }

    #[test]
    fn cancellation_is_allowed_before_completion() {
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Assigned.can_transition_to(Cancelled));
    }

    #[test]
    fn terminal_states_have_no_outgoing_edges() {
        for terminal in [Completed, Cancelled] {
            assert!(terminal.is_terminal());
            for next in [Pending, Assigned, Completed, Cancelled] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn self_transitions_are_rejected() {
        for status in [Pending, Assigned, Completed, Cancelled] {
            assert!(!status.can_transition_to(status));
        }
    }

    #[test]
    fn status_serializes_in_lowercase() {
        assert_eq!(serde_json::to_string(&Assigned).unwrap(), "\"assigned\"");
        assert_eq!(
            serde_json::from_str::<OrderStatus>("\"cancelled\"").unwrap(),
            Cancelled
        );
    }
}
