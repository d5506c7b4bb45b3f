// src/models/pricing.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- 1. Categorias de material ---
// A ordem de declaração é a ordem fixa de exibição (heavy, light, cast, mixer),
// a mesma do enum `category_type` no banco. Não é ordem alfabética.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "category_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WasteCategory {
    Heavy,
    Light,
    Cast,
    Mixer,
}

impl WasteCategory {
    // Posição na listagem de preços (paridade com a UI).
    pub fn display_rank(self) -> u8 {
        match self {
            WasteCategory::Heavy => 1,
            WasteCategory::Light => 2,
            WasteCategory::Cast => 3,
            WasteCategory::Mixer => 4,
        }
    }
}

// --- 2. Ponto de entrega ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DroppingPoint {
    pub id: Uuid,
    #[schema(example = "City Center Collection")]
    pub location_name: String,
    #[schema(example = "123 Main Street, Downtown")]
    pub address: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- 3. Preço diário ---
// Série temporal por (ponto, categoria): a linha de hoje pode ser sobrescrita,
// as linhas históricas são imutáveis e se acumulam.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyPrice {
    pub id: Uuid,
    pub dropping_point_id: Uuid,
    pub category: WasteCategory,
    #[schema(example = "50.00")]
    pub price: Decimal,
    pub effective_date: NaiveDate,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

// --- 4. Preço "corrente" ---
// Linha vencedora da janela de 7 dias, enriquecida com os nomes do ponto e do
// autor (LEFT JOIN, por isso Option).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentPrice {
    pub id: Uuid,
    pub dropping_point_id: Uuid,
    pub category: WasteCategory,
    #[schema(example = "55.00")]
    pub price: Decimal,
    pub effective_date: NaiveDate,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub location_name: Option<String>,
    pub created_by_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_order_is_heavy_light_cast_mixer() {
        let mut categories = vec![
            WasteCategory::Mixer,
            WasteCategory::Cast,
            WasteCategory::Heavy,
            WasteCategory::Light,
        ];
        categories.sort_by_key(|c| c.display_rank());
        assert_eq!(
            categories,
            [
                WasteCategory::Heavy,
                WasteCategory::Light,
                WasteCategory::Cast,
                WasteCategory::Mixer,
            ]
        );
    }

    #[test]
    fn display_rank_matches_declaration_order() {
        // O enum do banco é declarado nessa mesma ordem; ORDER BY category
        // no Postgres precisa coincidir com display_rank.
        assert_eq!(WasteCategory::Heavy.display_rank(), 1);
        assert_eq!(WasteCategory::Light.display_rank(), 2);
        assert_eq!(WasteCategory::Cast.display_rank(), 3);
        assert_eq!(WasteCategory::Mixer.display_rank(), 4);
    }

    #[test]
    fn categories_serialize_in_lowercase() {
        assert_eq!(
            serde_json::to_string(&WasteCategory::Heavy).unwrap(),
            "\"heavy\""
        );
        assert_eq!(
            serde_json::from_str::<WasteCategory>("\"mixer\"").unwrap(),
            WasteCategory::Mixer
        );
    }

    #[test]
    fn unknown_category_is_rejected() {
        assert!(serde_json::from_str::<WasteCategory>("\"plastic\"").is_err());
    }
}
