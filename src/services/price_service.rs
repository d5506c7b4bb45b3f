// src/services/price_service.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::{error::AppError, validation::validate_positive},
    db::{PointRepository, PriceRepository},
    models::{
        auth::CurrentUser,
        pricing::{CurrentPrice, DailyPrice, WasteCategory},
    },
    services::policy,
};

#[derive(Clone)]
pub struct PriceService {
    price_repo: PriceRepository,
    point_repo: PointRepository,
}

impl PriceService {
    pub fn new(price_repo: PriceRepository, point_repo: PointRepository) -> Self {
        Self {
            price_repo,
            point_repo,
        }
    }

    // Registra o preço do dia para (ponto, categoria). A segunda chamada no
    // mesmo dia sobrescreve a primeira (upsert); dias anteriores permanecem
    // intactos na série histórica.
    pub async fn set_price(
        &self,
        actor: &CurrentUser,
        dropping_point_id: Uuid,
        category: WasteCategory,
        price: Decimal,
    ) -> Result<DailyPrice, AppError> {
        policy::ensure_staff(actor)?;

        ensure_positive_price(&price)?;

        if !self.point_repo.exists(dropping_point_id).await? {
            return Err(AppError::PointNotFound);
        }

        self.price_repo
            .upsert_price(dropping_point_id, category, price, actor.id)
            .await
    }

    // Preços correntes: por (ponto, categoria), a linha vencedora da janela de
    // 7 dias. Categoria sem linha recente = "preço não definido".
    pub async fn current_prices(
        &self,
        dropping_point_id: Option<Uuid>,
    ) -> Result<Vec<CurrentPrice>, AppError> {
        if let Some(point_id) = dropping_point_id {
            if !self.point_repo.exists(point_id).await? {
                return Err(AppError::PointNotFound);
            }
        }
        let mut prices = self.price_repo.current_prices(dropping_point_id).await?;
        sort_for_display(&mut prices);
        Ok(prices)
    }

    // Variante estrita de resolução pontual; ausência na janela vira erro.
    pub async fn current_unit_price(
        &self,
        dropping_point_id: Uuid,
        category: WasteCategory,
    ) -> Result<DailyPrice, AppError> {
        self.price_repo
            .current_unit_price(dropping_point_id, category)
            .await?
            .ok_or(AppError::StalePrice)
    }

    // Histórico para auditoria/relatórios: isento do corte de staleness.
    pub async fn price_history(
        &self,
        dropping_point_id: Option<Uuid>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<DailyPrice>, AppError> {
        self.price_repo.history(dropping_point_id, from, to).await
    }

    pub async fn delete_price(&self, actor: &CurrentUser, id: Uuid) -> Result<(), AppError> {
        policy::ensure_staff(actor)?;
        let deleted = self.price_repo.delete(id).await?;
        if deleted == 0 {
            return Err(AppError::PriceNotFound);
        }
        Ok(())
    }
}

// Mesma regra de positividade do payload, com o erro no formato campo-a-campo.
fn ensure_positive_price(price: &Decimal) -> Result<(), AppError> {
    validate_positive(price).map_err(|error| {
        let mut errors = validator::ValidationErrors::new();
        errors.add("price", error);
        AppError::ValidationError(errors)
    })
}

// Ordem de apresentação: por ponto, e dentro do ponto a ordem fixa de
// categorias (heavy, light, cast, mixer), paridade exata com a UI.
fn sort_for_display(prices: &mut [CurrentPrice]) {
    prices.sort_by(|a, b| {
        a.location_name
            .cmp(&b.location_name)
            .then_with(|| a.category.display_rank().cmp(&b.category.display_rank()))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn price(location: &str, category: WasteCategory) -> CurrentPrice {
        CurrentPrice {
            id: Uuid::new_v4(),
            dropping_point_id: Uuid::new_v4(),
            category,
            price: Decimal::from(50),
            effective_date: Utc::now().date_naive(),
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            location_name: Some(location.to_string()),
            created_by_name: None,
        }
    }

    #[test]
    fn non_positive_prices_become_field_errors() {
        assert!(matches!(
            ensure_positive_price(&Decimal::ZERO),
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            ensure_positive_price(&Decimal::from(-5)),
            Err(AppError::ValidationError(_))
        ));
        assert!(ensure_positive_price(&Decimal::from(50)).is_ok());
    }

    #[test]
    fn categories_come_out_in_fixed_order_regardless_of_insertion() {
        let mut prices = vec![
            price("Depot A", WasteCategory::Mixer),
            price("Depot A", WasteCategory::Cast),
            price("Depot A", WasteCategory::Heavy),
            price("Depot A", WasteCategory::Light),
        ];
        sort_for_display(&mut prices);

        let categories: Vec<WasteCategory> = prices.iter().map(|p| p.category).collect();
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
    fn points_group_before_categories() {
        let mut prices = vec![
            price("Green Valley Station", WasteCategory::Heavy),
            price("City Center Collection", WasteCategory::Mixer),
            price("City Center Collection", WasteCategory::Heavy),
        ];
        sort_for_display(&mut prices);

        assert_eq!(prices[0].location_name.as_deref(), Some("City Center Collection"));
        assert_eq!(prices[0].category, WasteCategory::Heavy);
        assert_eq!(prices[1].category, WasteCategory::Mixer);
        assert_eq!(prices[2].location_name.as_deref(), Some("Green Valley Station"));
    }
}
