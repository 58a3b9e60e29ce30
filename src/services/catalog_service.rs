// src/services/catalog_service.rs

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CatalogRepository,
    models::catalog::{Department, Product, ProductSnapshot, Promotion},
    services::order_items::{apply_discount, round_cents},
};

/// Preço cheio e preço com desconto do combo, calculados uma única vez.
pub fn promotion_prices(products: &[ProductSnapshot], discount_percentage: Decimal) -> (Decimal, Decimal) {
    let original: Decimal = products.iter().map(|p| p.price).sum();
    let final_price = round_cents(apply_discount(original, discount_percentage));

    (round_cents(original), final_price)
}

#[derive(Clone)]
pub struct CatalogService {
    catalog_repo: CatalogRepository,
}

impl CatalogService {
    pub fn new(catalog_repo: CatalogRepository) -> Self {
        Self { catalog_repo }
    }

    // --- PRODUTOS ---

    pub async fn create_product(
        &self,
        chefe_id: Uuid,
        name: &str,
        price: Decimal,
        department: Department,
    ) -> Result<Product, AppError> {
        let product = self.catalog_repo
            .create_product(chefe_id, name.trim(), round_cents(price), department)
            .await?;

        tracing::info!("🍽️ Produto criado: {} ({})", product.name, product.price);
        Ok(product)
    }

    pub async fn list_products(&self, chefe_id: Uuid, department: Option<Department>) -> Result<Vec<Product>, AppError> {
        self.catalog_repo.list_products(chefe_id, department).await
    }

    pub async fn update_product(
        &self,
        chefe_id: Uuid,
        id: Uuid,
        name: Option<&str>,
        price: Option<Decimal>,
        department: Option<Department>,
    ) -> Result<Product, AppError> {
        self.catalog_repo
            .update_product(chefe_id, id, name.map(str::trim), price.map(round_cents), department)
            .await
    }

    pub async fn delete_product(&self, chefe_id: Uuid, id: Uuid) -> Result<(), AppError> {
        if !self.catalog_repo.delete_product(chefe_id, id).await? {
            return Err(AppError::ResourceNotFound("Produto".into()));
        }
        Ok(())
    }

    // --- PROMOÇÕES ---

    /// Monta o combo a partir dos produtos atuais do cardápio. Mudanças de preço
    /// posteriores não afetam a promoção.
    pub async fn create_promotion(
        &self,
        chefe_id: Uuid,
        name: &str,
        product_ids: &[Uuid],
        discount_percentage: Decimal,
    ) -> Result<Promotion, AppError> {
        let found = self.catalog_repo
            .find_products(self.catalog_repo.pool(), chefe_id, product_ids)
            .await?;

        // Mantém a ordem (e repetições) pedida pelo cliente
        let snapshots = product_ids
            .iter()
            .map(|id| {
                found
                    .iter()
                    .find(|p| p.id == *id)
                    .map(ProductSnapshot::from)
                    .ok_or_else(|| AppError::ResourceNotFound(format!("Produto {}", id)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let (original_price, final_price) = promotion_prices(&snapshots, discount_percentage);

        let promotion = self.catalog_repo
            .create_promotion(chefe_id, name.trim(), &snapshots, original_price, discount_percentage, final_price)
            .await?;

        tracing::info!(
            "🏷️ Promoção '{}' criada: {} -> {} ({}% off)",
            promotion.name, original_price, final_price, discount_percentage
        );
        Ok(promotion)
    }

    pub async fn list_promotions(&self, chefe_id: Uuid, only_active: bool) -> Result<Vec<Promotion>, AppError> {
        self.catalog_repo.list_promotions(chefe_id, only_active).await
    }

    pub async fn set_promotion_active(&self, chefe_id: Uuid, id: Uuid, is_active: bool) -> Result<Promotion, AppError> {
        self.catalog_repo.set_promotion_active(chefe_id, id, is_active).await
    }

    pub async fn delete_promotion(&self, chefe_id: Uuid, id: Uuid) -> Result<(), AppError> {
        if !self.catalog_repo.delete_promotion(chefe_id, id).await? {
            return Err(AppError::ResourceNotFound("Promoção".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(price: &str) -> ProductSnapshot {
        ProductSnapshot {
            product_id: Uuid::new_v4(),
            name: "Item".to_string(),
            price: Decimal::from_str_exact(price).unwrap(),
            department: Department::General,
        }
    }

    #[test]
    fn combo_of_forty_at_twenty_percent_costs_thirty_two() {
        let products = vec![snapshot("25.00"), snapshot("15.00")];
        let (original, final_price) = promotion_prices(&products, Decimal::from(20));

        assert_eq!(original, Decimal::from_str_exact("40.00").unwrap());
        assert_eq!(final_price, Decimal::from_str_exact("32.00").unwrap());
    }

    #[test]
    fn final_price_is_rounded_to_cents() {
        let products = vec![snapshot("10.00")];
        let (_, final_price) = promotion_prices(&products, Decimal::from_str_exact("33.33").unwrap());

        assert_eq!(final_price, Decimal::from_str_exact("6.67").unwrap());
    }
}
