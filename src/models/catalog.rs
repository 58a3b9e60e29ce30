// src/models/catalog.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use uuid::Uuid;
use utoipa::ToSchema;

// Define qual estação (cozinha, bar) enxerga a linha do pedido
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "department", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Department {
    Kitchen,
    Bar,
    General,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    #[schema(ignore)]
    pub chefe_id: Uuid,
    #[schema(example = "Caipirinha")]
    pub name: String,
    #[schema(example = "18.90")]
    pub price: Decimal,
    pub department: Department,
    pub created_at: DateTime<Utc>,
}

// Cópia do produto no momento em que entrou na promoção
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub product_id: Uuid,
    pub name: String,
    #[serde(with = "rust_decimal::serde::str")]
    #[schema(value_type = String, example = "18.90")]
    pub price: Decimal,
    pub department: Department,
}

impl From<&Product> for ProductSnapshot {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            department: product.department,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub id: Uuid,
    #[schema(ignore)]
    pub chefe_id: Uuid,
    #[schema(example = "Combo Happy Hour")]
    pub name: String,
    #[schema(value_type = Vec<ProductSnapshot>)]
    pub products: Json<Vec<ProductSnapshot>>,
    #[schema(example = "40.00")]
    pub original_price: Decimal,
    #[schema(example = "20")]
    pub discount_percentage: Decimal,
    // Calculado uma vez na criação, não acompanha mudanças de preço
    #[schema(example = "32.00")]
    pub final_price: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
