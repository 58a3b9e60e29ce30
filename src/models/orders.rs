// src/models/orders.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use uuid::Uuid;
use utoipa::ToSchema;

use crate::models::catalog::Department;

// --- Enums ---

// Só anda para frente: Pending -> InProgress -> Completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "order_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    InProgress,
    Completed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::InProgress => "InProgress",
            OrderStatus::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ItemStatus {
    Active,
    Cancelled,
}

// --- Structs ---

// Linha embutida no pedido. Não tem ID próprio: um cancelamento parcial
// divide a linha em duas e a identidade original se perde.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: Uuid,
    #[schema(example = "Picanha na chapa")]
    pub name: String,
    #[serde(with = "rust_decimal::serde::str")]
    #[schema(value_type = String, example = "89.90")]
    pub price: Decimal,
    #[schema(example = 2)]
    pub quantity: i32,
    pub department: Department,
    pub status: ItemStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion_id: Option<Uuid>,
}

impl OrderItem {
    pub fn is_active(&self) -> bool {
        self.status == ItemStatus::Active
    }

    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    #[schema(ignore)]
    pub chefe_id: Uuid,
    #[schema(example = 42)]
    pub comanda_id: i32,
    pub customer_id: Option<Uuid>,
    pub waiter_id: Option<Uuid>,
    pub table_id: Option<Uuid>,
    pub status: OrderStatus,
    #[schema(value_type = Vec<OrderItem>)]
    pub items: Json<Vec<OrderItem>>,
    // Já inclui a taxa de serviço
    #[schema(example = "197.78")]
    pub total: Decimal,
    #[schema(example = "Pix")]
    pub payment_method: Option<String>,
    pub created_at: DateTime<Utc>,
    pub printed_at: Option<DateTime<Utc>>,
}

// Visão consolidada de uma comanda (todos os pedidos da pulseira)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComandaSummary {
    pub comanda_id: i32,
    pub orders: Vec<Order>,
    #[schema(example = "250.00")]
    pub total: Decimal,
}

// O que uma estação (cozinha/bar) enxerga de um pedido
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StationOrder {
    pub order_id: Uuid,
    pub comanda_id: i32,
    pub table_id: Option<Uuid>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}
