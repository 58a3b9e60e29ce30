// src/models/closing.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use uuid::Uuid;
use utoipa::ToSchema;

use crate::models::catalog::Department;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTotal {
    #[schema(example = "Cartão de Crédito")]
    pub method: String,
    #[serde(with = "rust_decimal::serde::str")]
    #[schema(value_type = String, example = "1520.40")]
    pub amount: Decimal,
    pub orders: i64,
}

// Foto desnormalizada de um item cancelado no dia
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CancelledItem {
    pub order_id: Uuid,
    pub comanda_id: i32,
    pub product_id: Uuid,
    pub name: String,
    #[serde(with = "rust_decimal::serde::str")]
    #[schema(value_type = String, example = "12.00")]
    pub price: Decimal,
    pub quantity: i32,
    pub department: Department,
}

// Resultado da agregação, antes de virar registro
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClosingSummary {
    #[schema(value_type = String, format = Date, example = "2026-03-14")]
    pub closing_date: NaiveDate,
    pub total_revenue: Decimal,
    pub total_subtotal: Decimal,
    pub total_service_fee: Decimal,
    pub payment_totals: Vec<PaymentTotal>,
    pub total_customers: i64,
    pub total_completed_orders: i64,
    pub total_open_orders: i64,
    pub cancelled_items: Vec<CancelledItem>,
    pub total_cancelled_value: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyClosing {
    pub id: Uuid,
    #[schema(ignore)]
    pub chefe_id: Uuid,
    #[schema(value_type = String, format = Date, example = "2026-03-14")]
    pub closing_date: NaiveDate,
    pub closed_by_user_id: Uuid,
    pub closed_by_name: String,
    pub total_revenue: Decimal,
    #[schema(value_type = Vec<PaymentTotal>)]
    pub payment_totals: Json<Vec<PaymentTotal>>,
    pub total_service_fee: Decimal,
    pub total_customers: i64,
    pub total_completed_orders: i64,
    #[schema(value_type = Vec<CancelledItem>)]
    pub cancelled_items: Json<Vec<CancelledItem>>,
    pub total_cancelled_value: Decimal,
    pub closed_at: DateTime<Utc>,
}
