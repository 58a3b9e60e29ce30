// src/handlers/orders.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    db::OrderFilter,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{Cashier, Floor, RequireRole, Stations},
        tenancy::TenantContext,
    },
    models::orders::{ComandaSummary, Order, OrderStatus},
    services::{
        closing_service::day_window,
        order_service::{NewOrder, RequestedLine},
    },
};

// =============================================================================
//  PAYLOADS
// =============================================================================

fn validate_not_blank(val: &str) -> Result<(), ValidationError> {
    if val.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("Informe a forma de pagamento.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLinePayload {
    pub product_id: Uuid,

    #[validate(range(min = 1, message = "A quantidade deve ser ao menos 1."))]
    #[schema(example = 2)]
    pub quantity: i32,
}

impl From<&OrderLinePayload> for RequestedLine {
    fn from(line: &OrderLinePayload) -> Self {
        RequestedLine { product_id: line.product_id, quantity: line.quantity }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
    #[validate(range(min = 1, message = "A comanda deve ser um número positivo."))]
    #[schema(example = 42)]
    pub comanda_id: i32,

    pub table_id: Option<Uuid>,

    #[validate(nested)]
    #[serde(default)]
    pub items: Vec<OrderLinePayload>,

    #[serde(default)]
    pub promotion_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddProductsPayload {
    #[validate(length(min = 1, message = "Informe ao menos um item."), nested)]
    pub items: Vec<OrderLinePayload>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CancelItemPayload {
    /// Posição da linha no array de itens
    #[schema(example = 0)]
    pub index: usize,

    #[schema(example = 1)]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromotionRefPayload {
    pub promotion_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceStatusPayload {
    pub status: OrderStatus,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CloseOrderPayload {
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "Pix")]
    pub payment_method: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
    pub comanda_id: Option<i32>,
    /// Dia local (AAAA-MM-DD)
    pub date: Option<NaiveDate>,
}

// =============================================================================
//  HANDLERS
// =============================================================================

// POST /api/orders
#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Orders",
    request_body = CreateOrderPayload,
    responses(
        (status = 201, description = "Pedido criado", body = Order),
        (status = 422, description = "Pedido sem itens ou promoção inativa")
    ),
    params(("x-chefe-id" = Option<Uuid>, Header, description = "Restaurante (só Admin)")),
    security(("api_jwt" = []))
)]
pub async fn create_order(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    tenant: TenantContext,
    _role: RequireRole<Floor>,
    Json(payload): Json<CreateOrderPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let new_order = NewOrder {
        comanda_id: payload.comanda_id,
        table_id: payload.table_id,
        lines: payload.items.iter().map(RequestedLine::from).collect(),
        promotion_ids: payload.promotion_ids,
    };

    let order = app_state.order_service
        .create_order(tenant.0, user.id, new_order)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(order)))
}

// GET /api/orders
#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "Orders",
    responses((status = 200, description = "Pedidos filtrados", body = Vec<Order>)),
    params(OrderListQuery, ("x-chefe-id" = Option<Uuid>, Header, description = "Restaurante (só Admin)")),
    security(("api_jwt" = []))
)]
pub async fn list_orders(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _role: RequireRole<Floor>,
    Query(query): Query<OrderListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (from, to) = match query.date {
        Some(date) => {
            let (start, end) = day_window(date, app_state.config.utc_offset)
                .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
            (Some(start), Some(end))
        }
        None => (None, None),
    };

    let filter = OrderFilter { status: query.status, comanda_id: query.comanda_id, from, to };
    let orders = app_state.order_service
        .list(tenant.0, &filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(orders)))
}

// GET /api/orders/{order_id}
#[utoipa::path(
    get,
    path = "/api/orders/{order_id}",
    tag = "Orders",
    responses(
        (status = 200, description = "Pedido", body = Order),
        (status = 404, description = "Pedido não encontrado")
    ),
    params(
        ("order_id" = Uuid, Path, description = "ID do pedido"),
        ("x-chefe-id" = Option<Uuid>, Header, description = "Restaurante (só Admin)")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_order(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let order = app_state.order_service
        .get(tenant.0, order_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(order)))
}

// POST /api/orders/{order_id}/items
#[utoipa::path(
    post,
    path = "/api/orders/{order_id}/items",
    tag = "Orders",
    request_body = AddProductsPayload,
    responses(
        (status = 200, description = "Itens acrescentados", body = Order),
        (status = 409, description = "Pedido já pago")
    ),
    params(
        ("order_id" = Uuid, Path, description = "ID do pedido"),
        ("x-chefe-id" = Option<Uuid>, Header, description = "Restaurante (só Admin)")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_products(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _role: RequireRole<Floor>,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<AddProductsPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let lines: Vec<RequestedLine> = payload.items.iter().map(RequestedLine::from).collect();
    let order = app_state.order_service
        .add_products(tenant.0, order_id, &lines)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(order)))
}

// POST /api/orders/{order_id}/cancel-item
#[utoipa::path(
    post,
    path = "/api/orders/{order_id}/cancel-item",
    tag = "Orders",
    request_body = CancelItemPayload,
    responses(
        (status = 200, description = "Item cancelado (total ou parcialmente)", body = Order),
        (status = 404, description = "Linha inexistente ou já cancelada"),
        (status = 422, description = "Quantidade inválida")
    ),
    params(
        ("order_id" = Uuid, Path, description = "ID do pedido"),
        ("x-chefe-id" = Option<Uuid>, Header, description = "Restaurante (só Admin)")
    ),
    security(("api_jwt" = []))
)]
pub async fn cancel_item(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _role: RequireRole<Cashier>,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<CancelItemPayload>,
) -> Result<impl IntoResponse, ApiError> {
    // A quantidade é checada pela regra de cancelamento (com a mensagem de disponível)
    let order = app_state.order_service
        .cancel_item(tenant.0, order_id, payload.index, payload.quantity)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(order)))
}

// POST /api/orders/{order_id}/promotions
#[utoipa::path(
    post,
    path = "/api/orders/{order_id}/promotions",
    tag = "Orders",
    request_body = PromotionRefPayload,
    responses(
        (status = 200, description = "Promoção aplicada", body = Order),
        (status = 422, description = "Promoção inativa")
    ),
    params(
        ("order_id" = Uuid, Path, description = "ID do pedido"),
        ("x-chefe-id" = Option<Uuid>, Header, description = "Restaurante (só Admin)")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_promotion(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _role: RequireRole<Floor>,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<PromotionRefPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let order = app_state.order_service
        .add_promotion(tenant.0, order_id, payload.promotion_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(order)))
}

// DELETE /api/orders/{order_id}/promotions/{promotion_id}
#[utoipa::path(
    delete,
    path = "/api/orders/{order_id}/promotions/{promotion_id}",
    tag = "Orders",
    responses(
        (status = 200, description = "Uma unidade da promoção removida", body = Order),
        (status = 404, description = "Promoção não está no pedido")
    ),
    params(
        ("order_id" = Uuid, Path, description = "ID do pedido"),
        ("promotion_id" = Uuid, Path, description = "ID da promoção"),
        ("x-chefe-id" = Option<Uuid>, Header, description = "Restaurante (só Admin)")
    ),
    security(("api_jwt" = []))
)]
pub async fn remove_promotion(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _role: RequireRole<Floor>,
    Path((order_id, promotion_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let order = app_state.order_service
        .remove_promotion(tenant.0, order_id, promotion_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(order)))
}

// PATCH /api/orders/{order_id}/status
#[utoipa::path(
    patch,
    path = "/api/orders/{order_id}/status",
    tag = "Orders",
    request_body = AdvanceStatusPayload,
    responses(
        (status = 200, description = "Status avançado", body = Order),
        (status = 409, description = "Transição para trás")
    ),
    params(
        ("order_id" = Uuid, Path, description = "ID do pedido"),
        ("x-chefe-id" = Option<Uuid>, Header, description = "Restaurante (só Admin)")
    ),
    security(("api_jwt" = []))
)]
pub async fn advance_status(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _role: RequireRole<Stations>,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<AdvanceStatusPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let order = app_state.order_service
        .advance_status(tenant.0, order_id, payload.status)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(order)))
}

// POST /api/orders/{order_id}/close
#[utoipa::path(
    post,
    path = "/api/orders/{order_id}/close",
    tag = "Orders",
    request_body = CloseOrderPayload,
    responses(
        (status = 200, description = "Conta fechada e mesa liberada", body = Order),
        (status = 409, description = "Pedido já pago")
    ),
    params(
        ("order_id" = Uuid, Path, description = "ID do pedido"),
        ("x-chefe-id" = Option<Uuid>, Header, description = "Restaurante (só Admin)")
    ),
    security(("api_jwt" = []))
)]
pub async fn close_order(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _role: RequireRole<Cashier>,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<CloseOrderPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let order = app_state.order_service
        .close_order(tenant.0, order_id, payload.payment_method.trim())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(order)))
}

// GET /api/comandas/{comanda_id}
#[utoipa::path(
    get,
    path = "/api/comandas/{comanda_id}",
    tag = "Orders",
    responses((status = 200, description = "Pedidos em aberto da pulseira e total", body = ComandaSummary)),
    params(
        ("comanda_id" = i32, Path, description = "Número da comanda/pulseira"),
        ("x-chefe-id" = Option<Uuid>, Header, description = "Restaurante (só Admin)")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_comanda(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _role: RequireRole<Floor>,
    Path(comanda_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let summary = app_state.order_service
        .comanda(tenant.0, comanda_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(summary)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_lines_need_positive_quantity() {
        let payload = CreateOrderPayload {
            comanda_id: 10,
            table_id: None,
            items: vec![OrderLinePayload { product_id: Uuid::new_v4(), quantity: 0 }],
            promotion_ids: vec![],
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn blank_payment_method_is_rejected() {
        let payload = CloseOrderPayload { payment_method: "   ".to_string() };
        assert!(payload.validate().is_err());
    }
}
