// src/handlers/print_station.rs

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{Floor, RequireRole},
        tenancy::TenantContext,
    },
    models::orders::Order,
    services::print_station::BATCH_SIZE,
};

// GET /api/print-station/queue
#[utoipa::path(
    get,
    path = "/api/print-station/queue",
    tag = "Print Station",
    responses((status = 200, description = "Pedidos ainda não impressos, do mais antigo ao mais novo", body = Vec<Order>)),
    params(("x-chefe-id" = Option<Uuid>, Header, description = "Restaurante (só Admin)")),
    security(("api_jwt" = []))
)]
pub async fn list_queue(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _role: RequireRole<Floor>,
) -> Result<impl IntoResponse, ApiError> {
    let orders = app_state.order_repo
        .list_unprinted(Some(tenant.0), BATCH_SIZE)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(orders)))
}

// GET /api/print-station/orders/{order_id}/ticket
#[utoipa::path(
    get,
    path = "/api/print-station/orders/{order_id}/ticket",
    tag = "Print Station",
    responses(
        (status = 200, description = "Ticket em PDF", content_type = "application/pdf"),
        (status = 404, description = "Pedido não encontrado")
    ),
    params(
        ("order_id" = Uuid, Path, description = "ID do pedido"),
        ("x-chefe-id" = Option<Uuid>, Header, description = "Restaurante (só Admin)")
    ),
    security(("api_jwt" = []))
)]
pub async fn download_ticket(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _role: RequireRole<Floor>,
    Path(order_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let order = app_state.order_service
        .get(tenant.0, order_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let pdf_bytes = app_state.ticket_service
        .render_async(&order)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (header::CONTENT_DISPOSITION, format!("attachment; filename=\"comanda_{}.pdf\"", order.comanda_id)),
    ];

    Ok((headers, pdf_bytes).into_response())
}

// POST /api/print-station/orders/{order_id}/printed
#[utoipa::path(
    post,
    path = "/api/print-station/orders/{order_id}/printed",
    tag = "Print Station",
    responses(
        (status = 204, description = "Pedido marcado como impresso"),
        (status = 404, description = "Pedido não encontrado")
    ),
    params(
        ("order_id" = Uuid, Path, description = "ID do pedido"),
        ("x-chefe-id" = Option<Uuid>, Header, description = "Restaurante (só Admin)")
    ),
    security(("api_jwt" = []))
)]
pub async fn mark_printed(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _role: RequireRole<Floor>,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    // Confere o restaurante antes de marcar
    let order = app_state.order_service
        .get(tenant.0, order_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    app_state.order_repo
        .mark_printed(order.id, Utc::now())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
