// src/handlers/stations.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{RequireRole, Stations},
        tenancy::TenantContext,
    },
    models::{catalog::Department, orders::StationOrder},
    services::station_service::station_view,
};

// GET /api/stations/{department}/orders
#[utoipa::path(
    get,
    path = "/api/stations/{department}/orders",
    tag = "Stations",
    responses((status = 200, description = "Pedidos em aberto com as linhas da estação", body = Vec<StationOrder>)),
    params(
        ("department" = Department, Path, description = "Kitchen ou Bar"),
        ("x-chefe-id" = Option<Uuid>, Header, description = "Restaurante (só Admin)")
    ),
    security(("api_jwt" = []))
)]
pub async fn station_orders(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _role: RequireRole<Stations>,
    Path(department): Path<Department>,
) -> Result<impl IntoResponse, ApiError> {
    let orders = app_state.order_service
        .list_open(tenant.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(station_view(&orders, department))))
}
