// src/handlers/customers.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{Floor, RequireRole},
        tenancy::TenantContext,
    },
    models::customers::Customer,
    services::closing_service::day_window,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckInPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "João da Silva")]
    pub name: String,

    #[validate(length(min = 11, max = 14, message = "CPF inválido."))]
    #[schema(example = "123.456.789-00")]
    pub cpf: String,

    #[validate(range(min = 1, message = "A pulseira deve ser um número positivo."))]
    #[schema(example = 42)]
    pub wristband_id: i32,

    pub table_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct CustomerListQuery {
    /// Só os check-ins de hoje
    #[serde(default)]
    pub today: bool,
}

// POST /api/customers
#[utoipa::path(
    post,
    path = "/api/customers",
    tag = "Customers",
    request_body = CheckInPayload,
    responses((status = 201, description = "Check-in realizado", body = Customer)),
    params(("x-chefe-id" = Option<Uuid>, Header, description = "Restaurante (só Admin)")),
    security(("api_jwt" = []))
)]
pub async fn check_in(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _role: RequireRole<Floor>,
    Json(payload): Json<CheckInPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let customer = app_state.customer_repo
        .check_in(tenant.0, payload.name.trim(), payload.cpf.trim(), payload.wristband_id, payload.table_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tracing::info!("🙋 Check-in de {} com a pulseira {}", customer.name, customer.wristband_id);
    Ok((StatusCode::CREATED, Json(customer)))
}

// GET /api/customers
#[utoipa::path(
    get,
    path = "/api/customers",
    tag = "Customers",
    responses((status = 200, description = "Clientes", body = Vec<Customer>)),
    params(CustomerListQuery, ("x-chefe-id" = Option<Uuid>, Header, description = "Restaurante (só Admin)")),
    security(("api_jwt" = []))
)]
pub async fn list_customers(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _role: RequireRole<Floor>,
    Query(query): Query<CustomerListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let since = if query.today {
        let today = app_state.closing_service.today();
        let (start, _) = day_window(today, app_state.config.utc_offset)
            .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
        Some(start)
    } else {
        None
    };

    let customers = app_state.customer_repo
        .list(tenant.0, since)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(customers)))
}

// GET /api/customers/wristband/{wristband_id}
#[utoipa::path(
    get,
    path = "/api/customers/wristband/{wristband_id}",
    tag = "Customers",
    responses(
        (status = 200, description = "Último check-in com a pulseira", body = Customer),
        (status = 404, description = "Pulseira sem cliente")
    ),
    params(
        ("wristband_id" = i32, Path, description = "Número da pulseira"),
        ("x-chefe-id" = Option<Uuid>, Header, description = "Restaurante (só Admin)")
    ),
    security(("api_jwt" = []))
)]
pub async fn find_by_wristband(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _role: RequireRole<Floor>,
    Path(wristband_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let customer = app_state.customer_repo
        .find_by_wristband(&app_state.db_pool, tenant.0, wristband_id)
        .await
        .and_then(|c| c.ok_or_else(|| AppError::ResourceNotFound("Cliente".into())))
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(customer)))
}

// DELETE /api/customers/{customer_id}
#[utoipa::path(
    delete,
    path = "/api/customers/{customer_id}",
    tag = "Customers",
    responses((status = 204, description = "Cliente removido")),
    params(
        ("customer_id" = Uuid, Path, description = "ID do cliente"),
        ("x-chefe-id" = Option<Uuid>, Header, description = "Restaurante (só Admin)")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_customer(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _role: RequireRole<Floor>,
    Path(customer_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = app_state.customer_repo
        .delete(tenant.0, customer_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    if !deleted {
        return Err(AppError::ResourceNotFound("Cliente".into()).to_api_error(&locale, &app_state.i18n_store));
    }

    Ok(StatusCode::NO_CONTENT)
}
