// src/handlers/tables.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{Floor, Management, RequireRole},
        tenancy::TenantContext,
    },
    models::tables::{RestaurantTable, TableStatus},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTablePayload {
    #[validate(range(min = 1, message = "O número da mesa deve ser positivo."))]
    #[schema(example = 7)]
    pub number: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTableStatusPayload {
    pub status: TableStatus,
    // Só faz sentido com Occupied
    pub order_id: Option<Uuid>,
}

// POST /api/tables
#[utoipa::path(
    post,
    path = "/api/tables",
    tag = "Tables",
    request_body = CreateTablePayload,
    responses(
        (status = 201, description = "Mesa criada", body = RestaurantTable),
        (status = 409, description = "Número já usado")
    ),
    params(("x-chefe-id" = Option<Uuid>, Header, description = "Restaurante (só Admin)")),
    security(("api_jwt" = []))
)]
pub async fn create_table(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _role: RequireRole<Management>,
    Json(payload): Json<CreateTablePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let table = app_state.table_repo
        .create(tenant.0, payload.number)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(table)))
}

// GET /api/tables
#[utoipa::path(
    get,
    path = "/api/tables",
    tag = "Tables",
    responses((status = 200, description = "Mesas do restaurante", body = Vec<RestaurantTable>)),
    params(("x-chefe-id" = Option<Uuid>, Header, description = "Restaurante (só Admin)")),
    security(("api_jwt" = []))
)]
pub async fn list_tables(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _role: RequireRole<Floor>,
) -> Result<impl IntoResponse, ApiError> {
    let tables = app_state.table_repo
        .list(tenant.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(tables)))
}

// PATCH /api/tables/{table_id}/status
#[utoipa::path(
    patch,
    path = "/api/tables/{table_id}/status",
    tag = "Tables",
    request_body = UpdateTableStatusPayload,
    responses((status = 200, description = "Status da mesa alterado", body = RestaurantTable)),
    params(
        ("table_id" = Uuid, Path, description = "ID da mesa"),
        ("x-chefe-id" = Option<Uuid>, Header, description = "Restaurante (só Admin)")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_table_status(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _role: RequireRole<Floor>,
    Path(table_id): Path<Uuid>,
    Json(payload): Json<UpdateTableStatusPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let order_id = match payload.status {
        TableStatus::Occupied => payload.order_id,
        _ => None,
    };

    let table = app_state.table_repo
        .set_status(&app_state.db_pool, tenant.0, table_id, payload.status, order_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(table)))
}
