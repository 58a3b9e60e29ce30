// src/handlers/reservations.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{Floor, RequireRole},
        tenancy::TenantContext,
    },
    models::reservations::{Reservation, ReservationStatus},
    services::reservation_service::NewReservation,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Família Oliveira")]
    pub name: String,

    #[validate(range(min = 1, message = "A reserva precisa de ao menos 1 pessoa."))]
    #[schema(example = 4)]
    pub pax: i32,

    #[validate(length(min = 8, message = "Telefone inválido."))]
    #[schema(example = "(11) 98888-7777")]
    pub phone: String,

    pub reservation_time: DateTime<Utc>,

    pub table_id: Option<Uuid>,

    #[schema(example = "Aniversário, trazer bolo")]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReservationStatusPayload {
    pub status: ReservationStatus,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ReservationListQuery {
    /// Dia local (AAAA-MM-DD)
    pub date: Option<NaiveDate>,
}

// POST /api/reservations
#[utoipa::path(
    post,
    path = "/api/reservations",
    tag = "Reservations",
    request_body = CreateReservationPayload,
    responses((status = 201, description = "Reserva criada como Aguardando", body = Reservation)),
    params(("x-chefe-id" = Option<Uuid>, Header, description = "Restaurante (só Admin)")),
    security(("api_jwt" = []))
)]
pub async fn create_reservation(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    tenant: TenantContext,
    _role: RequireRole<Floor>,
    Json(payload): Json<CreateReservationPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let new = NewReservation {
        name: payload.name,
        pax: payload.pax,
        phone: payload.phone,
        reservation_time: payload.reservation_time,
        table_id: payload.table_id,
        notes: payload.notes,
    };

    let reservation = app_state.reservation_service
        .create(tenant.0, user.id, new)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(reservation)))
}

// GET /api/reservations
#[utoipa::path(
    get,
    path = "/api/reservations",
    tag = "Reservations",
    responses((status = 200, description = "Reservas por horário", body = Vec<Reservation>)),
    params(ReservationListQuery, ("x-chefe-id" = Option<Uuid>, Header, description = "Restaurante (só Admin)")),
    security(("api_jwt" = []))
)]
pub async fn list_reservations(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _role: RequireRole<Floor>,
    Query(query): Query<ReservationListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let reservations = app_state.reservation_service
        .list(tenant.0, query.date)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(reservations)))
}

// PATCH /api/reservations/{reservation_id}/status
#[utoipa::path(
    patch,
    path = "/api/reservations/{reservation_id}/status",
    tag = "Reservations",
    request_body = UpdateReservationStatusPayload,
    responses(
        (status = 200, description = "Status alterado", body = Reservation),
        (status = 409, description = "Transição não permitida")
    ),
    params(
        ("reservation_id" = Uuid, Path, description = "ID da reserva"),
        ("x-chefe-id" = Option<Uuid>, Header, description = "Restaurante (só Admin)")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_reservation_status(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _role: RequireRole<Floor>,
    Path(reservation_id): Path<Uuid>,
    Json(payload): Json<UpdateReservationStatusPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let reservation = app_state.reservation_service
        .update_status(tenant.0, reservation_id, payload.status)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(reservation)))
}

// DELETE /api/reservations/{reservation_id}
#[utoipa::path(
    delete,
    path = "/api/reservations/{reservation_id}",
    tag = "Reservations",
    responses((status = 204, description = "Reserva removida")),
    params(
        ("reservation_id" = Uuid, Path, description = "ID da reserva"),
        ("x-chefe-id" = Option<Uuid>, Header, description = "Restaurante (só Admin)")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_reservation(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _role: RequireRole<Floor>,
    Path(reservation_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state.reservation_service
        .delete(tenant.0, reservation_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
