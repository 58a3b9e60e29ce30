// src/handlers/closings.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;
use utoipa::{IntoParams, ToSchema};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{Cashier, ChefeOnly, Management, RequireRole},
        tenancy::TenantContext,
    },
    models::closing::{ClosingSummary, DailyClosing},
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ClosingDateQuery {
    /// Dia local (AAAA-MM-DD). Sem data, hoje.
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CloseDayPayload {
    /// Sem data, hoje
    pub date: Option<NaiveDate>,
}

// GET /api/closings/preview
#[utoipa::path(
    get,
    path = "/api/closings/preview",
    tag = "Closings",
    responses((status = 200, description = "Números do dia, sem gravar", body = ClosingSummary)),
    params(ClosingDateQuery, ("x-chefe-id" = Option<Uuid>, Header, description = "Restaurante (só Admin)")),
    security(("api_jwt" = []))
)]
pub async fn preview(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _role: RequireRole<Cashier>,
    Query(query): Query<ClosingDateQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let date = query.date.unwrap_or_else(|| app_state.closing_service.today());

    let summary = app_state.closing_service
        .preview(tenant.0, date)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(summary)))
}

// POST /api/closings
#[utoipa::path(
    post,
    path = "/api/closings",
    tag = "Closings",
    request_body(content = CloseDayPayload, description = "Opcional; sem corpo, fecha hoje"),
    responses(
        (status = 201, description = "Dia fechado", body = DailyClosing),
        (status = 400, description = "Data futura"),
        (status = 409, description = "Dia já fechado")
    ),
    params(("x-chefe-id" = Option<Uuid>, Header, description = "Restaurante (só Admin)")),
    security(("api_jwt" = []))
)]
pub async fn close_day(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    tenant: TenantContext,
    _role: RequireRole<Cashier>,
    payload: Option<Json<CloseDayPayload>>,
) -> Result<impl IntoResponse, ApiError> {
    // Sem corpo, fecha hoje
    let date = payload
        .and_then(|Json(p)| p.date)
        .unwrap_or_else(|| app_state.closing_service.today());

    let closing = app_state.closing_service
        .close_day(tenant.0, date, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(closing)))
}

// GET /api/closings
#[utoipa::path(
    get,
    path = "/api/closings",
    tag = "Closings",
    responses((status = 200, description = "Fechamentos, mais recentes primeiro", body = Vec<DailyClosing>)),
    params(("x-chefe-id" = Option<Uuid>, Header, description = "Restaurante (só Admin)")),
    security(("api_jwt" = []))
)]
pub async fn list_closings(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _role: RequireRole<Management>,
) -> Result<impl IntoResponse, ApiError> {
    let closings = app_state.closing_service
        .list(tenant.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(closings)))
}

// GET /api/closings/{closing_id}
#[utoipa::path(
    get,
    path = "/api/closings/{closing_id}",
    tag = "Closings",
    responses(
        (status = 200, description = "Fechamento", body = DailyClosing),
        (status = 404, description = "Fechamento não encontrado")
    ),
    params(
        ("closing_id" = Uuid, Path, description = "ID do fechamento"),
        ("x-chefe-id" = Option<Uuid>, Header, description = "Restaurante (só Admin)")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_closing(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _role: RequireRole<Management>,
    Path(closing_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let closing = app_state.closing_service
        .get(tenant.0, closing_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(closing)))
}

// DELETE /api/closings/{closing_id}
#[utoipa::path(
    delete,
    path = "/api/closings/{closing_id}",
    tag = "Closings",
    responses(
        (status = 200, description = "Dia reaberto; devolve o fechamento apagado", body = DailyClosing),
        (status = 403, description = "Só o Chefe reabre")
    ),
    params(("closing_id" = Uuid, Path, description = "ID do fechamento")),
    security(("api_jwt" = []))
)]
pub async fn reopen_day(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    tenant: TenantContext,
    _role: RequireRole<ChefeOnly>,
    Path(closing_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let closing = app_state.closing_service
        .reopen(tenant.0, closing_id, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(closing)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, extract::FromRequest, http::Request};

    #[tokio::test]
    async fn bare_post_has_no_payload() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/closings")
            .body(Body::empty())
            .unwrap();

        let payload = <Option<Json<CloseDayPayload>> as FromRequest<()>>::from_request(request, &())
            .await
            .unwrap();
        assert!(payload.is_none());
    }

    #[tokio::test]
    async fn json_body_carries_the_date() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/closings")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"date":"2026-03-14"}"#))
            .unwrap();

        let payload = <Option<Json<CloseDayPayload>> as FromRequest<()>>::from_request(request, &())
            .await
            .unwrap();
        let Json(body) = payload.unwrap();
        assert_eq!(body.date, NaiveDate::from_ymd_opt(2026, 3, 14));
    }
}
