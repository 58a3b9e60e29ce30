// src/handlers/events.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{AdminOnly, RequireRole},
    },
    models::events::SystemEvent,
};

const DEFAULT_LIMIT: i64 = 100;
const MAX_LIMIT: i64 = 500;

#[derive(Debug, Deserialize, IntoParams)]
pub struct EventListQuery {
    /// Quantos eventos (padrão 100, máximo 500)
    pub limit: Option<i64>,
}

// GET /api/events
#[utoipa::path(
    get,
    path = "/api/events",
    tag = "Events",
    responses((status = 200, description = "Últimos eventos do sistema", body = Vec<SystemEvent>)),
    params(EventListQuery),
    security(("api_jwt" = []))
)]
pub async fn list_events(
    State(app_state): State<AppState>,
    locale: Locale,
    _role: RequireRole<AdminOnly>,
    Query(query): Query<EventListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let events = app_state.event_repo
        .list_recent(limit)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(events)))
}
