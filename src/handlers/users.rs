// src/handlers/users.rs

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
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
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{AdminOnly, Management, RequireRole},
    },
    models::auth::{Role, User},
    services::user_service::content_type_for,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Carlos Lima")]
    pub name: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "carlos@restaurante.com")]
    pub email: String,

    pub role: Role,

    // Obrigatório para a equipe (Garçom, Caixa, Cozinha, Bar)
    pub chefe_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PhotoQuery {
    /// Nome original do arquivo
    pub file_name: String,
}

// Só o próprio usuário ou um Admin mexe na foto
fn ensure_self_or_admin(user: &User, target: Uuid) -> Result<(), AppError> {
    if user.role == Role::Admin || user.id == target {
        return Ok(());
    }
    Err(AppError::Forbidden)
}

// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "Admin vê todos; Chefe vê a própria equipe", body = Vec<User>),
        (status = 403, description = "Sem permissão")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    _role: RequireRole<Management>,
) -> Result<impl IntoResponse, ApiError> {
    let scope = if user.role == Role::Admin { None } else { Some(user.id) };

    let users = app_state.user_service
        .list(scope)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(users)))
}

// POST /api/users
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "Usuário cadastrado (sem credencial)", body = User),
        (status = 409, description = "E-mail já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    locale: Locale,
    _role: RequireRole<AdminOnly>,
    Json(payload): Json<CreateUserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let user = app_state.user_service
        .create_user(&payload.name, &payload.email, payload.role, payload.chefe_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(user)))
}

// DELETE /api/users/{user_id}
#[utoipa::path(
    delete,
    path = "/api/users/{user_id}",
    tag = "Users",
    responses(
        (status = 204, description = "Usuário removido"),
        (status = 404, description = "Usuário não encontrado")
    ),
    params(("user_id" = Uuid, Path, description = "ID do usuário")),
    security(("api_jwt" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    locale: Locale,
    _role: RequireRole<AdminOnly>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state.user_service
        .delete_user(user_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// PUT /api/users/{user_id}/photo?fileName=
#[utoipa::path(
    put,
    path = "/api/users/{user_id}/photo",
    tag = "Users",
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Foto substituída", body = User),
        (status = 400, description = "Nome de arquivo inválido")
    ),
    params(("user_id" = Uuid, Path, description = "ID do usuário"), PhotoQuery),
    security(("api_jwt" = []))
)]
pub async fn upload_photo(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(user_id): Path<Uuid>,
    Query(query): Query<PhotoQuery>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    ensure_self_or_admin(&user, user_id).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let updated = app_state.user_service
        .upload_photo(user_id, &query.file_name, &body)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(updated)))
}

// GET /api/users/{user_id}/photo
#[utoipa::path(
    get,
    path = "/api/users/{user_id}/photo",
    tag = "Users",
    responses(
        (status = 200, description = "Arquivo da foto", content_type = "application/octet-stream"),
        (status = 404, description = "Usuário sem foto")
    ),
    params(("user_id" = Uuid, Path, description = "ID do usuário")),
    security(("api_jwt" = []))
)]
pub async fn download_photo(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(user_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let (bytes, file_name) = app_state.user_service
        .download_photo(user_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let headers = [
        (header::CONTENT_TYPE, content_type_for(&file_name).to_string()),
        (header::CONTENT_DISPOSITION, format!("inline; filename=\"{}\"", file_name)),
    ];

    Ok((headers, bytes).into_response())
}

// DELETE /api/users/{user_id}/photo
#[utoipa::path(
    delete,
    path = "/api/users/{user_id}/photo",
    tag = "Users",
    responses((status = 200, description = "Foto removida", body = User)),
    params(("user_id" = Uuid, Path, description = "ID do usuário")),
    security(("api_jwt" = []))
)]
pub async fn delete_photo(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_self_or_admin(&user, user_id).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let updated = app_state.user_service
        .delete_photo(user_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(updated)))
}
