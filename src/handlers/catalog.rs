// src/handlers/catalog.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{Floor, Management, RequireRole},
        tenancy::TenantContext,
    },
    models::catalog::{Department, Product, Promotion},
};

// ---
// Validações
// ---
fn validate_positive_price(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.message = Some("O preço deve ser maior que zero.".into());
        return Err(err);
    }
    Ok(())
}

fn validate_discount(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO || *val >= Decimal::ONE_HUNDRED {
        let mut err = ValidationError::new("range");
        err.message = Some("O desconto deve estar entre 0 e 100 (exclusivo).".into());
        return Err(err);
    }
    Ok(())
}

// =============================================================================
//  PRODUTOS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Caipirinha")]
    pub name: String,

    #[validate(custom(function = "validate_positive_price"))]
    #[schema(value_type = String, example = "18.90")]
    pub price: Decimal,

    pub department: Department,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    #[validate(length(min = 1, message = "O nome não pode ficar vazio."))]
    pub name: Option<String>,

    #[validate(custom(function = "validate_positive_price"))]
    #[schema(value_type = Option<String>, example = "21.50")]
    pub price: Option<Decimal>,

    pub department: Option<Department>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ProductListQuery {
    /// Filtra por departamento
    pub department: Option<Department>,
}

// POST /api/catalog/products
#[utoipa::path(
    post,
    path = "/api/catalog/products",
    tag = "Catalog",
    request_body = CreateProductPayload,
    responses((status = 201, description = "Produto criado", body = Product)),
    params(("x-chefe-id" = Option<Uuid>, Header, description = "Restaurante (só Admin)")),
    security(("api_jwt" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _role: RequireRole<Management>,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let product = app_state.catalog_service
        .create_product(tenant.0, &payload.name, payload.price, payload.department)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(product)))
}

// GET /api/catalog/products
#[utoipa::path(
    get,
    path = "/api/catalog/products",
    tag = "Catalog",
    responses((status = 200, description = "Cardápio", body = Vec<Product>)),
    params(ProductListQuery, ("x-chefe-id" = Option<Uuid>, Header, description = "Restaurante (só Admin)")),
    security(("api_jwt" = []))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    Query(query): Query<ProductListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let products = app_state.catalog_service
        .list_products(tenant.0, query.department)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(products)))
}

// PATCH /api/catalog/products/{product_id}
#[utoipa::path(
    patch,
    path = "/api/catalog/products/{product_id}",
    tag = "Catalog",
    request_body = UpdateProductPayload,
    responses(
        (status = 200, description = "Produto atualizado", body = Product),
        (status = 404, description = "Produto não encontrado")
    ),
    params(
        ("product_id" = Uuid, Path, description = "ID do produto"),
        ("x-chefe-id" = Option<Uuid>, Header, description = "Restaurante (só Admin)")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _role: RequireRole<Management>,
    Path(product_id): Path<Uuid>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let product = app_state.catalog_service
        .update_product(tenant.0, product_id, payload.name.as_deref(), payload.price, payload.department)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(product)))
}

// DELETE /api/catalog/products/{product_id}
#[utoipa::path(
    delete,
    path = "/api/catalog/products/{product_id}",
    tag = "Catalog",
    responses((status = 204, description = "Produto removido")),
    params(
        ("product_id" = Uuid, Path, description = "ID do produto"),
        ("x-chefe-id" = Option<Uuid>, Header, description = "Restaurante (só Admin)")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _role: RequireRole<Management>,
    Path(product_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state.catalog_service
        .delete_product(tenant.0, product_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  PROMOÇÕES
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePromotionPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Combo Happy Hour")]
    pub name: String,

    #[validate(length(min = 1, message = "A promoção precisa de ao menos um produto."))]
    pub product_ids: Vec<Uuid>,

    #[validate(custom(function = "validate_discount"))]
    #[schema(value_type = String, example = "20")]
    pub discount_percentage: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetPromotionActivePayload {
    pub is_active: bool,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct PromotionListQuery {
    /// Só as promoções ativas
    #[serde(default)]
    pub only_active: bool,
}

// POST /api/catalog/promotions
#[utoipa::path(
    post,
    path = "/api/catalog/promotions",
    tag = "Catalog",
    request_body = CreatePromotionPayload,
    responses(
        (status = 201, description = "Promoção criada com os preços calculados", body = Promotion),
        (status = 404, description = "Algum produto não existe")
    ),
    params(("x-chefe-id" = Option<Uuid>, Header, description = "Restaurante (só Admin)")),
    security(("api_jwt" = []))
)]
pub async fn create_promotion(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _role: RequireRole<Management>,
    Json(payload): Json<CreatePromotionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let promotion = app_state.catalog_service
        .create_promotion(tenant.0, &payload.name, &payload.product_ids, payload.discount_percentage)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(promotion)))
}

// GET /api/catalog/promotions
#[utoipa::path(
    get,
    path = "/api/catalog/promotions",
    tag = "Catalog",
    responses((status = 200, description = "Promoções", body = Vec<Promotion>)),
    params(PromotionListQuery, ("x-chefe-id" = Option<Uuid>, Header, description = "Restaurante (só Admin)")),
    security(("api_jwt" = []))
)]
pub async fn list_promotions(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _role: RequireRole<Floor>,
    Query(query): Query<PromotionListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let promotions = app_state.catalog_service
        .list_promotions(tenant.0, query.only_active)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(promotions)))
}

// PATCH /api/catalog/promotions/{promotion_id}
#[utoipa::path(
    patch,
    path = "/api/catalog/promotions/{promotion_id}",
    tag = "Catalog",
    request_body = SetPromotionActivePayload,
    responses((status = 200, description = "Promoção ativada/desativada", body = Promotion)),
    params(
        ("promotion_id" = Uuid, Path, description = "ID da promoção"),
        ("x-chefe-id" = Option<Uuid>, Header, description = "Restaurante (só Admin)")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_promotion_active(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _role: RequireRole<Management>,
    Path(promotion_id): Path<Uuid>,
    Json(payload): Json<SetPromotionActivePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let promotion = app_state.catalog_service
        .set_promotion_active(tenant.0, promotion_id, payload.is_active)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(promotion)))
}

// DELETE /api/catalog/promotions/{promotion_id}
#[utoipa::path(
    delete,
    path = "/api/catalog/promotions/{promotion_id}",
    tag = "Catalog",
    responses((status = 204, description = "Promoção removida")),
    params(
        ("promotion_id" = Uuid, Path, description = "ID da promoção"),
        ("x-chefe-id" = Option<Uuid>, Header, description = "Restaurante (só Admin)")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_promotion(
    State(app_state): State<AppState>,
    locale: Locale,
    tenant: TenantContext,
    _role: RequireRole<Management>,
    Path(promotion_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state.catalog_service
        .delete_promotion(tenant.0, promotion_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discount_bounds_are_exclusive() {
        assert!(validate_discount(&Decimal::ZERO).is_err());
        assert!(validate_discount(&Decimal::ONE_HUNDRED).is_err());
        assert!(validate_discount(&Decimal::from(20)).is_ok());
    }

    #[test]
    fn promotion_payload_needs_products() {
        let payload = CreatePromotionPayload {
            name: "Combo".to_string(),
            product_ids: vec![],
            discount_percentage: Decimal::from(10),
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("product_ids"));
    }

    #[test]
    fn free_products_are_rejected() {
        let payload = CreateProductPayload {
            name: "Água".to_string(),
            price: Decimal::ZERO,
            department: Department::Bar,
        };
        assert!(payload.validate().is_err());
    }
}
