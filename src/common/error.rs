use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde_json::{json, Value};
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;

// Nosso tipo de erro de domínio. Os handlers convertem para ApiError com o idioma do cliente.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    // A identidade autenticou, mas não existe usuário com esse e-mail
    #[error("Identidade sem usuário vinculado: {0}")]
    UserNotResolved(String),

    #[error("Acesso negado")]
    Forbidden,

    #[error("E-mail reservado")]
    ReservedEmail,

    #[error("Usuário sem restaurante vinculado")]
    MissingTenant,

    #[error("Recurso não encontrado: {0}")]
    ResourceNotFound(String),

    #[error("Registro duplicado: {0}")]
    UniqueConstraintViolation(String),

    #[error("Item {0} não encontrado no pedido")]
    ItemNotFound(usize),

    #[error("Quantidade de cancelamento inválida: {requested} (disponível: {available})")]
    InvalidCancelQuantity { requested: i32, available: i32 },

    #[error("Transição de status inválida: {from} -> {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Pedido já pago")]
    OrderAlreadyPaid,

    #[error("Pedido sem itens")]
    EmptyOrder,

    #[error("Promoção inativa")]
    PromotionInactive,

    #[error("Promoção não está no pedido")]
    PromotionNotOnOrder,

    #[error("Dia {0} já foi fechado")]
    DayAlreadyClosed(NaiveDate),

    #[error("Dia {0} ainda não chegou")]
    FutureClosingDate(NaiveDate),

    #[error("Nome de arquivo inválido")]
    InvalidFileName,

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro de E/S: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

// O erro que realmente vai para o cliente
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl AppError {
    /// Status HTTP e chave de mensagem de cada variante.
    fn status_and_key(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::ValidationError(_) => (StatusCode::BAD_REQUEST, "validation.failed"),
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "auth.email_exists"),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "auth.invalid_credentials"),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "auth.invalid_token"),
            AppError::UserNotResolved(_) => (StatusCode::FORBIDDEN, "auth.user_not_resolved"),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "auth.forbidden"),
            AppError::ReservedEmail => (StatusCode::FORBIDDEN, "auth.reserved_email"),
            AppError::MissingTenant => (StatusCode::BAD_REQUEST, "tenant.missing"),
            AppError::ResourceNotFound(_) => (StatusCode::NOT_FOUND, "resource.not_found"),
            AppError::UniqueConstraintViolation(_) => (StatusCode::CONFLICT, "resource.duplicate"),
            AppError::ItemNotFound(_) => (StatusCode::NOT_FOUND, "order.item_not_found"),
            AppError::InvalidCancelQuantity { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "order.invalid_cancel_quantity")
            }
            AppError::InvalidStatusTransition { .. } => {
                (StatusCode::CONFLICT, "status.invalid_transition")
            }
            AppError::OrderAlreadyPaid => (StatusCode::CONFLICT, "order.already_paid"),
            AppError::EmptyOrder => (StatusCode::UNPROCESSABLE_ENTITY, "order.empty"),
            AppError::PromotionInactive => (StatusCode::UNPROCESSABLE_ENTITY, "promotion.inactive"),
            AppError::PromotionNotOnOrder => (StatusCode::NOT_FOUND, "promotion.not_on_order"),
            AppError::DayAlreadyClosed(_) => (StatusCode::CONFLICT, "closing.already_closed"),
            AppError::FutureClosingDate(_) => (StatusCode::BAD_REQUEST, "closing.future_date"),
            AppError::InvalidFileName => (StatusCode::BAD_REQUEST, "upload.invalid_file_name"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal.unexpected"),
        }
    }

    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let (status, key) = self.status_and_key();
        let template = store.get(&locale.0, key);

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // O tracing loga a mensagem detalhada que o `thiserror` montou.
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        let error = match self {
            AppError::ResourceNotFound(what) | AppError::UniqueConstraintViolation(what) => {
                template.replace("{0}", what)
            }
            AppError::ItemNotFound(index) => template.replace("{0}", &index.to_string()),
            AppError::InvalidCancelQuantity { requested, available } => template
                .replace("{0}", &requested.to_string())
                .replace("{1}", &available.to_string()),
            AppError::InvalidStatusTransition { from, to } => {
                template.replace("{0}", from).replace("{1}", to)
            }
            AppError::DayAlreadyClosed(date) | AppError::FutureClosingDate(date) => {
                template.replace("{0}", &date.format("%d/%m/%Y").to_string())
            }
            _ => template,
        };

        let details = match self {
            AppError::ValidationError(errors) => {
                let mut details: HashMap<String, Vec<String>> = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages = field_errors
                        .iter()
                        .map(|e| match &e.message {
                            Some(m) => m.to_string(),
                            None => e.code.to_string(),
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                Some(json!(details))
            }
            _ => None,
        };

        ApiError { status, error, details }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt() -> Locale {
        Locale("pt".to_string())
    }

    #[test]
    fn cancel_quantity_message_carries_numbers() {
        let store = I18nStore::new();
        let err = AppError::InvalidCancelQuantity { requested: 5, available: 2 };
        let api = err.to_api_error(&pt(), &store);

        assert_eq!(api.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(api.error.contains('5'));
        assert!(api.error.contains('2'));
    }

    #[test]
    fn day_already_closed_is_conflict() {
        let store = I18nStore::new();
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let api = AppError::DayAlreadyClosed(date).to_api_error(&pt(), &store);

        assert_eq!(api.status, StatusCode::CONFLICT);
        assert!(api.error.contains("14/03/2026"));
    }

    #[test]
    fn internal_errors_hide_details() {
        let store = I18nStore::new();
        let err = AppError::InternalServerError(anyhow::anyhow!("senha do banco vazou"));
        let api = err.to_api_error(&Locale("en".to_string()), &store);

        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api.error.contains("senha"));
    }
}
