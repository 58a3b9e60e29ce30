// src/middleware/tenancy.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::auth::{Role, User},
};

// Admin sem restaurante escolhe em qual operar por este cabeçalho
pub const CHEFE_ID_HEADER: &str = "x-chefe-id";

// O restaurante (id do Chefe) sobre o qual a requisição opera
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantContext(pub Uuid);

/// Chefe opera no próprio restaurante; a equipe, no do seu Chefe; o Admin,
/// no informado pelo cabeçalho (ou no seu chefe_id, se tiver).
pub fn resolve_tenant(user: &User, header: Option<Uuid>) -> Result<Uuid, AppError> {
    match user.role {
        Role::Chefe => Ok(user.id),
        Role::Admin => header.or(user.chefe_id).ok_or(AppError::MissingTenant),
        _ => user.chefe_id.ok_or(AppError::MissingTenant),
    }
}

impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let locale = Locale::from_headers(&parts.headers);

        let AuthenticatedUser(user) = AuthenticatedUser::from_request_parts(parts, state).await?;

        // Cabeçalho presente mas inválido é erro, não "sem cabeçalho"
        let header = match parts.headers.get(CHEFE_ID_HEADER) {
            Some(value) => Some(
                value
                    .to_str()
                    .ok()
                    .and_then(|s| Uuid::parse_str(s.trim()).ok())
                    .ok_or_else(|| AppError::MissingTenant.to_api_error(&locale, &app_state.i18n_store))?,
            ),
            None => None,
        };

        resolve_tenant(&user, header)
            .map(TenantContext)
            .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(role: Role, chefe_id: Option<Uuid>) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Teste".to_string(),
            email: "teste@comanda.app".to_string(),
            role,
            chefe_id,
            photo_url: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn chefe_always_operates_on_own_restaurant() {
        let chefe = user(Role::Chefe, None);
        assert_eq!(resolve_tenant(&chefe, Some(Uuid::new_v4())).unwrap(), chefe.id);
    }

    #[test]
    fn staff_uses_its_chefe_and_ignores_header() {
        let chefe_id = Uuid::new_v4();
        let garcom = user(Role::Garcom, Some(chefe_id));
        assert_eq!(resolve_tenant(&garcom, Some(Uuid::new_v4())).unwrap(), chefe_id);

        let orphan = user(Role::Cozinha, None);
        assert!(matches!(resolve_tenant(&orphan, None), Err(AppError::MissingTenant)));
    }

    #[test]
    fn admin_picks_restaurant_by_header() {
        let target = Uuid::new_v4();
        let admin = user(Role::Admin, None);

        assert_eq!(resolve_tenant(&admin, Some(target)).unwrap(), target);
        assert!(matches!(resolve_tenant(&admin, None), Err(AppError::MissingTenant)));
    }
}
