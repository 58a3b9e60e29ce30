// src/middleware/rbac.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::marker::PhantomData;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::auth::Role,
};

/// Um conjunto de cargos que pode acessar uma rota
pub trait RoleDef: Send + Sync + 'static {
    fn allowed() -> &'static [Role];

    fn permits(role: Role) -> bool {
        Self::allowed().contains(&role)
    }
}

/// Guardião: rejeita com 403 quem não tem um dos cargos de `T`
pub struct RequireRole<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(user) = AuthenticatedUser::from_request_parts(parts, state).await?;

        if !T::permits(user.role) {
            tracing::warn!("🚫 {} ({:?}) sem permissão para {}", user.email, user.role, parts.uri.path());
            let app_state = AppState::from_ref(state);
            return Err(AppError::Forbidden.to_api_error(&Locale::from_headers(&parts.headers), &app_state.i18n_store));
        }

        Ok(RequireRole(PhantomData))
    }
}

// ---
// CONJUNTOS DE CARGOS
// ---

pub struct AdminOnly;
impl RoleDef for AdminOnly {
    fn allowed() -> &'static [Role] { &[Role::Admin] }
}

// Reabrir um dia fechado
pub struct ChefeOnly;
impl RoleDef for ChefeOnly {
    fn allowed() -> &'static [Role] { &[Role::Chefe] }
}

// Cardápio, mesas, fechamento
pub struct Management;
impl RoleDef for Management {
    fn allowed() -> &'static [Role] { &[Role::Admin, Role::Chefe] }
}

// Cancelamento de itens e fechamento de conta
pub struct Cashier;
impl RoleDef for Cashier {
    fn allowed() -> &'static [Role] { &[Role::Admin, Role::Chefe, Role::Caixa] }
}

// Salão: pedidos, clientes, reservas
pub struct Floor;
impl RoleDef for Floor {
    fn allowed() -> &'static [Role] { &[Role::Admin, Role::Chefe, Role::Garcom, Role::Caixa] }
}

// Cozinha e bar
pub struct Stations;
impl RoleDef for Stations {
    fn allowed() -> &'static [Role] { &[Role::Admin, Role::Chefe, Role::Cozinha, Role::Bar] }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_chefe_reopens_a_day() {
        assert!(ChefeOnly::permits(Role::Chefe));
        assert!(!ChefeOnly::permits(Role::Admin));
        assert!(!ChefeOnly::permits(Role::Caixa));
    }

    #[test]
    fn waiter_cannot_cancel_items() {
        assert!(Floor::permits(Role::Garcom));
        assert!(!Cashier::permits(Role::Garcom));
        assert!(Cashier::permits(Role::Caixa));
    }

    #[test]
    fn kitchen_only_sees_stations() {
        assert!(Stations::permits(Role::Cozinha));
        assert!(!Floor::permits(Role::Cozinha));
        assert!(!Management::permits(Role::Bar));
    }
}
