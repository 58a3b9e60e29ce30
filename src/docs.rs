// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,
        handlers::users::list_users,
        handlers::users::create_user,
        handlers::users::delete_user,
        handlers::users::upload_photo,
        handlers::users::download_photo,
        handlers::users::delete_photo,

        // --- Customers ---
        handlers::customers::check_in,
        handlers::customers::list_customers,
        handlers::customers::find_by_wristband,
        handlers::customers::delete_customer,

        // --- Catalog ---
        handlers::catalog::create_product,
        handlers::catalog::list_products,
        handlers::catalog::update_product,
        handlers::catalog::delete_product,
        handlers::catalog::create_promotion,
        handlers::catalog::list_promotions,
        handlers::catalog::set_promotion_active,
        handlers::catalog::delete_promotion,

        // --- Orders ---
        handlers::orders::create_order,
        handlers::orders::list_orders,
        handlers::orders::get_order,
        handlers::orders::add_products,
        handlers::orders::cancel_item,
        handlers::orders::add_promotion,
        handlers::orders::remove_promotion,
        handlers::orders::advance_status,
        handlers::orders::close_order,
        handlers::orders::get_comanda,

        // --- Stations ---
        handlers::stations::station_orders,

        // --- Print Station ---
        handlers::print_station::list_queue,
        handlers::print_station::download_ticket,
        handlers::print_station::mark_printed,

        // --- Tables ---
        handlers::tables::create_table,
        handlers::tables::list_tables,
        handlers::tables::update_table_status,

        // --- Reservations ---
        handlers::reservations::create_reservation,
        handlers::reservations::list_reservations,
        handlers::reservations::update_reservation_status,
        handlers::reservations::delete_reservation,

        // --- Closings ---
        handlers::closings::preview,
        handlers::closings::close_day,
        handlers::closings::list_closings,
        handlers::closings::get_closing,
        handlers::closings::reopen_day,

        // --- Events ---
        handlers::events::list_events,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::RegisterIdentityPayload,
            models::auth::LoginPayload,
            models::auth::AuthResponse,
            models::auth::IdentityResponse,

            // --- Catalog ---
            models::catalog::Department,
            models::catalog::Product,
            models::catalog::ProductSnapshot,
            models::catalog::Promotion,

            // --- Orders ---
            models::orders::OrderStatus,
            models::orders::ItemStatus,
            models::orders::OrderItem,
            models::orders::Order,
            models::orders::ComandaSummary,
            models::orders::StationOrder,

            // --- Salão ---
            models::customers::Customer,
            models::tables::TableStatus,
            models::tables::RestaurantTable,
            models::reservations::ReservationStatus,
            models::reservations::Reservation,

            // --- Closing ---
            models::closing::PaymentTotal,
            models::closing::CancelledItem,
            models::closing::ClosingSummary,
            models::closing::DailyClosing,

            // --- Events ---
            models::events::EventLevel,
            models::events::SystemEvent,

            // --- Payloads ---
            handlers::users::CreateUserPayload,
            handlers::customers::CheckInPayload,
            handlers::catalog::CreateProductPayload,
            handlers::catalog::UpdateProductPayload,
            handlers::catalog::CreatePromotionPayload,
            handlers::catalog::SetPromotionActivePayload,
            handlers::orders::OrderLinePayload,
            handlers::orders::CreateOrderPayload,
            handlers::orders::AddProductsPayload,
            handlers::orders::CancelItemPayload,
            handlers::orders::PromotionRefPayload,
            handlers::orders::AdvanceStatusPayload,
            handlers::orders::CloseOrderPayload,
            handlers::tables::CreateTablePayload,
            handlers::tables::UpdateTableStatusPayload,
            handlers::reservations::CreateReservationPayload,
            handlers::reservations::UpdateReservationStatusPayload,
            handlers::closings::CloseDayPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Equipe, perfis e fotos"),
        (name = "Customers", description = "Check-in e pulseiras"),
        (name = "Catalog", description = "Produtos e Promoções"),
        (name = "Orders", description = "Pedidos, itens e comandas"),
        (name = "Stations", description = "Telas da Cozinha e do Bar"),
        (name = "Print Station", description = "Fila e tickets de impressão"),
        (name = "Tables", description = "Mesas do salão"),
        (name = "Reservations", description = "Reservas"),
        (name = "Closings", description = "Fechamento do dia"),
        (name = "Events", description = "Eventos do sistema")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_group_is_documented() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/api/auth/login",
            "/api/orders/{order_id}/cancel-item",
            "/api/closings/preview",
            "/api/print-station/queue",
            "/api/stations/{department}/orders",
        ] {
            assert!(paths.contains_key(path), "faltando {}", path);
        }
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("api_jwt"));
    }
}
