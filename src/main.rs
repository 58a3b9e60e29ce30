//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::{AppConfig, AppState};
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Sem configuração a aplicação não deve iniciar
    let config = AppConfig::from_env().expect("Falha ao carregar a configuração.");

    let app_state = AppState::new(config)
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    if app_state.config.print_station_enabled {
        app_state
            .print_station
            .clone()
            .spawn(app_state.config.print_poll_interval);
        tracing::info!("🖨️ Estação de impressão ativa");
    }

    if let Some(password) = app_state.config.superuser_password.as_deref() {
        app_state
            .auth_service
            .bootstrap_superuser(password)
            .await
            .expect("Falha ao criar a credencial do superusuário.");
    }

    let user_routes = Router::new()
        .route("/", get(handlers::users::list_users).post(handlers::users::create_user))
        .route("/me", get(handlers::auth::get_me))
        .route("/{user_id}", axum::routing::delete(handlers::users::delete_user))
        .route(
            "/{user_id}/photo",
            axum::routing::put(handlers::users::upload_photo)
                .get(handlers::users::download_photo)
                .delete(handlers::users::delete_photo),
        );

    let customer_routes = Router::new()
        .route("/", post(handlers::customers::check_in).get(handlers::customers::list_customers))
        .route("/wristband/{wristband_id}", get(handlers::customers::find_by_wristband))
        .route("/{customer_id}", axum::routing::delete(handlers::customers::delete_customer));

    let catalog_routes = Router::new()
        .route(
            "/products",
            post(handlers::catalog::create_product).get(handlers::catalog::list_products),
        )
        .route(
            "/products/{product_id}",
            patch(handlers::catalog::update_product).delete(handlers::catalog::delete_product),
        )
        .route(
            "/promotions",
            post(handlers::catalog::create_promotion).get(handlers::catalog::list_promotions),
        )
        .route(
            "/promotions/{promotion_id}",
            patch(handlers::catalog::set_promotion_active).delete(handlers::catalog::delete_promotion),
        );

    let order_routes = Router::new()
        .route("/", post(handlers::orders::create_order).get(handlers::orders::list_orders))
        .route("/{order_id}", get(handlers::orders::get_order))
        .route("/{order_id}/items", post(handlers::orders::add_products))
        .route("/{order_id}/cancel-item", post(handlers::orders::cancel_item))
        .route("/{order_id}/promotions", post(handlers::orders::add_promotion))
        .route(
            "/{order_id}/promotions/{promotion_id}",
            axum::routing::delete(handlers::orders::remove_promotion),
        )
        .route("/{order_id}/status", patch(handlers::orders::advance_status))
        .route("/{order_id}/close", post(handlers::orders::close_order));

    let print_routes = Router::new()
        .route("/queue", get(handlers::print_station::list_queue))
        .route("/orders/{order_id}/ticket", get(handlers::print_station::download_ticket))
        .route("/orders/{order_id}/printed", post(handlers::print_station::mark_printed));

    let table_routes = Router::new()
        .route("/", post(handlers::tables::create_table).get(handlers::tables::list_tables))
        .route("/{table_id}/status", patch(handlers::tables::update_table_status));

    let reservation_routes = Router::new()
        .route(
            "/",
            post(handlers::reservations::create_reservation).get(handlers::reservations::list_reservations),
        )
        .route(
            "/{reservation_id}",
            axum::routing::delete(handlers::reservations::delete_reservation),
        )
        .route(
            "/{reservation_id}/status",
            patch(handlers::reservations::update_reservation_status),
        );

    let closing_routes = Router::new()
        .route("/", post(handlers::closings::close_day).get(handlers::closings::list_closings))
        .route("/preview", get(handlers::closings::preview))
        .route(
            "/{closing_id}",
            get(handlers::closings::get_closing).delete(handlers::closings::reopen_day),
        );

    // Tudo abaixo exige token; papel e restaurante são checados nos extractors
    let protected = Router::new()
        .route("/api/auth/register", post(handlers::auth::register))
        .nest("/api/users", user_routes)
        .nest("/api/customers", customer_routes)
        .nest("/api/catalog", catalog_routes)
        .nest("/api/orders", order_routes)
        .route("/api/comandas/{comanda_id}", get(handlers::orders::get_comanda))
        .route("/api/stations/{department}/orders", get(handlers::stations::station_orders))
        .nest("/api/print-station", print_routes)
        .nest("/api/tables", table_routes)
        .nest("/api/reservations", reservation_routes)
        .nest("/api/closings", closing_routes)
        .route("/api/events", get(handlers::events::list_events))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let server_addr = app_state.config.server_addr.clone();

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        // Pública; o registro de credenciais fica no grupo protegido (só Admin)
        .route("/api/auth/login", post(handlers::auth::login))
        .merge(protected)
        .with_state(app_state);

    let listener = TcpListener::bind(&server_addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", server_addr);
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
