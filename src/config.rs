// src/config.rs

use std::{env, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context;
use chrono::FixedOffset;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::i18n::I18nStore,
    db::{
        CatalogRepository, ClosingRepository, CustomerRepository, EventRepository, OrderRepository,
        ReservationRepository, TableRepository, UserRepository,
    },
    services::{
        auth::AuthService,
        catalog_service::CatalogService,
        closing_service::ClosingService,
        order_service::OrderService,
        print_station::PrintStation,
        reservation_service::ReservationService,
        ticket_service::{SpoolPrinter, TicketService},
        user_service::UserService,
    },
};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub superuser_email: Option<String>,
    // Senha inicial da credencial do superusuário, criada no boot
    pub superuser_password: Option<String>,
    // Fuso fixo do restaurante; define o "dia" do fechamento
    pub utc_offset: FixedOffset,
    pub upload_dir: PathBuf,
    pub print_station_enabled: bool,
    pub print_poll_interval: Duration,
    pub print_delay: Duration,
    pub print_spool_dir: PathBuf,
    pub fonts_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Monta a configuração a partir de qualquer fonte de chave/valor.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |key: &str| get(key).with_context(|| format!("{} deve ser definida", key));

        let offset_minutes: i32 = parse_or(get("UTC_OFFSET_MINUTES"), "UTC_OFFSET_MINUTES", -180)?;
        let utc_offset = offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .with_context(|| format!("UTC_OFFSET_MINUTES fora do intervalo: {}", offset_minutes))?;

        // interval(0) derruba o loop de impressão no primeiro tick
        let poll_secs: u64 = parse_or(get("PRINT_POLL_INTERVAL_SECS"), "PRINT_POLL_INTERVAL_SECS", 5)?;
        if poll_secs == 0 {
            anyhow::bail!("PRINT_POLL_INTERVAL_SECS deve ser maior que zero");
        }

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            server_addr: get("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            superuser_email: get("SUPERUSER_EMAIL").map(|e| e.to_lowercase()),
            superuser_password: get("SUPERUSER_PASSWORD"),
            utc_offset,
            upload_dir: PathBuf::from(get("UPLOAD_DIR").unwrap_or_else(|| "./uploads".to_string())),
            print_station_enabled: parse_or(get("PRINT_STATION_ENABLED"), "PRINT_STATION_ENABLED", false)?,
            print_poll_interval: Duration::from_secs(poll_secs),
            print_delay: Duration::from_millis(parse_or(get("PRINT_DELAY_MS"), "PRINT_DELAY_MS", 1500)?),
            print_spool_dir: PathBuf::from(get("PRINT_SPOOL_DIR").unwrap_or_else(|| "./spool".to_string())),
            fonts_dir: PathBuf::from(get("FONTS_DIR").unwrap_or_else(|| "./fonts".to_string())),
        })
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("{} inválida ({}): {}", key, raw, e)),
        None => Ok(default),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<AppConfig>,
    pub i18n_store: I18nStore,

    // Repositórios usados direto pelos handlers (CRUD simples)
    pub customer_repo: CustomerRepository,
    pub table_repo: TableRepository,
    pub order_repo: OrderRepository,
    pub event_repo: EventRepository,

    pub auth_service: AuthService,
    pub user_service: UserService,
    pub catalog_service: CatalogService,
    pub order_service: OrderService,
    pub closing_service: ClosingService,
    pub reservation_service: ReservationService,
    pub ticket_service: TicketService,
    pub print_station: PrintStation,
}

impl AppState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::with_pool(db_pool, config))
    }

    /// Monta o gráfico de dependências sobre uma pool já criada.
    pub fn with_pool(db_pool: PgPool, config: AppConfig) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let customer_repo = CustomerRepository::new(db_pool.clone());
        let catalog_repo = CatalogRepository::new(db_pool.clone());
        let order_repo = OrderRepository::new(db_pool.clone());
        let table_repo = TableRepository::new(db_pool.clone());
        let reservation_repo = ReservationRepository::new(db_pool.clone());
        let closing_repo = ClosingRepository::new(db_pool.clone());
        let event_repo = EventRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            event_repo.clone(),
            config.jwt_secret.clone(),
            config.superuser_email.clone(),
        );
        let user_service = UserService::new(user_repo, event_repo.clone(), config.upload_dir.clone());
        let catalog_service = CatalogService::new(catalog_repo.clone());
        let order_service = OrderService::new(
            db_pool.clone(),
            order_repo.clone(),
            catalog_repo,
            customer_repo.clone(),
            table_repo.clone(),
        );
        let closing_service = ClosingService::new(
            closing_repo,
            order_repo.clone(),
            customer_repo.clone(),
            event_repo.clone(),
            config.utc_offset,
        );
        let reservation_service = ReservationService::new(reservation_repo, config.utc_offset);

        let ticket_service = TicketService::new(config.fonts_dir.clone());
        let print_station = PrintStation::new(
            Arc::new(SpoolPrinter::new(ticket_service.clone(), config.print_spool_dir.clone())),
            Arc::new(order_repo.clone()),
            config.print_delay,
        );

        Self {
            db_pool,
            config: Arc::new(config),
            i18n_store: I18nStore::new(),
            customer_repo,
            table_repo,
            order_repo,
            event_repo,
            auth_service,
            user_service,
            catalog_service,
            order_service,
            closing_service,
            reservation_service,
            ticket_service,
            print_station,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_fill_optional_values() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/comanda"),
            ("JWT_SECRET", "segredo"),
        ]))
        .unwrap();

        assert_eq!(config.server_addr, "0.0.0.0:3000");
        assert_eq!(config.utc_offset.local_minus_utc(), -3 * 3600);
        assert!(!config.print_station_enabled);
        assert_eq!(config.print_delay, Duration::from_millis(1500));
        assert_eq!(config.superuser_email, None);
    }

    #[test]
    fn missing_secret_aborts() {
        let result = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/comanda")]));
        assert!(result.unwrap_err().to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn bad_numbers_are_reported() {
        let result = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/comanda"),
            ("JWT_SECRET", "segredo"),
            ("PRINT_DELAY_MS", "rápido"),
        ]));
        assert!(result.unwrap_err().to_string().contains("PRINT_DELAY_MS"));
    }

    #[test]
    fn print_station_can_be_enabled() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/comanda"),
            ("JWT_SECRET", "segredo"),
            ("PRINT_STATION_ENABLED", "true"),
            ("UTC_OFFSET_MINUTES", "0"),
        ]))
        .unwrap();

        assert!(config.print_station_enabled);
        assert_eq!(config.utc_offset.local_minus_utc(), 0);
    }

    #[test]
    fn zero_poll_interval_is_refused() {
        let result = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/comanda"),
            ("JWT_SECRET", "segredo"),
            ("PRINT_POLL_INTERVAL_SECS", "0"),
        ]));
        assert!(result.unwrap_err().to_string().contains("PRINT_POLL_INTERVAL_SECS"));
    }

    #[test]
    fn huge_offset_is_an_error_not_a_panic() {
        let result = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/comanda"),
            ("JWT_SECRET", "segredo"),
            ("UTC_OFFSET_MINUTES", "2147483647"),
        ]));
        assert!(result.unwrap_err().to_string().contains("UTC_OFFSET_MINUTES"));
    }
}
