pub mod auth;
pub mod catalog_service;
pub mod closing_service;
pub mod order_items;
pub mod order_service;
pub mod print_station;
pub mod reservation_service;
pub mod station_service;
pub mod ticket_service;
pub mod user_service;
