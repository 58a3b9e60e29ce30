pub mod user_repo;
pub use user_repo::UserRepository;
pub mod customer_repo;
pub use customer_repo::CustomerRepository;
pub mod catalog_repo;
pub use catalog_repo::CatalogRepository;
pub mod order_repo;
pub use order_repo::{OrderFilter, OrderRepository};
pub mod table_repo;
pub use table_repo::TableRepository;
pub mod reservation_repo;
pub use reservation_repo::ReservationRepository;
pub mod closing_repo;
pub use closing_repo::ClosingRepository;
pub mod event_repo;
pub use event_repo::EventRepository;
