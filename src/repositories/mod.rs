// Repositories module - data access layer

pub mod product_repository;
pub mod session_backend;
pub mod session_store;


pub use product_repository::{demo_products, next_numeric_id, InMemoryProductCatalog, ProductCatalog};
pub use session_backend::{spawn_expired_session_cleanup, ExpiringMemoryStore};
pub use session_store::{get_or_default, set, InMemorySessionStore, SessionStore};
