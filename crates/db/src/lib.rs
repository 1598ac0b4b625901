//! Persistence layer: connection bootstrap, models, and the session store.

pub mod connect;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use connect::{connect, ConnectOptions};
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::{AuthStore, StoreError};

pub type DbPool = sqlx::PgPool;

/// Apply all pending migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
