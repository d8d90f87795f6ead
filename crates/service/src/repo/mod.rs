//! Store adapters: in-memory for tests and embedding, SeaORM for Postgres.

pub mod memory;
pub mod seaorm;

pub use memory::{InMemoryBookingStore, InMemoryCatalogStore, InMemoryClientStore, InMemoryProviderStore};
pub use seaorm::{SeaOrmBookingStore, SeaOrmCatalogStore, SeaOrmClientStore, SeaOrmProviderStore};
