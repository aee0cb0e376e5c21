//! Storage infrastructure - datastore backends and schema

mod factory;
mod in_memory;
pub mod migrations;
mod postgres;

pub use factory::{Repositories, StorageConfig, StorageFactory, StorageType};
pub use in_memory::{InMemoryDatabase, Tables};
pub use migrations::{run_storage_migrations, Migration, Migrator, PostgresMigrator};
pub(crate) use postgres::map_write_error;
pub use postgres::PostgresConfig;
