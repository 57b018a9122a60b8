//! DishDive Store: SQLite persistence for restaurants, dishes, keywords,
//! review links and user settings.

pub mod schema;
pub mod sqlite;
pub mod types;

pub use sqlite::SqliteStore;
pub use types::*;
