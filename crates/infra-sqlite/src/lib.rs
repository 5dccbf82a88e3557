// Exam Labels Infrastructure - SQLite Adapter
// Implements: ReferenceDataProvider

mod connection;
mod migration;
mod reference_repository;

pub use connection::create_pool;
pub use migration::run_migrations;
pub use reference_repository::SqliteReferenceRepository;

// Note: sqlx::Error conversion is handled by wrapping in helper functions
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
