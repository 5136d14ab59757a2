//! SQLite persistence for the taskboard API
//!
//! Implements [`taskboard_core::repository::TaskRepository`] over sqlx with
//! connection pooling and embedded migrations, plus the serialized
//! audit-log appender used on the create path.

pub mod audit;
pub mod common;
pub mod sqlite;

pub use audit::AuditLog;
pub use sqlite::SqliteTaskRepository;
