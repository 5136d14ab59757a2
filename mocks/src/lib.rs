//! Test doubles for the taskboard workspace
//!
//! - [`repository`] - in-memory [`MockTaskRepository`] with error injection
//!   and call tracking, mirroring the SQLite backend's search semantics
//! - [`builders`] - fluent fixture builders

pub mod builders;
pub mod repository;

pub use builders::TaskItemBuilder;
pub use repository::MockTaskRepository;
