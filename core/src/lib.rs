//! Taskboard Core Library
//!
//! This crate provides the domain models, error taxonomy, and trait
//! interfaces for the taskboard API. All other crates depend on the types
//! and interfaces defined here.
//!
//! # Architecture
//!
//! - [`models`] - Domain models (TaskItem, TaskStatus, TaskDto, ...)
//! - [`error`] - Error types and result handling
//! - [`repository`] - Repository trait for data persistence
//! - [`service`] - Task service: validation, orchestration, projection
//! - [`validation`] - Input validation and the urgent widening predicate
//!
//! # Example
//!
//! ```rust
//! use taskboard_core::{
//!     models::NewTaskItem,
//!     validation::TaskValidator,
//! };
//!
//! let new_task = NewTaskItem::new(
//!     "Design the schema",
//!     Some("Single tasks table, id primary key".to_string()),
//!     "maria",
//! );
//!
//! TaskValidator::validate_new_task(&new_task).unwrap();
//! ```

pub mod error;
pub mod models;
pub mod repository;
pub mod service;
pub mod validation;

// Re-export commonly used types at the crate root for convenience
pub use error::{Result, TaskError};
pub use models::{NewTaskItem, TaskDto, TaskItem, TaskQuery, TaskStatus, UpdateTaskItem};
pub use repository::TaskRepository;
pub use service::{SearchParams, TaskService, DEFAULT_PAGE_SIZE};
pub use validation::TaskValidator;

/// Current version of the core crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Current crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
