use crate::{
    error::Result,
    models::{NewTaskItem, TaskItem, TaskQuery, UpdateTaskItem},
};
use async_trait::async_trait;

/// Repository trait for task persistence and retrieval operations
///
/// This trait defines the interface for all task data operations.
/// Implementations must be thread-safe and support concurrent access.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Create a new task
    ///
    /// Inserts a record with status Pending and the current timestamp,
    /// assigning a generated identifier.
    ///
    /// # Returns
    /// * `Ok(TaskItem)` - The persisted task with assigned ID
    /// * `Err(TaskError::Database)` - If the database operation fails
    async fn create(&self, task: NewTaskItem) -> Result<TaskItem>;

    /// Get a task by its numeric ID
    ///
    /// # Returns
    /// * `Ok(Some(TaskItem))` - The task if found
    /// * `Ok(None)` - If no task exists with that ID; never an error
    /// * `Err(TaskError::Database)` - If the database operation fails
    async fn get_by_id(&self, id: i64) -> Result<Option<TaskItem>>;

    /// List up to `limit` tasks in stable id order
    ///
    /// # Returns
    /// * `Ok(Vec<TaskItem>)` - The tasks (may be empty)
    /// * `Err(TaskError::Database)` - If the database operation fails
    async fn list(&self, limit: i64) -> Result<Vec<TaskItem>>;

    /// Search tasks matching the given criteria
    ///
    /// Substring filters on title/description, an optional creation-date
    /// window (applied only when well-formed, see [`TaskQuery::date_window`]),
    /// and offset/limit pagination over a stable id ordering. The title
    /// filter is subject to the urgent widening rule.
    ///
    /// # Returns
    /// * `Ok(Vec<TaskItem>)` - The matching tasks (may be empty)
    /// * `Err(TaskError::Database)` - If the database operation fails
    async fn search(&self, query: TaskQuery) -> Result<Vec<TaskItem>>;

    /// Update an existing task in place
    ///
    /// Only the provided fields are overwritten; `updated_at` is stamped.
    ///
    /// # Returns
    /// * `Ok(TaskItem)` - The updated task
    /// * `Err(TaskError::NotFound)` - If the task doesn't exist
    /// * `Err(TaskError::Database)` - If the database operation fails
    async fn update(&self, id: i64, changes: UpdateTaskItem) -> Result<TaskItem>;

    /// Delete a task by identifier
    ///
    /// # Returns
    /// * `Ok(true)` - The row was removed
    /// * `Ok(false)` - No row existed with that ID; not an error
    /// * `Err(TaskError::Database)` - If the database operation fails
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Find all tasks created by the given user
    ///
    /// Implementations must use parameterized queries exclusively; building
    /// SQL by string concatenation of the identifier is banned.
    ///
    /// # Returns
    /// * `Ok(Vec<TaskItem>)` - The creator's tasks (may be empty)
    /// * `Err(TaskError::Database)` - If the database operation fails
    async fn find_by_creator(&self, created_by: &str) -> Result<Vec<TaskItem>>;

    /// Get repository health status for monitoring
    ///
    /// # Returns
    /// * `Ok(())` - Repository is healthy and connected
    /// * `Err(TaskError::Database)` - Repository is unhealthy
    async fn health_check(&self) -> Result<()>;
}
