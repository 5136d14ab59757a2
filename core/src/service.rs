use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    error::{Result, TaskError},
    models::{NewTaskItem, TaskDto, TaskQuery, UpdateTaskItem},
    repository::TaskRepository,
    validation::TaskValidator,
};

/// Page size used when configuration provides none.
///
/// Pagination is the only setting permitted a silent fallback; every
/// security-related value must fail fast instead.
pub const DEFAULT_PAGE_SIZE: i64 = 25;

/// Search parameters as accepted at the service boundary.
///
/// `page` and `page_size` arrive unnormalized; [`TaskService::search`] clamps
/// them and computes the row offset before delegating to the repository.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchParams {
    pub title: Option<String>,
    pub description: Option<String>,
    pub created_from: Option<chrono::DateTime<Utc>>,
    pub created_to: Option<chrono::DateTime<Utc>>,
    pub page: i64,
    pub page_size: i64,
}

/// Orchestrates validation, persistence, and DTO projection for tasks.
///
/// Failures surface as distinct [`TaskError`] kinds: validation, not-found,
/// and infrastructure errors are never collapsed into a single absent value.
/// The HTTP boundary decides the response status per kind.
pub struct TaskService<R> {
    repository: Arc<R>,
    page_size: i64,
}

impl<R: TaskRepository> TaskService<R> {
    /// Create a service over the given repository with the configured page
    /// size for unpaginated listings.
    pub fn new(repository: Arc<R>, page_size: i64) -> Self {
        Self {
            repository,
            page_size: page_size.max(1),
        }
    }

    /// Create a service with the default page size of 25.
    pub fn with_default_page_size(repository: Arc<R>) -> Self {
        Self::new(repository, DEFAULT_PAGE_SIZE)
    }

    /// Create a new task.
    ///
    /// Rejects an empty or whitespace-only title with a validation error and
    /// a logged warning; nothing is persisted in that case. Otherwise the
    /// task is stored with status Pending and the current UTC timestamp.
    pub async fn create(&self, new_task: NewTaskItem) -> Result<TaskDto> {
        if let Err(e) = TaskValidator::validate_new_task(&new_task) {
            warn!(error = %e, "Rejected task creation");
            return Err(e);
        }

        let task = self.repository.create(new_task).await?;
        info!(task_id = task.id, "Task created");
        Ok(TaskDto::from(task))
    }

    /// Return every visible task as DTOs.
    ///
    /// Capped at the configured page size; this listing exposes no pagination
    /// parameters of its own. Callers that need paging use [`Self::search`].
    pub async fn get_all(&self) -> Result<Vec<TaskDto>> {
        let tasks = self.repository.list(self.page_size).await?;
        Ok(tasks.iter().map(TaskDto::from).collect())
    }

    /// Fetch a single task by identifier.
    ///
    /// A missing row is `Err(TaskError::NotFound)`, which is distinct from
    /// an unreachable database (`Err(TaskError::Database)`).
    pub async fn get_by_id(&self, id: i64) -> Result<TaskDto> {
        match self.repository.get_by_id(id).await? {
            Some(task) => Ok(TaskDto::from(task)),
            None => Err(TaskError::not_found(id)),
        }
    }

    /// Overwrite the provided fields of an existing task.
    ///
    /// Stamps the update time. Title validation intentionally does not run
    /// on this path; only the create path enforces the non-empty invariant.
    pub async fn update(&self, id: i64, changes: UpdateTaskItem) -> Result<TaskDto> {
        let task = self.repository.update(id, changes).await?;
        info!(task_id = task.id, "Task updated");
        Ok(TaskDto::from(task))
    }

    /// Delete a task by identifier.
    ///
    /// A missing id yields `Ok(false)`, never an error; infrastructure
    /// failures propagate as errors.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let deleted = self.repository.delete(id).await?;
        if deleted {
            info!(task_id = id, "Task deleted");
        }
        Ok(deleted)
    }

    /// Search tasks with substring, date-window, and pagination criteria.
    ///
    /// Normalizes `page` to be non-negative and `page_size` to at least 1,
    /// computes `offset = page * page_size` (saturating, so an absurd page
    /// number yields an empty page instead of overflowing), and delegates.
    /// The date window and the urgent widening rule are the repository's
    /// concern.
    pub async fn search(&self, params: SearchParams) -> Result<Vec<TaskDto>> {
        let page = params.page.max(0);
        let page_size = params.page_size.max(1);

        let query = TaskQuery {
            title: params.title,
            description: params.description,
            created_from: params.created_from,
            created_to: params.created_to,
            offset: page.saturating_mul(page_size),
            limit: page_size,
        };

        let tasks = self.repository.search(query).await?;
        Ok(tasks.iter().map(TaskDto::from).collect())
    }

    /// Return all tasks created by the given user.
    pub async fn tasks_by_creator(&self, created_by: &str) -> Result<Vec<TaskDto>> {
        let tasks = self.repository.find_by_creator(created_by).await?;
        Ok(tasks.iter().map(TaskDto::from).collect())
    }

    /// Process an uploaded file payload.
    ///
    /// Decodes the body as UTF-8 text, logs the character count, and returns
    /// a confirmation string. A non-UTF-8 payload is a validation error, not
    /// an empty result.
    pub async fn process_upload(&self, name: &str, content: &[u8]) -> Result<String> {
        let text = std::str::from_utf8(content)
            .map_err(|e| TaskError::Validation(format!("File '{name}' is not valid UTF-8: {e}")))?;

        let chars = text.chars().count();
        info!(file = name, chars, "Processed uploaded file");
        Ok(format!("Processed '{name}': {chars} characters"))
    }

    /// Repository connectivity probe for the health endpoint.
    pub async fn health_check(&self) -> Result<()> {
        self.repository.health_check().await
    }
}
