//! Builders for constructing test fixtures with sensible defaults

use chrono::{DateTime, Duration, Utc};
use taskboard_core::{TaskItem, TaskStatus};

/// Fluent builder for [`TaskItem`] test fixtures
///
/// ```rust
/// use taskboard_mocks::TaskItemBuilder;
///
/// let task = TaskItemBuilder::new(1)
///     .title("Fix bug")
///     .description("urgent fix needed")
///     .created_by("maria")
///     .build();
/// assert_eq!(task.id, 1);
/// ```
pub struct TaskItemBuilder {
    task: TaskItem,
}

impl TaskItemBuilder {
    pub fn new(id: i64) -> Self {
        Self {
            task: TaskItem {
                id,
                title: format!("Task {id}"),
                description: None,
                status: TaskStatus::Pending,
                created_at: Utc::now(),
                updated_at: None,
                created_by: "test-user".to_string(),
            },
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.task.title = title.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.task.description = Some(description.into());
        self
    }

    pub fn created_by(mut self, created_by: impl Into<String>) -> Self {
        self.task.created_by = created_by.into();
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.task.created_at = created_at;
        self
    }

    /// Shift the creation timestamp the given number of days into the past
    pub fn created_days_ago(mut self, days: i64) -> Self {
        self.task.created_at = Utc::now() - Duration::days(days);
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.task.status = status;
        self
    }

    pub fn build(self) -> TaskItem {
        self.task
    }
}
