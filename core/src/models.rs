use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tracked task as persisted in the store.
///
/// Tasks are created in the [`TaskStatus::Pending`] status and keep that
/// status for their whole lifetime: no exposed operation transitions it.
/// `updated_at` is `None` until the first update.
///
/// # Examples
///
/// ```rust
/// use taskboard_core::models::{TaskItem, TaskStatus};
/// use chrono::Utc;
///
/// let task = TaskItem {
///     id: 42,
///     title: "Fix login redirect".to_string(),
///     description: Some("Users land on a 404 after OAuth".to_string()),
///     status: TaskStatus::Pending,
///     created_at: Utc::now(),
///     updated_at: None,
///     created_by: "maria".to_string(),
/// };
///
/// assert_eq!(task.status, TaskStatus::Pending);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskItem {
    /// Auto-increment primary key
    pub id: i64,
    /// Brief task title, non-empty at creation
    pub title: String,
    /// Optional detailed description
    pub description: Option<String>,
    /// Current status, defaults to Pending
    pub status: TaskStatus,
    /// Creation timestamp (UTC)
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp, set on update only
    pub updated_at: Option<DateTime<Utc>>,
    /// Identifier of the creating user, immutable post-creation
    pub created_by: String,
}

/// Task status enumeration.
///
/// Every task starts as `Pending`. The other variants exist in the schema
/// and the transfer shape but no exposed operation moves a task between
/// them; there is no state machine here.
#[derive(Debug, Clone, Copy, Hash, Serialize, Deserialize, PartialEq, Eq)]
pub enum TaskStatus {
    /// Newly created, not started
    Pending,
    /// Actively being worked on
    InProgress,
    /// Finished
    Completed,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "Pending"),
            TaskStatus::InProgress => write!(f, "InProgress"),
            TaskStatus::Completed => write!(f, "Completed"),
        }
    }
}

/// Data transfer object for creating new tasks
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewTaskItem {
    /// Task title (required, validated non-empty at the service layer)
    pub title: String,
    /// Optional description
    pub description: Option<String>,
    /// Identifier of the creating user
    pub created_by: String,
}

impl NewTaskItem {
    pub fn new(title: impl Into<String>, description: Option<String>, created_by: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description,
            created_by: created_by.into(),
        }
    }
}

/// Data transfer object for updating existing tasks.
///
/// Only the provided fields are overwritten; status and created_by are
/// immutable through this path.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct UpdateTaskItem {
    /// Optional new title
    pub title: Option<String>,
    /// Optional new description
    pub description: Option<String>,
}

impl UpdateTaskItem {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}

/// Transfer shape serialized at the HTTP boundary.
///
/// One-to-one projection of [`TaskItem`] with the status rendered as text;
/// created per request and discarded after serialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskDto {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
}

impl From<&TaskItem> for TaskDto {
    fn from(task: &TaskItem) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status.to_string(),
            created_at: task.created_at,
            created_by: task.created_by.clone(),
        }
    }
}

impl From<TaskItem> for TaskDto {
    fn from(task: TaskItem) -> Self {
        Self::from(&task)
    }
}

/// Repository-level search criteria.
///
/// Substring filters are optional; the creation-date window is applied only
/// when both bounds are present and `created_from < created_to`. Offset and
/// limit are already normalized by the service layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskQuery {
    /// Substring match on title (subject to the urgent widening rule)
    pub title: Option<String>,

    /// Substring match on description
    pub description: Option<String>,

    /// Lower bound on creation time
    pub created_from: Option<DateTime<Utc>>,

    /// Upper bound on creation time
    pub created_to: Option<DateTime<Utc>>,

    /// Number of rows to skip
    pub offset: i64,

    /// Maximum number of rows to return
    pub limit: i64,
}

impl TaskQuery {
    /// Whether the date window should constrain the query at all.
    ///
    /// A missing bound or a degenerate range (from >= to) means the filter
    /// is ignored entirely, which is not an error and not an empty result.
    pub fn date_window(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match (self.created_from, self.created_to) {
            (Some(from), Some(to)) if from < to => Some((from, to)),
            _ => None,
        }
    }
}
