//! Mock implementation of the TaskRepository trait
//!
//! Provides a thread-safe in-memory repository with:
//! - Error injection capabilities
//! - Call tracking for verification
//! - The same search semantics as the SQLite backend (substring filters,
//!   the urgent widening rule, the date-window rule, stable id ordering)

use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use taskboard_core::{
    validation::{urgent_marker, urgent_widening_applies},
    NewTaskItem, Result, TaskError, TaskItem, TaskQuery, TaskRepository, TaskStatus,
    UpdateTaskItem,
};

/// In-memory mock of [`TaskRepository`] for testing
pub struct MockTaskRepository {
    tasks: Arc<Mutex<HashMap<i64, TaskItem>>>,
    next_id: Arc<AtomicI64>,
    error_injection: Arc<Mutex<Option<TaskError>>>,
    call_history: Arc<Mutex<Vec<String>>>,
}

impl Default for MockTaskRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTaskRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self {
            tasks: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
            error_injection: Arc::new(Mutex::new(None)),
            call_history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create mock repository with pre-populated tasks
    pub fn with_tasks(tasks: Vec<TaskItem>) -> Self {
        let mut task_map = HashMap::new();
        let mut max_id = 0;

        for task in tasks {
            if task.id > max_id {
                max_id = task.id;
            }
            task_map.insert(task.id, task);
        }

        Self {
            tasks: Arc::new(Mutex::new(task_map)),
            next_id: Arc::new(AtomicI64::new(max_id + 1)),
            error_injection: Arc::new(Mutex::new(None)),
            call_history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Inject an error for the next operation
    pub fn inject_error(&self, error: TaskError) {
        *self.error_injection.lock() = Some(error);
    }

    /// Clear any pending injected error
    pub fn clear_error(&self) {
        *self.error_injection.lock() = None;
    }

    /// Get history of called methods
    pub fn call_history(&self) -> Vec<String> {
        self.call_history.lock().clone()
    }

    /// Assert a method was called
    pub fn assert_called(&self, method: &str) {
        let history = self.call_history.lock();
        assert!(
            history.iter().any(|call| call.contains(method)),
            "Method '{}' was not called. Call history: {:?}",
            method,
            *history
        );
    }

    /// Number of stored tasks
    pub fn len(&self) -> usize {
        self.tasks.lock().len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.tasks.lock().is_empty()
    }

    fn check_error_injection(&self) -> Result<()> {
        let mut error_opt = self.error_injection.lock();
        if let Some(error) = error_opt.take() {
            return Err(error);
        }
        Ok(())
    }

    fn record_call(&self, method: &str, params: &str) {
        self.call_history.lock().push(format!("{method}({params})"));
    }

    fn sorted_by_id(tasks: &HashMap<i64, TaskItem>) -> Vec<TaskItem> {
        let mut all: Vec<TaskItem> = tasks.values().cloned().collect();
        all.sort_by_key(|t| t.id);
        all
    }
}

fn matches_query(task: &TaskItem, query: &TaskQuery) -> bool {
    if let Some(ref term) = query.title {
        let title_hit = task.title.contains(term.as_str());
        // Urgent widening: the title predicate also accepts a description hit
        let widened_hit = urgent_widening_applies(term)
            && task
                .description
                .as_deref()
                .is_some_and(|d| d.contains(urgent_marker()));
        if !title_hit && !widened_hit {
            return false;
        }
    }

    if let Some(ref term) = query.description {
        let hit = task
            .description
            .as_deref()
            .is_some_and(|d| d.contains(term.as_str()));
        if !hit {
            return false;
        }
    }

    if let Some((from, to)) = query.date_window() {
        if task.created_at < from || task.created_at > to {
            return false;
        }
    }

    true
}

#[async_trait]
impl TaskRepository for MockTaskRepository {
    async fn create(&self, task: NewTaskItem) -> Result<TaskItem> {
        self.record_call("create", &format!("title={}", task.title));
        self.check_error_injection()?;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let new_task = TaskItem {
            id,
            title: task.title,
            description: task.description,
            status: TaskStatus::Pending,
            created_at: Utc::now(),
            updated_at: None,
            created_by: task.created_by,
        };

        self.tasks.lock().insert(id, new_task.clone());
        Ok(new_task)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<TaskItem>> {
        self.record_call("get_by_id", &format!("id={id}"));
        self.check_error_injection()?;

        Ok(self.tasks.lock().get(&id).cloned())
    }

    async fn list(&self, limit: i64) -> Result<Vec<TaskItem>> {
        self.record_call("list", &format!("limit={limit}"));
        self.check_error_injection()?;

        let tasks = self.tasks.lock();
        let mut all = Self::sorted_by_id(&tasks);
        all.truncate(limit.max(0) as usize);
        Ok(all)
    }

    async fn search(&self, query: TaskQuery) -> Result<Vec<TaskItem>> {
        self.record_call(
            "search",
            &format!("offset={}, limit={}", query.offset, query.limit),
        );
        self.check_error_injection()?;

        let tasks = self.tasks.lock();
        let matches: Vec<TaskItem> = Self::sorted_by_id(&tasks)
            .into_iter()
            .filter(|t| matches_query(t, &query))
            .skip(query.offset.max(0) as usize)
            .take(query.limit.max(0) as usize)
            .collect();
        Ok(matches)
    }

    async fn update(&self, id: i64, changes: UpdateTaskItem) -> Result<TaskItem> {
        self.record_call("update", &format!("id={id}"));
        self.check_error_injection()?;

        let mut tasks = self.tasks.lock();
        let task = tasks.get_mut(&id).ok_or_else(|| TaskError::not_found(id))?;

        if let Some(title) = changes.title {
            task.title = title;
        }
        if let Some(description) = changes.description {
            task.description = Some(description);
        }
        task.updated_at = Some(Utc::now());

        Ok(task.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        self.record_call("delete", &format!("id={id}"));
        self.check_error_injection()?;

        Ok(self.tasks.lock().remove(&id).is_some())
    }

    async fn find_by_creator(&self, created_by: &str) -> Result<Vec<TaskItem>> {
        self.record_call("find_by_creator", &format!("created_by={created_by}"));
        self.check_error_injection()?;

        let tasks = self.tasks.lock();
        Ok(Self::sorted_by_id(&tasks)
            .into_iter()
            .filter(|t| t.created_by == created_by)
            .collect())
    }

    async fn health_check(&self) -> Result<()> {
        self.record_call("health_check", "");
        self.check_error_injection()?;
        Ok(())
    }
}
