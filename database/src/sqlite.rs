use crate::audit::AuditLog;
use crate::common::{
    build_search_query, row_to_task, sqlx_error_to_task_error, status_to_string, TASK_COLUMNS,
};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::path::Path;
use taskboard_core::{
    error::{Result, TaskError},
    models::{NewTaskItem, TaskItem, TaskQuery, TaskStatus, UpdateTaskItem},
    repository::TaskRepository,
};

/// SQLite implementation of the TaskRepository trait
///
/// Provides task persistence using SQLite with connection pooling, prepared
/// statements, and an optional serialized audit-log appender for creates.
pub struct SqliteTaskRepository {
    pool: SqlitePool,
    audit: Option<AuditLog>,
}

impl SqliteTaskRepository {
    /// Create a new SQLite repository with the given database URL
    ///
    /// # Arguments
    /// * `database_url` - SQLite database URL (file path or `:memory:`)
    ///
    /// # Returns
    /// * `Ok(SqliteTaskRepository)` - Successfully connected repository
    /// * `Err(TaskError::Database)` - If connection fails
    ///
    /// # Examples
    /// ```rust,no_run
    /// use taskboard_database::SqliteTaskRepository;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// // In-memory database for testing
    /// let repo = SqliteTaskRepository::new(":memory:").await?;
    ///
    /// // File-based database
    /// let repo = SqliteTaskRepository::new("sqlite:///tmp/tasks.db").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new(database_url: &str) -> Result<Self> {
        let db_url = if database_url.starts_with(":memory:") {
            database_url.to_string()
        } else if database_url.starts_with("sqlite://") {
            database_url.to_string()
        } else {
            format!("sqlite://{database_url}")
        };

        // Create the file-based database if it doesn't exist yet
        if !db_url.contains(":memory:") && !Sqlite::database_exists(&db_url).await.unwrap_or(false)
        {
            match Sqlite::create_database(&db_url).await {
                Ok(_) => tracing::info!("Database created successfully"),
                Err(error) => {
                    tracing::error!("Error creating database: {}", error);
                    return Err(TaskError::Database(format!(
                        "Failed to create database: {error}"
                    )));
                }
            }
        }

        let connect_options = if db_url.contains(":memory:") {
            sqlx::sqlite::SqliteConnectOptions::new()
                .filename(&db_url)
                .create_if_missing(true)
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Memory)
                .busy_timeout(std::time::Duration::from_secs(5))
                .foreign_keys(true)
        } else {
            sqlx::sqlite::SqliteConnectOptions::new()
                .filename(db_url.replace("sqlite://", ""))
                .create_if_missing(true)
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .busy_timeout(std::time::Duration::from_secs(5))
                .foreign_keys(true)
        };

        let pool = SqlitePool::connect_with(connect_options)
            .await
            .map_err(sqlx_error_to_task_error)?;

        Ok(Self { pool, audit: None })
    }

    /// Attach the audit-log appender recording created task ids
    pub async fn with_audit_log(mut self, path: impl AsRef<Path>) -> Result<Self> {
        self.audit = Some(AuditLog::open(path).await?);
        Ok(self)
    }

    /// Run database migrations
    ///
    /// Applies all pending migrations to bring the schema up to date. Call
    /// after creating a new repository instance.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations/sqlite")
            .run(&self.pool)
            .await
            .map_err(|e| TaskError::Database(format!("Migration failed: {e}")))?;

        tracing::info!("Database migrations completed successfully");
        Ok(())
    }

    /// Get access to the underlying database pool for custom operations
    ///
    /// Primarily intended for testing scenarios where direct SQL execution
    /// is needed.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn create(&self, task: NewTaskItem) -> Result<TaskItem> {
        let now = Utc::now();

        let row = sqlx::query(
            r#"
            INSERT INTO tasks (title, description, status, created_at, created_by)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, title, description, status, created_at, updated_at, created_by
            "#,
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(status_to_string(TaskStatus::Pending))
        .bind(now)
        .bind(&task.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(sqlx_error_to_task_error)?;

        let created = row_to_task(&row)?;

        // Audit failures are logged, never propagated into the create result
        if let Some(ref audit) = self.audit {
            if let Err(e) = audit.record_created(created.id).await {
                tracing::warn!(task_id = created.id, error = %e, "Audit log append failed");
            }
        }

        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<TaskItem>> {
        let result = sqlx::query(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(sqlx_error_to_task_error)?;

        match result {
            Some(row) => Ok(Some(row_to_task(&row)?)),
            None => Ok(None),
        }
    }

    async fn list(&self, limit: i64) -> Result<Vec<TaskItem>> {
        let rows = sqlx::query(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks ORDER BY id LIMIT ?"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(sqlx_error_to_task_error)?;

        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row_to_task(&row)?);
        }
        Ok(tasks)
    }

    async fn search(&self, query: TaskQuery) -> Result<Vec<TaskItem>> {
        let mut query_builder = build_search_query(&query);

        let rows = query_builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(sqlx_error_to_task_error)?;

        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row_to_task(&row)?);
        }
        Ok(tasks)
    }

    async fn update(&self, id: i64, changes: UpdateTaskItem) -> Result<TaskItem> {
        let existing = self.get_by_id(id).await?;
        let existing = match existing {
            Some(task) => task,
            None => return Err(TaskError::not_found(id)),
        };

        if changes.is_empty() {
            return Ok(existing);
        }

        let mut query_builder: sqlx::QueryBuilder<sqlx::Sqlite> =
            sqlx::QueryBuilder::new("UPDATE tasks SET ");

        let mut has_updates = false;

        if let Some(ref title) = changes.title {
            query_builder.push("title = ");
            query_builder.push_bind(title);
            has_updates = true;
        }

        if let Some(ref description) = changes.description {
            if has_updates {
                query_builder.push(", ");
            }
            query_builder.push("description = ");
            query_builder.push_bind(description);
        }

        query_builder.push(", updated_at = ");
        query_builder.push_bind(Utc::now());

        query_builder.push(" WHERE id = ");
        query_builder.push_bind(id);
        query_builder
            .push(" RETURNING id, title, description, status, created_at, updated_at, created_by");

        let row = query_builder
            .build()
            .fetch_one(&self.pool)
            .await
            .map_err(sqlx_error_to_task_error)?;

        row_to_task(&row)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(sqlx_error_to_task_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_by_creator(&self, created_by: &str) -> Result<Vec<TaskItem>> {
        // Parameterized lookup only; the identifier is never spliced into SQL
        let rows = sqlx::query(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE created_by = ? ORDER BY id"
        ))
        .bind(created_by)
        .fetch_all(&self.pool)
        .await
        .map_err(sqlx_error_to_task_error)?;

        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row_to_task(&row)?);
        }
        Ok(tasks)
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(sqlx_error_to_task_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn create_test_repository() -> SqliteTaskRepository {
        // Unique in-memory name per test to avoid locking
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let thread_id = std::thread::current().id();
        let db_name = format!(":memory:test_{timestamp}_{thread_id:?}");
        let repo = SqliteTaskRepository::new(&db_name).await.unwrap();
        repo.migrate().await.unwrap();
        repo
    }

    #[tokio::test]
    async fn test_repository_creation() {
        let repo = create_test_repository().await;
        assert!(repo.health_check().await.is_ok());
    }

    #[tokio::test]
    async fn test_create_task() {
        let repo = create_test_repository().await;

        let created = repo
            .create(NewTaskItem::new(
                "Fix login redirect",
                Some("users land on 404".to_string()),
                "maria",
            ))
            .await
            .unwrap();

        assert!(created.id > 0);
        assert_eq!(created.title, "Fix login redirect");
        assert_eq!(created.status, TaskStatus::Pending);
        assert_eq!(created.created_by, "maria");
        assert!(created.updated_at.is_none());
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let repo = create_test_repository().await;

        let created = repo
            .create(NewTaskItem::new("Get test", None, "maria"))
            .await
            .unwrap();

        let retrieved = repo.get_by_id(created.id).await.unwrap();
        assert!(retrieved.is_some());
        assert_eq!(retrieved.unwrap(), created);

        // Absence is Ok(None), not an error
        let not_found = repo.get_by_id(99999).await.unwrap();
        assert!(not_found.is_none());
    }

    #[tokio::test]
    async fn test_update_stamps_updated_at() {
        let repo = create_test_repository().await;

        let created = repo
            .create(NewTaskItem::new("Before", None, "maria"))
            .await
            .unwrap();
        assert!(created.updated_at.is_none());

        let updated = repo
            .update(
                created.id,
                UpdateTaskItem {
                    title: Some("After".to_string()),
                    description: Some("now described".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "After");
        assert_eq!(updated.description.as_deref(), Some("now described"));
        assert!(updated.updated_at.is_some());
        // created_at and creator are untouched
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.created_by, created.created_by);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = create_test_repository().await;

        let result = repo
            .update(
                424242,
                UpdateTaskItem {
                    title: Some("nope".to_string()),
                    description: None,
                },
            )
            .await;

        assert!(matches!(result, Err(TaskError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_returns_bool() {
        let repo = create_test_repository().await;

        let created = repo
            .create(NewTaskItem::new("Delete me", None, "maria"))
            .await
            .unwrap();

        assert!(repo.delete(created.id).await.unwrap());
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
        // Second delete of the same id is false, not an error
        assert!(!repo.delete(created.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_find_by_creator() {
        let repo = create_test_repository().await;

        repo.create(NewTaskItem::new("One", None, "maria"))
            .await
            .unwrap();
        repo.create(NewTaskItem::new("Two", None, "jan"))
            .await
            .unwrap();
        repo.create(NewTaskItem::new("Three", None, "maria"))
            .await
            .unwrap();

        let marias = repo.find_by_creator("maria").await.unwrap();
        assert_eq!(marias.len(), 2);
        assert!(marias.iter().all(|t| t.created_by == "maria"));

        let nobody = repo.find_by_creator("nobody").await.unwrap();
        assert!(nobody.is_empty());
    }

    #[tokio::test]
    async fn test_create_appends_audit_line() {
        let dir = tempfile::tempdir().unwrap();
        let audit_path = dir.path().join("audit.log");

        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let db_name = format!(":memory:audit_{timestamp}");
        let repo = SqliteTaskRepository::new(&db_name)
            .await
            .unwrap()
            .with_audit_log(&audit_path)
            .await
            .unwrap();
        repo.migrate().await.unwrap();

        let created = repo
            .create(NewTaskItem::new("Audited", None, "maria"))
            .await
            .unwrap();

        let content = tokio::fs::read_to_string(&audit_path).await.unwrap();
        assert!(content.contains(&format!("task_id={} created", created.id)));
    }
}
