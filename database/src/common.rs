use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row};
use taskboard_core::{
    error::{Result, TaskError},
    models::{TaskItem, TaskQuery, TaskStatus},
    validation::{urgent_marker, urgent_widening_applies},
};

/// Columns selected for every task read, in row_to_task order
pub const TASK_COLUMNS: &str = "id, title, description, status, created_at, updated_at, created_by";

/// Convert TaskStatus enum to string for database storage
pub fn status_to_string(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "Pending",
        TaskStatus::InProgress => "InProgress",
        TaskStatus::Completed => "Completed",
    }
}

/// Convert string from database to TaskStatus enum
pub fn string_to_status(s: &str) -> Result<TaskStatus> {
    match s {
        "Pending" => Ok(TaskStatus::Pending),
        "InProgress" => Ok(TaskStatus::InProgress),
        "Completed" => Ok(TaskStatus::Completed),
        _ => Err(TaskError::Database(format!(
            "Invalid task status in database: {s}"
        ))),
    }
}

/// Convert a SQLite row to the TaskItem model
pub fn row_to_task(row: &SqliteRow) -> Result<TaskItem> {
    let status_str: String = row.get("status");
    let status = string_to_status(&status_str)?;

    let created_at: DateTime<Utc> = row.get("created_at");
    let updated_at: Option<DateTime<Utc>> = row.get("updated_at");

    Ok(TaskItem {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        status,
        created_at,
        updated_at,
        created_by: row.get("created_by"),
    })
}

/// Convert a sqlx error to TaskError
pub fn sqlx_error_to_task_error(err: sqlx::Error) -> TaskError {
    match &err {
        sqlx::Error::Database(db_err) => {
            TaskError::Database(format!("Database constraint error: {}", db_err.message()))
        }
        sqlx::Error::RowNotFound => {
            // Absence is handled with fetch_optional at the call sites
            TaskError::Database("Unexpected RowNotFound error".to_string())
        }
        sqlx::Error::PoolTimedOut => TaskError::Database("Connection pool timeout".to_string()),
        sqlx::Error::Io(io_err) => TaskError::Database(format!("Database I/O error: {io_err}")),
        _ => TaskError::Database(format!("Database operation failed: {err}")),
    }
}

/// Build the dynamic search query using QueryBuilder with proper type binding
///
/// Substring filters on title and description, the urgent widening rule on
/// the title predicate, the well-formed-only date window, and offset/limit
/// pagination over a stable id ordering.
pub fn build_search_query(query: &TaskQuery) -> sqlx::QueryBuilder<'static, sqlx::Sqlite> {
    let mut query_builder: sqlx::QueryBuilder<sqlx::Sqlite> =
        sqlx::QueryBuilder::new(format!("SELECT {TASK_COLUMNS} FROM tasks"));

    let mut has_conditions = false;

    if let Some(ref term) = query.title {
        query_builder.push(" WHERE ");
        has_conditions = true;

        if urgent_widening_applies(term) {
            // Widened predicate: a description hit on the marker also counts
            query_builder.push("(title LIKE ");
            query_builder.push_bind(format!("%{term}%"));
            query_builder.push(" OR description LIKE ");
            query_builder.push_bind(format!("%{}%", urgent_marker()));
            query_builder.push(")");
        } else {
            query_builder.push("title LIKE ");
            query_builder.push_bind(format!("%{term}%"));
        }
    }

    if let Some(ref term) = query.description {
        if has_conditions {
            query_builder.push(" AND ");
        } else {
            query_builder.push(" WHERE ");
            has_conditions = true;
        }
        query_builder.push("description LIKE ");
        query_builder.push_bind(format!("%{term}%"));
    }

    if let Some((from, to)) = query.date_window() {
        if has_conditions {
            query_builder.push(" AND ");
        } else {
            query_builder.push(" WHERE ");
        }
        query_builder.push("created_at >= ");
        query_builder.push_bind(from);
        query_builder.push(" AND created_at <= ");
        query_builder.push_bind(to);
    }

    query_builder.push(" ORDER BY id");

    query_builder.push(" LIMIT ");
    query_builder.push_bind(query.limit);
    query_builder.push(" OFFSET ");
    query_builder.push_bind(query.offset);

    query_builder
}
