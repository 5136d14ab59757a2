use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use taskboard_core::service::TaskService;
use taskboard_database::SqliteTaskRepository;
use taskboard_http::ApiServer;
use tracing::info;

use crate::config::Config;

/// Create a task repository based on the complete configuration
pub async fn create_repository(config: &Config) -> Result<Arc<SqliteTaskRepository>> {
    info!("Creating task repository");

    let database_url = config.database_url();
    info!("Initializing SQLite repository at: {}", database_url);

    let mut repo = SqliteTaskRepository::new(&database_url)
        .await
        .context("Failed to create SQLite repository")?;

    if let Some(audit_path) = &config.database.audit_log {
        info!("Enabling task creation audit log at: {}", audit_path);
        repo = repo
            .with_audit_log(audit_path)
            .await
            .context("Failed to open audit log")?;
    }

    info!("Running database migrations");
    repo.migrate()
        .await
        .context("Failed to run database migrations")?;

    info!("Task repository created successfully");
    Ok(Arc::new(repo))
}

/// Initialize the complete application
pub async fn initialize_app(config: &Config) -> Result<ApiServer<SqliteTaskRepository>> {
    info!("Initializing application");

    let repository = create_repository(config)
        .await
        .context("Failed to create repository")?;

    let service = Arc::new(TaskService::new(
        repository,
        config.pagination.page_size,
    ));

    let server = ApiServer::new(service);

    info!("Application initialized successfully");
    Ok(server)
}

/// Ensure the database directory exists using config
pub fn ensure_database_directory_from_config(config: &Config) -> Result<()> {
    let database_url = config.database_url();
    ensure_database_directory(&database_url)
}

/// Ensure the database directory exists and set secure permissions
pub fn ensure_database_directory(database_url: &str) -> Result<()> {
    if let Some(db_path) = database_url.strip_prefix("sqlite://") {
        let db_path = Path::new(db_path);

        if let Some(parent) = db_path.parent() {
            if !parent.exists() {
                info!("Creating database directory: {}", parent.display());
                std::fs::create_dir_all(parent).context("Failed to create database directory")?;

                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    let permissions = std::fs::Permissions::from_mode(0o700);
                    std::fs::set_permissions(parent, permissions)
                        .context("Failed to set directory permissions")?;
                }
            }
        }
    }
    Ok(())
}
