//! Integration tests for the SQLite repository covering search semantics
//! and pagination against a real database.

use chrono::{Duration, Utc};
use taskboard_database::SqliteTaskRepository;
use taskboard_core::{NewTaskItem, TaskQuery, TaskRepository};

async fn create_test_repository() -> SqliteTaskRepository {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let thread_id = std::thread::current().id();
    let db_name = format!(":memory:integration_{timestamp}_{thread_id:?}");
    let repo = SqliteTaskRepository::new(&db_name).await.unwrap();
    repo.migrate().await.unwrap();
    repo
}

async fn seed(repo: &SqliteTaskRepository, count: usize) {
    for i in 0..count {
        repo.create(NewTaskItem::new(
            format!("Task {i}"),
            Some(format!("description {i}")),
            "seeder",
        ))
        .await
        .unwrap();
    }
}

#[tokio::test]
async fn test_list_respects_limit_and_order() {
    let repo = create_test_repository().await;
    seed(&repo, 5).await;

    let tasks = repo.list(3).await.unwrap();
    assert_eq!(tasks.len(), 3);

    // Stable id ordering
    let ids: Vec<i64> = tasks.iter().map(|t| t.id).collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);
}

#[tokio::test]
async fn test_search_title_substring() {
    let repo = create_test_repository().await;

    repo.create(NewTaskItem::new("Fix login redirect", None, "maria"))
        .await
        .unwrap();
    repo.create(NewTaskItem::new("Write release notes", None, "maria"))
        .await
        .unwrap();

    let hits = repo
        .search(TaskQuery {
            title: Some("login".to_string()),
            limit: 10,
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Fix login redirect");
}

#[tokio::test]
async fn test_search_urgent_widens_to_description() {
    let repo = create_test_repository().await;

    // Title has no "urgent" but the description does
    repo.create(NewTaskItem::new(
        "Fix bug",
        Some("urgent fix needed".to_string()),
        "maria",
    ))
    .await
    .unwrap();
    repo.create(NewTaskItem::new(
        "Tidy docs",
        Some("no rush at all".to_string()),
        "maria",
    ))
    .await
    .unwrap();

    let hits = repo
        .search(TaskQuery {
            title: Some("urgent".to_string()),
            limit: 10,
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Fix bug");
}

#[tokio::test]
async fn test_search_description_substring() {
    let repo = create_test_repository().await;
    seed(&repo, 3).await;

    let hits = repo
        .search(TaskQuery {
            description: Some("description 1".to_string()),
            limit: 10,
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Task 1");
}

#[tokio::test]
async fn test_search_degenerate_date_range_is_ignored() {
    let repo = create_test_repository().await;
    seed(&repo, 4).await;

    let now = Utc::now();

    // start >= end: the date filter must be dropped entirely, returning
    // everything as if no date filter were supplied
    let hits = repo
        .search(TaskQuery {
            created_from: Some(now + Duration::days(1)),
            created_to: Some(now - Duration::days(1)),
            limit: 10,
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(hits.len(), 4);
}

#[tokio::test]
async fn test_search_valid_date_range_filters() {
    let repo = create_test_repository().await;
    seed(&repo, 2).await;

    let now = Utc::now();

    // Window fully in the past excludes the fresh rows
    let hits = repo
        .search(TaskQuery {
            created_from: Some(now - Duration::days(2)),
            created_to: Some(now - Duration::days(1)),
            limit: 10,
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(hits.is_empty());

    // Window around now includes them
    let hits = repo
        .search(TaskQuery {
            created_from: Some(now - Duration::hours(1)),
            created_to: Some(now + Duration::hours(1)),
            limit: 10,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(hits.len(), 2);
}

#[tokio::test]
async fn test_pagination_pages_are_disjoint_and_covering() {
    let repo = create_test_repository().await;
    seed(&repo, 15).await;

    let page0 = repo
        .search(TaskQuery {
            offset: 0,
            limit: 10,
            ..Default::default()
        })
        .await
        .unwrap();
    let page1 = repo
        .search(TaskQuery {
            offset: 10,
            limit: 10,
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(page0.len(), 10);
    assert_eq!(page1.len(), 5);

    let mut all_ids: Vec<i64> = page0.iter().chain(page1.iter()).map(|t| t.id).collect();
    let unique_before = all_ids.len();
    all_ids.sort_unstable();
    all_ids.dedup();
    assert_eq!(all_ids.len(), unique_before, "pages must be disjoint");
    assert_eq!(all_ids.len(), 15, "pages must cover the whole store");
}

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let repo = create_test_repository().await;

    let created = repo
        .create(NewTaskItem::new(
            "Round trip",
            Some("payload".to_string()),
            "maria",
        ))
        .await
        .unwrap();

    let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.title, "Round trip");
    assert_eq!(fetched.description.as_deref(), Some("payload"));
    assert_eq!(fetched.created_by, "maria");
}
