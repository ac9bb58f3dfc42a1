//! Integration tests for the SQLite repositories
//!
//! These tests verify the repository ports using an in-memory SQLite
//! database. Each test function creates a fresh database to ensure test
//! isolation.

use catalog_core::domain::newtypes::{Email, ExternalId, ProductId, UserId};
use catalog_core::domain::product::Product;
use catalog_core::domain::record::ExternalRecord;
use catalog_core::domain::sync_run::{ReconcileReport, RunError, RunStatus, SyncRun};
use catalog_core::domain::user::{Role, User};
use catalog_core::ports::repositories::{
    IProductRepository, IRunRepository, IUserRepository, ProductFilter,
};
use catalog_store::{
    DatabasePool, SqliteProductRepository, SqliteRunRepository, SqliteUserRepository,
};

// ============================================================================
// Test helpers
// ============================================================================

/// Create a fresh in-memory pool for each test
async fn setup() -> DatabasePool {
    DatabasePool::in_memory()
        .await
        .expect("Failed to create in-memory database")
}

fn external_record(external_id: &str, name: &str, price: f64) -> ExternalRecord {
    ExternalRecord {
        external_id: ExternalId::new(external_id).unwrap(),
        name: name.to_string(),
        description: Some(format!("{name} description")),
        price,
        category: Some("general".to_string()),
        raw_payload: serde_json::Value::Null,
    }
}

fn test_user(email: &str, role: Role) -> User {
    User::new(
        Email::new(email).unwrap(),
        "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA",
        role,
    )
}

// ============================================================================
// Product tests
// ============================================================================

#[tokio::test]
async fn test_insert_and_get_product() {
    let pool = setup().await;
    let repo = SqliteProductRepository::new(pool.pool().clone());

    let product = Product::from_external(&external_record("a1", "Desk lamp", 24.99)).unwrap();
    repo.insert(&product).await.unwrap();

    let retrieved = repo.get(product.id()).await.unwrap().unwrap();
    assert_eq!(retrieved.name(), "Desk lamp");
    assert_eq!(retrieved.price(), 24.99);
    assert_eq!(retrieved.external_id().unwrap().as_str(), "a1");
    assert_eq!(retrieved.category(), Some("general"));
}

#[tokio::test]
async fn test_get_product_not_found() {
    let pool = setup().await;
    let repo = SqliteProductRepository::new(pool.pool().clone());

    let result = repo.get(&ProductId::new()).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_get_by_external_id() {
    let pool = setup().await;
    let repo = SqliteProductRepository::new(pool.pool().clone());

    let product = Product::from_external(&external_record("ext-7", "Mug", 8.0)).unwrap();
    repo.insert(&product).await.unwrap();

    let found = repo
        .get_by_external_id(&ExternalId::new("ext-7").unwrap())
        .await
        .unwrap();
    assert_eq!(found.unwrap().id(), product.id());

    let missing = repo
        .get_by_external_id(&ExternalId::new("ext-8").unwrap())
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_manual_product_has_null_external_id() {
    let pool = setup().await;
    let repo = SqliteProductRepository::new(pool.pool().clone());

    let product = Product::new_manual("Hand-entered", None, 1.0, None).unwrap();
    repo.insert(&product).await.unwrap();

    let retrieved = repo.get(product.id()).await.unwrap().unwrap();
    assert!(retrieved.external_id().is_none());
    assert!(retrieved.description().is_none());
}

#[tokio::test]
async fn test_duplicate_external_id_rejected() {
    let pool = setup().await;
    let repo = SqliteProductRepository::new(pool.pool().clone());

    let first = Product::from_external(&external_record("dup", "First", 1.0)).unwrap();
    repo.insert(&first).await.unwrap();

    let second = Product::from_external(&external_record("dup", "Second", 2.0)).unwrap();
    let result = repo.insert(&second).await;
    assert!(result.is_err(), "duplicate external_id must not overwrite");

    // The original row is untouched
    let kept = repo
        .get_by_external_id(&ExternalId::new("dup").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(kept.name(), "First");
}

#[tokio::test]
async fn test_multiple_null_external_ids_allowed() {
    let pool = setup().await;
    let repo = SqliteProductRepository::new(pool.pool().clone());

    // SQLite UNIQUE permits any number of NULLs
    repo.insert(&Product::new_manual("One", None, 1.0, None).unwrap())
        .await
        .unwrap();
    repo.insert(&Product::new_manual("Two", None, 2.0, None).unwrap())
        .await
        .unwrap();

    assert_eq!(repo.count(&ProductFilter::new()).await.unwrap(), 2);
}

#[tokio::test]
async fn test_update_product() {
    let pool = setup().await;
    let repo = SqliteProductRepository::new(pool.pool().clone());

    let mut product = Product::from_external(&external_record("a1", "Lamp", 10.0)).unwrap();
    repo.insert(&product).await.unwrap();

    let changed = product
        .apply_external(&external_record("a1", "Lamp", 15.0))
        .unwrap();
    assert!(changed);
    repo.update(&product).await.unwrap();

    let retrieved = repo.get(product.id()).await.unwrap().unwrap();
    assert_eq!(retrieved.price(), 15.0);
}

#[tokio::test]
async fn test_update_missing_product_fails() {
    let pool = setup().await;
    let repo = SqliteProductRepository::new(pool.pool().clone());

    let product = Product::new_manual("Ghost", None, 1.0, None).unwrap();
    assert!(repo.update(&product).await.is_err());
}

#[tokio::test]
async fn test_delete_product() {
    let pool = setup().await;
    let repo = SqliteProductRepository::new(pool.pool().clone());

    let product = Product::new_manual("Short-lived", None, 1.0, None).unwrap();
    repo.insert(&product).await.unwrap();

    assert!(repo.delete(product.id()).await.unwrap());
    assert!(repo.get(product.id()).await.unwrap().is_none());

    // Second delete is a no-op
    assert!(!repo.delete(product.id()).await.unwrap());
}

#[tokio::test]
async fn test_list_with_filters() {
    let pool = setup().await;
    let repo = SqliteProductRepository::new(pool.pool().clone());

    let mut lamp = external_record("1", "Desk lamp", 24.99);
    lamp.category = Some("lighting".to_string());
    let mut chair = external_record("2", "Office chair", 199.0);
    chair.category = Some("furniture".to_string());
    let mut bulb = external_record("3", "LED bulb", 4.5);
    bulb.category = Some("lighting".to_string());

    for record in [&lamp, &chair, &bulb] {
        repo.insert(&Product::from_external(record).unwrap())
            .await
            .unwrap();
    }

    // Category filter
    let filter = ProductFilter::new().with_category("lighting");
    let results = repo.list(&filter, 50, 0).await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(repo.count(&filter).await.unwrap(), 2);

    // Search matches name or description
    let filter = ProductFilter::new().with_search("chair");
    assert_eq!(repo.count(&filter).await.unwrap(), 1);

    // Price range
    let filter = ProductFilter::new().with_min_price(5.0).with_max_price(100.0);
    let results = repo.list(&filter, 50, 0).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name(), "Desk lamp");

    // Combined filters use AND logic
    let filter = ProductFilter::new()
        .with_category("lighting")
        .with_max_price(5.0);
    assert_eq!(repo.count(&filter).await.unwrap(), 1);
}

#[tokio::test]
async fn test_list_pagination() {
    let pool = setup().await;
    let repo = SqliteProductRepository::new(pool.pool().clone());

    for i in 0..5 {
        repo.insert(&Product::new_manual(format!("Item {i}"), None, i as f64, None).unwrap())
            .await
            .unwrap();
    }

    let filter = ProductFilter::new();
    let page1 = repo.list(&filter, 2, 0).await.unwrap();
    let page2 = repo.list(&filter, 2, 2).await.unwrap();
    let page3 = repo.list(&filter, 2, 4).await.unwrap();

    assert_eq!(page1.len(), 2);
    assert_eq!(page2.len(), 2);
    assert_eq!(page3.len(), 1);

    // No overlap between pages
    let mut seen: Vec<String> = page1
        .iter()
        .chain(&page2)
        .chain(&page3)
        .map(|p| p.id().to_string())
        .collect();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 5);
}

// ============================================================================
// User tests
// ============================================================================

#[tokio::test]
async fn test_insert_and_get_user() {
    let pool = setup().await;
    let repo = SqliteUserRepository::new(pool.pool().clone());

    let user = test_user("admin@example.com", Role::Admin);
    repo.insert(&user).await.unwrap();

    let retrieved = repo.get(user.id()).await.unwrap().unwrap();
    assert_eq!(retrieved.email().as_str(), "admin@example.com");
    assert_eq!(retrieved.role(), Role::Admin);
    assert!(retrieved.is_admin());
    assert_eq!(retrieved.password_hash(), user.password_hash());
}

#[tokio::test]
async fn test_get_user_by_email() {
    let pool = setup().await;
    let repo = SqliteUserRepository::new(pool.pool().clone());

    let user = test_user("someone@example.com", Role::User);
    repo.insert(&user).await.unwrap();

    let found = repo
        .get_by_email(&Email::new("someone@example.com").unwrap())
        .await
        .unwrap();
    assert_eq!(found.unwrap().id(), user.id());

    let missing = repo
        .get_by_email(&Email::new("nobody@example.com").unwrap())
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let pool = setup().await;
    let repo = SqliteUserRepository::new(pool.pool().clone());

    repo.insert(&test_user("same@example.com", Role::User))
        .await
        .unwrap();
    let result = repo.insert(&test_user("same@example.com", Role::User)).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_update_role() {
    let pool = setup().await;
    let repo = SqliteUserRepository::new(pool.pool().clone());

    let user = test_user("promote@example.com", Role::User);
    repo.insert(&user).await.unwrap();

    assert!(repo.update_role(user.id(), Role::Admin).await.unwrap());
    let retrieved = repo.get(user.id()).await.unwrap().unwrap();
    assert_eq!(retrieved.role(), Role::Admin);

    // Unknown user: no rows affected
    assert!(!repo.update_role(&UserId::new(), Role::Admin).await.unwrap());
}

// ============================================================================
// Run slot tests
// ============================================================================

fn completed_run() -> SyncRun {
    let mut run = SyncRun::new();
    run.start().unwrap();
    run.absorb(&ReconcileReport {
        fetched: 3,
        created: 2,
        updated: 0,
        failed: 1,
        errors: vec![RunError::record(
            ExternalId::new("bad-1").unwrap(),
            "UNIQUE constraint failed",
        )],
    });
    run.succeed().unwrap();
    run
}

#[tokio::test]
async fn test_load_last_empty() {
    let pool = setup().await;
    let repo = SqliteRunRepository::new(pool.pool().clone());

    assert!(repo.load_last().await.unwrap().is_none());
}

#[tokio::test]
async fn test_save_and_load_last_run() {
    let pool = setup().await;
    let repo = SqliteRunRepository::new(pool.pool().clone());

    let run = completed_run();
    repo.save_last(&run).await.unwrap();

    let loaded = repo.load_last().await.unwrap().unwrap();
    assert_eq!(loaded.run_id(), run.run_id());
    assert_eq!(loaded.status(), RunStatus::Succeeded);
    assert_eq!(loaded.records_fetched(), 3);
    assert_eq!(loaded.records_created(), 2);
    assert_eq!(loaded.records_failed(), 1);
    assert_eq!(loaded.errors().len(), 1);
    assert_eq!(
        loaded.errors()[0].external_id.as_ref().unwrap().as_str(),
        "bad-1"
    );
    assert!(loaded.finished_at().is_some());
    assert!(loaded.is_balanced());
}

#[tokio::test]
async fn test_save_last_replaces_previous_run() {
    let pool = setup().await;
    let repo = SqliteRunRepository::new(pool.pool().clone());

    let first = completed_run();
    repo.save_last(&first).await.unwrap();

    let mut second = SyncRun::new();
    second.start().unwrap();
    second
        .fail(RunError::provider("page 2 fetch failed"))
        .unwrap();
    repo.save_last(&second).await.unwrap();

    let loaded = repo.load_last().await.unwrap().unwrap();
    assert_eq!(loaded.run_id(), second.run_id());
    assert_eq!(loaded.status(), RunStatus::Failed);

    // Only one row ever exists
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sync_runs")
        .fetch_one(pool.pool())
        .await
        .unwrap();
    assert_eq!(count, 1);
}
