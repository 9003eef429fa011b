use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use crate::models::migrator::Migrator;

/// Create an in-memory SQLite database with all migrations applied.
/// Each call creates a fresh, isolated database instance.
///
/// # Example
/// ```ignore
/// use imagehost_core::test_utils;
///
/// #[tokio::test]
/// async fn my_test() {
///     let db = test_utils::setup_test_db().await;
///     // Database is ready to use!
/// }
/// ```
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    // Run all migrations
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}
