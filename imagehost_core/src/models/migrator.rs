use sea_orm_migration::prelude::*;

mod m20260825_000001_create_users_table;
mod m20260825_000002_create_user_profiles_table;
mod m20260825_000003_create_images_table;
mod m20260825_000004_create_tags_table;
mod m20260825_000005_create_image_tags_table;
mod m20260825_000006_create_comments_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260825_000001_create_users_table::Migration),
            Box::new(m20260825_000002_create_user_profiles_table::Migration),
            Box::new(m20260825_000003_create_images_table::Migration),
            Box::new(m20260825_000004_create_tags_table::Migration),
            Box::new(m20260825_000005_create_image_tags_table::Migration),
            Box::new(m20260825_000006_create_comments_table::Migration),
        ]
    }
}

#[cfg(test)]
use sea_orm::{Database, DbErr};

#[tokio::test]
async fn test_migrations_okay() -> Result<(), DbErr> {
    let db = Database::connect("sqlite::memory:").await?;
    let schema_manager = SchemaManager::new(&db);

    Migrator::refresh(&db).await?;

    assert!(schema_manager.has_table("users").await?);
    assert!(schema_manager.has_table("user_profiles").await?);
    assert!(schema_manager.has_table("images").await?);
    assert!(schema_manager.has_table("tags").await?);
    assert!(schema_manager.has_table("image_tags").await?);
    assert!(schema_manager.has_table("comments").await?);

    Ok(())
}
