use sea_orm_migration::{prelude::*, schema::*};

use super::m20260825_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Images::Table)
                    .col(pk_uuid(Images::Id))
                    .col(string(Images::Title))
                    .col(string(Images::Description))
                    .col(text(Images::ImageFile)) // base64-encoded file content
                    .col(uuid(Images::UserId))
                    .col(timestamp_with_time_zone(Images::UploadedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-image-user_id")
                            .from(Images::Table, Images::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create index on user_id
        manager
            .create_index(
                Index::create()
                    .name("idx_images_user_id")
                    .table(Images::Table)
                    .col(Images::UserId)
                    .to_owned(),
            )
            .await?;

        // Create index on uploaded_at for the newest-first feed
        manager
            .create_index(
                Index::create()
                    .name("idx_images_uploaded_at")
                    .table(Images::Table)
                    .col(Images::UploadedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Images::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Images {
    Table,
    Id,
    Title,
    Description,
    ImageFile,
    UserId,
    UploadedAt,
}
