use sea_orm_migration::{prelude::*, schema::*};

use super::m20260825_000003_create_images_table::Images;
use super::m20260825_000004_create_tags_table::Tags;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ImageTags::Table)
                    .col(uuid(ImageTags::ImageId))
                    .col(uuid(ImageTags::TagId))
                    .primary_key(
                        Index::create()
                            .col(ImageTags::ImageId)
                            .col(ImageTags::TagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-image-tag-image_id")
                            .from(ImageTags::Table, ImageTags::ImageId)
                            .to(Images::Table, Images::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-image-tag-tag_id")
                            .from(ImageTags::Table, ImageTags::TagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create index on tag_id for "images sharing this tag" lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_image_tags_tag_id")
                    .table(ImageTags::Table)
                    .col(ImageTags::TagId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ImageTags::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ImageTags {
    Table,
    ImageId,
    TagId,
}
