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
                    .table(UserProfiles::Table)
                    .col(pk_uuid(UserProfiles::Id))
                    .col(uuid(UserProfiles::UserId))
                    .col(string(UserProfiles::FullName))
                    .col(string(UserProfiles::EmailAddress))
                    .col(string(UserProfiles::MobileNumber))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-user-profile-user_id")
                            .from(UserProfiles::Table, UserProfiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One profile per user
        manager
            .create_index(
                Index::create()
                    .name("idx_user_profiles_user_id")
                    .table(UserProfiles::Table)
                    .col(UserProfiles::UserId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserProfiles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum UserProfiles {
    Table,
    Id,
    UserId,
    FullName,
    EmailAddress,
    MobileNumber,
}
