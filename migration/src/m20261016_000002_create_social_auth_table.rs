use sea_orm_migration::{prelude::*, schema::*};

use crate::m20261016_000001_create_user_table::User;

#[derive(DeriveMigrationName)]

pub struct Migration;

#[async_trait::async_trait]

impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SocialAuth::Table)
                    .if_not_exists()
                    .col(pk_auto(SocialAuth::Id))
                    .col(integer(SocialAuth::UserId))
                    .col(string(SocialAuth::PluginId))
                    .col(string_uniq(SocialAuth::ProviderUserId))
                    .col(text(SocialAuth::Token))
                    .col(string_null(SocialAuth::Avatar))
                    .col(text(SocialAuth::AdditionalData))
                    .col(timestamp_with_time_zone(SocialAuth::CreatedAt))
                    .col(timestamp_with_time_zone(SocialAuth::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_social_auth_user_id")
                            .from(SocialAuth::Table, SocialAuth::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SocialAuth::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]

pub enum SocialAuth {
    Table,
    Id,
    UserId,
    PluginId,
    ProviderUserId,
    Token,
    Avatar,
    AdditionalData,
    CreatedAt,
    UpdatedAt,
}
