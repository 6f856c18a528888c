use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]

pub struct Migration;

#[async_trait::async_trait]

impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DiscordAuthSettings::Table)
                    .if_not_exists()
                    .col(integer(DiscordAuthSettings::Id).primary_key())
                    .col(string(DiscordAuthSettings::ClientId))
                    .col(string(DiscordAuthSettings::ClientSecret))
                    .col(text(DiscordAuthSettings::Scopes))
                    .col(text(DiscordAuthSettings::ApiCalls))
                    .col(timestamp_with_time_zone(DiscordAuthSettings::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DiscordAuthSettings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]

pub enum DiscordAuthSettings {
    Table,
    Id,
    ClientId,
    ClientSecret,
    Scopes,
    ApiCalls,
    UpdatedAt,
}
