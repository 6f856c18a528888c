use crate::server::{data::settings::SettingsRepository, model::settings::SettingsRecord};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

fn record(client_id: &str) -> SettingsRecord {
    SettingsRecord {
        client_id: client_id.to_string(),
        client_secret: "secret".to_string(),
        scopes: "guilds".to_string(),
        api_calls: "users/@me/guilds".to_string(),
    }
}

/// Tests reading settings before anything was saved.
///
/// Expected: Ok(None)
#[tokio::test]
async fn get_returns_none_when_unset() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::DiscordAuthSettings)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    assert!(SettingsRepository::new(db).get().await?.is_none());

    Ok(())
}

/// Tests that upsert replaces previously stored settings.
///
/// Expected: the second record is returned by get
#[tokio::test]
async fn upsert_replaces_existing_settings() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::DiscordAuthSettings)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::settings::create_settings(db, "old-id", "old-secret").await?;

    let repo = SettingsRepository::new(db);
    let saved = repo.upsert(record("new-id")).await?;

    assert_eq!(saved, record("new-id"));
    assert_eq!(repo.get().await?, Some(record("new-id")));

    Ok(())
}

/// Tests that seeding never overwrites settings saved by an admin.
///
/// Expected: Ok(true) on empty table, Ok(false) afterwards with values unchanged
#[tokio::test]
async fn insert_if_absent_keeps_saved_settings() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::DiscordAuthSettings)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = SettingsRepository::new(db);

    assert!(repo.insert_if_absent(record("admin-id")).await?);
    assert!(!repo.insert_if_absent(record("seed-id")).await?);
    assert_eq!(repo.get().await?.map(|r| r.client_id), Some("admin-id".to_string()));

    Ok(())
}
