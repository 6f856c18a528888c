use super::*;

/// Tests refreshing name and email.
///
/// Expected: both fields replaced
#[tokio::test]
async fn updates_name_and_email() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::user::UserFactory::new(db)
        .name("OldName")
        .email("old@example.com")
        .build()
        .await?;

    let repo = UserRepository::new(db);
    repo.update_profile(user.id, "NewName".to_string(), Some("new@example.com".to_string()))
        .await?;

    let updated = repo.find_by_id(user.id).await?.unwrap();
    assert_eq!(updated.name, "NewName");
    assert_eq!(updated.email.as_deref(), Some("new@example.com"));

    Ok(())
}

/// Tests that a missing email does not erase the stored one.
///
/// Expected: name replaced, email preserved
#[tokio::test]
async fn missing_email_preserves_stored_address() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::user::UserFactory::new(db)
        .email("kept@example.com")
        .build()
        .await?;

    let repo = UserRepository::new(db);
    repo.update_profile(user.id, "Renamed".to_string(), None).await?;

    let updated = repo.find_by_id(user.id).await?.unwrap();
    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.email.as_deref(), Some("kept@example.com"));

    Ok(())
}
