use super::*;

/// Tests creating a new user.
///
/// Verifies that new accounts are stored with the given name and email and never
/// start out as admins.
///
/// Expected: Ok with user created and admin status set to false
#[tokio::test]
async fn creates_non_admin_user() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = UserRepository::new(db);
    let user = repo
        .create(CreateUserParam {
            name: "TestUser".to_string(),
            email: Some("test@example.com".to_string()),
        })
        .await?;

    assert_eq!(user.name, "TestUser");
    assert_eq!(user.email.as_deref(), Some("test@example.com"));
    assert!(!user.admin);

    let found = repo.find_by_id(user.id).await?;
    assert_eq!(found, Some(user));

    Ok(())
}

/// Tests looking a user up by email.
///
/// Expected: Ok(Some) for the stored address, Ok(None) otherwise
#[tokio::test]
async fn finds_user_by_email() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let existing = factory::user::UserFactory::new(db)
        .email("known@example.com")
        .build()
        .await?;

    let repo = UserRepository::new(db);

    let found = repo.find_by_email("known@example.com").await?;
    assert_eq!(found.map(|u| u.id), Some(existing.id));
    assert!(repo.find_by_email("unknown@example.com").await?.is_none());

    Ok(())
}
