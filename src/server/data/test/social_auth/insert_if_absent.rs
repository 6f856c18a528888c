use super::*;

fn param(user_id: i32, provider_user_id: &str, data: &str) -> CreateSocialAuthParam {
    CreateSocialAuthParam {
        user_id,
        provider_user_id: provider_user_id.to_string(),
        token: "token".to_string(),
        avatar: Some("avatarhash".to_string()),
        additional_data: data.to_string(),
    }
}

/// Tests binding a Discord ID for the first time.
///
/// Expected: Ok(true) and the identity can be found and reported as existing
#[tokio::test]
async fn inserts_new_identity() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_identity_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::user::create_user(db).await?;
    let repo = SocialAuthRepository::new(db);

    assert!(!repo.exists("80351110224678912").await?);
    assert!(repo.insert_if_absent(param(user.id, "80351110224678912", "[]")).await?);
    assert!(repo.exists("80351110224678912").await?);

    let identity = repo
        .find_by_provider_user_id("80351110224678912")
        .await?
        .unwrap();
    assert_eq!(identity.user_id, user.id);
    assert_eq!(identity.avatar.as_deref(), Some("avatarhash"));

    Ok(())
}

/// Tests that a second insert for the same Discord ID changes nothing.
///
/// Expected: Ok(false), original user and data kept
#[tokio::test]
async fn duplicate_insert_keeps_first_binding() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_identity_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let first = factory::user::create_user(db).await?;
    let second = factory::user::create_user(db).await?;
    let repo = SocialAuthRepository::new(db);

    repo.insert_if_absent(param(first.id, "42", "[\"first\"]")).await?;
    let inserted = repo.insert_if_absent(param(second.id, "42", "[\"second\"]")).await?;

    assert!(!inserted);
    let identity = repo.find_by_provider_user_id("42").await?.unwrap();
    assert_eq!(identity.user_id, first.id);
    assert_eq!(identity.additional_data, "[\"first\"]");

    Ok(())
}
