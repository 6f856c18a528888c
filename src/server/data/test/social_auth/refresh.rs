use super::*;

/// Tests refreshing the token of an existing identity.
///
/// Expected: token and avatar replaced, additional data unchanged
#[tokio::test]
async fn refresh_replaces_token_and_avatar() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_identity_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_, identity) = factory::helpers::create_user_with_identity(db, "1001").await?;

    let repo = SocialAuthRepository::new(db);
    repo.refresh("1001", "new-token".to_string(), None).await?;

    let refreshed = repo.find_by_provider_user_id("1001").await?.unwrap();
    assert_eq!(refreshed.token, "new-token");
    assert_eq!(refreshed.avatar, None);
    assert_eq!(refreshed.additional_data, identity.additional_data);

    Ok(())
}
