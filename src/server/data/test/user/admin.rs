use super::*;

/// Tests admin detection on an empty table.
///
/// Expected: Ok(false)
#[tokio::test]
async fn no_admin_in_empty_table() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::user::create_user(db).await?;

    let repo = UserRepository::new(db);
    assert!(!repo.admin_exists().await?);

    Ok(())
}

/// Tests granting and revoking admin privileges.
///
/// Expected: admin_exists follows the flag of the only user
#[tokio::test]
async fn set_admin_toggles_flag() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::user::create_user(db).await?;
    let repo = UserRepository::new(db);

    repo.set_admin(user.id, true).await?;
    assert!(repo.admin_exists().await?);
    assert!(repo.find_by_id(user.id).await?.unwrap().admin);

    repo.set_admin(user.id, false).await?;
    assert!(!repo.admin_exists().await?);

    Ok(())
}
