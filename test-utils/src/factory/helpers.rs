//! Shared helper utilities for factory methods.
//!
//! Provides the ID counter used across factories and a convenience method for
//! creating a local user together with a linked Discord identity.

use sea_orm::{DatabaseConnection, DbErr};

/// Counter for generating unique IDs in tests.
///
/// This atomic counter ensures each factory-created entity gets a unique
/// identifier to prevent collisions in tests.
static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);

/// Gets the next unique counter value for test data.
///
/// This function provides monotonically increasing values for use in
/// generating unique test identifiers across all factories.
///
/// # Returns
/// - `u64` - Next unique counter value
pub fn next_id() -> u64 {
    COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
}

/// Creates a user and links a Discord identity to it.
///
/// # Arguments
/// - `db` - Database connection
/// - `provider_user_id` - Discord user ID to link
///
/// # Returns
/// - `Ok((user, social_auth))` - Tuple of created entities
/// - `Err(DbErr)` - Database error during creation
pub async fn create_user_with_identity(
    db: &DatabaseConnection,
    provider_user_id: &str,
) -> Result<(entity::user::Model, entity::social_auth::Model), DbErr> {
    let user = crate::factory::user::create_user(db).await?;
    let identity =
        crate::factory::social_auth::create_social_auth(db, user.id, provider_user_id).await?;

    Ok((user, identity))
}
