use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::server::{
    data::{social_auth::SocialAuthRepository, user::UserRepository},
    error::AppError,
    model::user::{BindIdentityParam, CreateSocialAuthParam, CreateUserParam, User},
};

/// Local account lookup and provisioning for Discord identities.
///
/// `authenticate_or_create` must tolerate being called twice with the same input, as
/// happens when a user submits the callback twice.
#[async_trait]
pub trait IdentityBinder: Send + Sync {
    /// Checks whether a local account is bound to the Discord user ID.
    async fn account_exists(&self, external_id: &str) -> Result<bool, AppError>;

    /// Returns the local user bound to the identity, provisioning one if needed.
    async fn authenticate_or_create(&self, param: BindIdentityParam) -> Result<User, AppError>;
}

/// Binds Discord identities to rows in the `user` and `social_auth` tables.
pub struct IdentityService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> IdentityService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds or creates the local user a new identity is linked to.
    ///
    /// An existing user with the same email address is reused.
    async fn local_user_for(&self, param: &BindIdentityParam) -> Result<User, AppError> {
        let user_repo = UserRepository::new(self.db);

        if let Some(email) = param.email.as_deref() {
            if let Some(user) = user_repo.find_by_email(email).await? {
                tracing::info!(
                    "Linking Discord user {} to existing user {} by email",
                    param.external_id,
                    user.id
                );
                return Ok(user);
            }
        }

        let user = user_repo
            .create(CreateUserParam {
                name: param.display_name.clone(),
                email: param.email.clone(),
            })
            .await?;

        tracing::info!(
            "Created user {} for Discord user {}",
            user.id,
            param.external_id
        );

        Ok(user)
    }
}

#[async_trait]
impl IdentityBinder for IdentityService<'_> {
    async fn account_exists(&self, external_id: &str) -> Result<bool, AppError> {
        Ok(SocialAuthRepository::new(self.db).exists(external_id).await?)
    }

    /// Refreshes a known identity or provisions a new one.
    ///
    /// # Returns
    /// - `Ok(User)` - Local user bound to the identity
    /// - `Err(AppError::InternalError)` - Identity vanished between insert and re-read
    /// - `Err(AppError::DbErr(_))` - Database error
    async fn authenticate_or_create(&self, param: BindIdentityParam) -> Result<User, AppError> {
        let user_repo = UserRepository::new(self.db);
        let social_auth_repo = SocialAuthRepository::new(self.db);

        if let Some(identity) = social_auth_repo
            .find_by_provider_user_id(&param.external_id)
            .await?
        {
            social_auth_repo
                .refresh(&param.external_id, param.access_token, param.avatar_ref)
                .await?;
            user_repo
                .update_profile(identity.user_id, param.display_name, param.email)
                .await?;

            return user_repo
                .find_by_id(identity.user_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("User {} not found", identity.user_id)));
        }

        let user = self.local_user_for(&param).await?;

        let inserted = social_auth_repo
            .insert_if_absent(CreateSocialAuthParam {
                user_id: user.id,
                provider_user_id: param.external_id.clone(),
                token: param.access_token,
                avatar: param.avatar_ref,
                additional_data: param.extra_data,
            })
            .await?;

        if inserted {
            return Ok(user);
        }

        // A concurrent callback bound the identity first.
        let identity = social_auth_repo
            .find_by_provider_user_id(&param.external_id)
            .await?
            .ok_or_else(|| {
                AppError::InternalError(format!(
                    "Identity for Discord user {} missing after insert conflict",
                    param.external_id
                ))
            })?;

        user_repo
            .find_by_id(identity.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", identity.user_id)))
    }
}
