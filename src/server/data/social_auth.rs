//! Discord identity repository.
//!
//! One `social_auth` row links a Discord user ID to a local account and keeps the
//! latest access token, avatar hash and the extra data gathered at provisioning time.

use chrono::Utc;
use migration::OnConflict;
use sea_orm::{
    sea_query::Expr, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter,
};

use crate::server::model::user::{CreateSocialAuthParam, SocialAuthIdentity};

/// Plugin identifier stored on every Discord identity row.
pub const DISCORD_PLUGIN_ID: &str = "social_auth_discord";

pub struct SocialAuthRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SocialAuthRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds the identity bound to a Discord user ID.
    pub async fn find_by_provider_user_id(
        &self,
        provider_user_id: &str,
    ) -> Result<Option<SocialAuthIdentity>, DbErr> {
        let entity = entity::prelude::SocialAuth::find()
            .filter(entity::social_auth::Column::ProviderUserId.eq(provider_user_id))
            .one(self.db)
            .await?;

        Ok(entity.map(SocialAuthIdentity::from_entity))
    }

    /// Checks whether a Discord user ID is already bound to an account.
    pub async fn exists(&self, provider_user_id: &str) -> Result<bool, DbErr> {
        let count = entity::prelude::SocialAuth::find()
            .filter(entity::social_auth::Column::ProviderUserId.eq(provider_user_id))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    /// Inserts an identity unless one already exists for the Discord user ID.
    ///
    /// A concurrent insert for the same ID wins silently; callers re-read the row to
    /// learn which account it is bound to.
    ///
    /// # Returns
    /// - `Ok(true)` - Row inserted
    /// - `Ok(false)` - Row already existed, nothing changed
    /// - `Err(DbErr)` - Database error during insert
    pub async fn insert_if_absent(&self, param: CreateSocialAuthParam) -> Result<bool, DbErr> {
        let now = Utc::now();

        let inserted = entity::prelude::SocialAuth::insert(entity::social_auth::ActiveModel {
            user_id: ActiveValue::Set(param.user_id),
            plugin_id: ActiveValue::Set(DISCORD_PLUGIN_ID.to_string()),
            provider_user_id: ActiveValue::Set(param.provider_user_id),
            token: ActiveValue::Set(param.token),
            avatar: ActiveValue::Set(param.avatar),
            additional_data: ActiveValue::Set(param.additional_data),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        })
        .on_conflict(
            OnConflict::column(entity::social_auth::Column::ProviderUserId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(self.db)
        .await?;

        Ok(inserted > 0)
    }

    /// Stores the latest access token and avatar for an identity.
    ///
    /// `additional_data` is kept as gathered at provisioning time.
    pub async fn refresh(
        &self,
        provider_user_id: &str,
        token: String,
        avatar: Option<String>,
    ) -> Result<(), DbErr> {
        entity::prelude::SocialAuth::update_many()
            .filter(entity::social_auth::Column::ProviderUserId.eq(provider_user_id))
            .col_expr(entity::social_auth::Column::Token, Expr::value(token))
            .col_expr(entity::social_auth::Column::Avatar, Expr::value(avatar))
            .col_expr(entity::social_auth::Column::UpdatedAt, Expr::value(Utc::now()))
            .exec(self.db)
            .await?;
        Ok(())
    }
}
