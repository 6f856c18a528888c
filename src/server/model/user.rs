//! User domain models and parameters.
//!
//! Local accounts bound to Discord identities, and the parameter types used when
//! binding an identity or provisioning a new account.

use crate::model::user::UserDto;

/// Local account.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    /// Whether the user may edit the Discord settings.
    pub admin: bool,
}

impl User {
    /// Converts the user domain model to a DTO for API responses.
    pub fn into_dto(self) -> UserDto {
        UserDto {
            id: self.id,
            name: self.name,
            email: self.email,
            admin: self.admin,
        }
    }

    /// Converts an entity model to a user domain model at the repository boundary.
    pub fn from_entity(entity: entity::user::Model) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            email: entity.email,
            admin: entity.admin,
        }
    }
}

/// Parameters for creating a local account.
#[derive(Debug, Clone)]
pub struct CreateUserParam {
    pub name: String,
    pub email: Option<String>,
}

/// Parameters for linking a Discord identity to a local account.
#[derive(Debug, Clone)]
pub struct CreateSocialAuthParam {
    pub user_id: i32,
    pub provider_user_id: String,
    pub token: String,
    pub avatar: Option<String>,
    pub additional_data: String,
}

/// Everything the identity binder needs to log a Discord user in.
#[derive(Debug, Clone)]
pub struct BindIdentityParam {
    pub display_name: String,
    pub email: Option<String>,
    /// Discord user snowflake.
    pub external_id: String,
    pub access_token: String,
    /// Discord avatar hash.
    pub avatar_ref: Option<String>,
    /// Serialized [`ExtraData`](crate::server::model::flow::ExtraData); `[]` for
    /// returning users.
    pub extra_data: String,
}

/// Discord identity bound to a local account.
#[derive(Debug, Clone, PartialEq)]
pub struct SocialAuthIdentity {
    pub user_id: i32,
    pub provider_user_id: String,
    pub token: String,
    pub avatar: Option<String>,
    pub additional_data: String,
}

impl SocialAuthIdentity {
    /// Converts an entity model to an identity domain model at the repository boundary.
    pub fn from_entity(entity: entity::social_auth::Model) -> Self {
        Self {
            user_id: entity.user_id,
            provider_user_id: entity.provider_user_id,
            token: entity.token,
            avatar: entity.avatar,
            additional_data: entity.additional_data,
        }
    }
}
