use crate::server::{data::social_auth::SocialAuthRepository, model::user::CreateSocialAuthParam};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod insert_if_absent;
mod refresh;
