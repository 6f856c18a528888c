//! SeaORM entities for the Discord login service.

pub mod prelude;

pub mod discord_auth_settings;
pub mod social_auth;
pub mod user;
