//! Service layer between the controllers and the repositories.
//!
//! The login flow in `auth` depends only on the `SettingsStore`, `ProviderClient` and
//! `IdentityBinder` traits; `settings`, `oauth::discord` and `identity` provide the
//! implementations used by the HTTP handlers.

pub mod admin_code;
pub mod auth;
pub mod identity;
pub mod oauth;
pub mod settings;
