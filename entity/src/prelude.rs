pub use super::discord_auth_settings::Entity as DiscordAuthSettings;
pub use super::social_auth::Entity as SocialAuth;
pub use super::user::Entity as User;
