//! Factory methods for creating test data.
//!
//! This module provides factory methods for creating test entities with sensible defaults,
//! reducing boilerplate in tests. Each entity has its own factory module with both a
//! `Factory` struct for customization and a `create_*` convenience function for quick
//! default creation.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), sea_orm::DbErr> {
//!     let db = /* ... */;
//!
//!     let user = factory::user::UserFactory::new(&db)
//!         .name("CustomUser")
//!         .admin(true)
//!         .build()
//!         .await?;
//!
//!     let (user, identity) = factory::helpers::create_user_with_identity(&db, "1234").await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Available Factories
//!
//! - `user` - Create local user entities
//! - `social_auth` - Create Discord identity links
//! - `settings` - Create the Discord settings row
//! - `helpers` - Convenience methods for creating entities with dependencies

pub mod helpers;
pub mod settings;
pub mod social_auth;
pub mod user;

pub use settings::create_settings;
pub use social_auth::create_social_auth;
pub use user::create_user;
