//! Discord Auth Test Utils
//!
//! Provides shared testing utilities for building unit and integration tests for the
//! Discord login service. This crate offers a builder pattern for creating test contexts
//! with in-memory SQLite databases, customizable table schemas and a ready-to-use session.
//!
//! # Overview
//!
//! - **TestBuilder**: Fluent builder for configuring test environments
//! - **TestContext**: Test environment containing database connection and session
//! - **TestError**: Error types that can occur during test setup
//! - **factory**: Entity factories with sensible defaults
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::builder::TestBuilder;
//!
//! #[tokio::test]
//! async fn test_identity_operations() -> Result<(), TestError> {
//!     let mut test = TestBuilder::new()
//!         .with_identity_tables()
//!         .build()
//!         .await?;
//!
//!     let (db, session) = test.db_and_session().await?;
//!     // Perform database and session operations...
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
