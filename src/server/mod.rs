//! Discord login service.
//!
//! # Architecture
//!
//! - **Controller Layer** (`controller/`) - HTTP handlers, access control and redirects
//! - **Service Layer** (`service/`) - Login flow, Discord adapter, identity binding and
//!   settings
//! - **Data Layer** (`data/`) - Database operations and entity-to-domain conversion
//! - **Model Layer** (`model/`) - Domain models and operation parameters
//! - **Error Layer** (`error/`) - Error types and HTTP response mapping
//! - **Middleware** (`middleware/`) - Typed session access and the auth guard
//!
//! # Login flow
//!
//! 1. `GET /login/initiate` stores a CSRF state in the session and redirects to Discord
//! 2. Discord redirects back to `GET /login/callback`
//! 3. The state is verified, the code exchanged and the profile bound to a local user
//! 4. The user ID is stored in the session; failures redirect to the login page with a
//!    message

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod middleware;
pub mod model;
pub mod router;
pub mod service;
pub mod startup;
pub mod state;
