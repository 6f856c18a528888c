//! Domain models for the login service.
//!
//! Models here are independent of both the database entities and the HTTP DTOs;
//! repositories and controllers convert at their boundaries.

pub mod endpoint;
pub mod flow;
pub mod profile;
pub mod settings;
pub mod user;
