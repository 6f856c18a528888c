//! HTTP request handlers.

pub mod auth;
pub mod settings;
pub mod user;
