//! Application state shared across all request handlers.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::server::service::{admin_code::AdminCodeService, oauth::ProviderClient};

/// Shared resources handed to every request handler.
///
/// Cloned per request; every field is either reference-counted or a small string.
#[derive(Clone)]
pub struct AppState {
    /// Connection pool for settings and identity tables.
    pub db: DatabaseConnection,

    /// Discord adapter used by login flows.
    pub provider: Arc<dyn ProviderClient>,

    /// Pending one-time admin code, if no admin existed at startup.
    pub admin_code_service: AdminCodeService,

    /// Callback URL registered with Discord.
    pub redirect_uri: String,

    /// Login entry point failed flows redirect to.
    pub login_path: String,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        provider: Arc<dyn ProviderClient>,
        admin_code_service: AdminCodeService,
        redirect_uri: String,
        login_path: String,
    ) -> Self {
        Self {
            db,
            provider,
            admin_code_service,
            redirect_uri,
            login_path,
        }
    }
}
