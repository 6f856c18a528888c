//! One-time admin codes for bootstrapping the first administrator.
//!
//! When no admin exists at startup, a code is generated and a login link containing it
//! is logged. A login flow initiated with that link carries the code to its callback,
//! where a successful login consumes it and grants the admin flag to the bound account.
//! The code lives in memory only, expires after 60 seconds and can be used once.

use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::{sync::RwLock, time::Instant};

const ADMIN_CODE_TTL: Duration = Duration::from_secs(60);
const ADMIN_CODE_LENGTH: usize = 32;
const ADMIN_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

struct AdminCode {
    code: String,
    expires_at: Instant,
}

impl AdminCode {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Holds at most one pending admin code, shared across request handlers.
#[derive(Clone, Default)]
pub struct AdminCodeService {
    code: Arc<RwLock<Option<AdminCode>>>,
}

impl AdminCodeService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates a random 32-character alphanumeric code, replacing any previous one.
    pub async fn generate(&self) -> String {
        let mut rng = rand::rng();
        let code: String = (0..ADMIN_CODE_LENGTH)
            .map(|_| ADMIN_CODE_CHARSET[rng.random_range(0..ADMIN_CODE_CHARSET.len())] as char)
            .collect();

        *self.code.write().await = Some(AdminCode {
            code: code.clone(),
            expires_at: Instant::now() + ADMIN_CODE_TTL,
        });

        code
    }

    /// Checks `input` against the pending code without consuming it.
    ///
    /// An expired code is discarded on the first check.
    pub async fn is_valid(&self, input: &str) -> bool {
        let mut code = self.code.write().await;

        match code.as_ref() {
            Some(stored) if stored.is_expired() => {
                *code = None;
                false
            }
            Some(stored) => !input.is_empty() && stored.code == input,
            None => false,
        }
    }

    /// Consumes the code if `input` matches and it has not expired.
    ///
    /// An expired code is discarded on the first check. A wrong guess leaves a valid
    /// code in place.
    ///
    /// # Returns
    /// - `true` - Code matched and is now consumed
    /// - `false` - No code, wrong code or expired code
    pub async fn validate_and_consume(&self, input: &str) -> bool {
        let mut code = self.code.write().await;

        let valid = match code.as_ref() {
            Some(stored) if stored.is_expired() => {
                *code = None;
                return false;
            }
            Some(stored) => !input.is_empty() && stored.code == input,
            None => false,
        };

        if valid {
            *code = None;
        }

        valid
    }

    #[cfg(test)]
    async fn has_valid_code(&self) -> bool {
        self.code
            .read()
            .await
            .as_ref()
            .is_some_and(|stored| !stored.is_expired())
    }
}
