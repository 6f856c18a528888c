use serde::{Deserialize, Serialize};

/// Logged-in local account as returned by `GET /api/auth/user`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDto {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub admin: bool,
}
