/// Discord identity normalized by the provider adapter.
///
/// Consumed once by the login flow and handed to the identity binder; never stored
/// as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalProfile {
    /// Discord user snowflake.
    pub external_id: String,
    pub display_name: String,
    /// Present only when the `email` scope was granted and the address is set.
    pub email: Option<String>,
    /// Discord avatar hash.
    pub avatar_ref: Option<String>,
}
