//! Type-safe session management wrappers.
//!
//! Each struct wraps the same underlying `Session` but exposes only the methods
//! relevant to its concern:
//! - `AuthSession` - Logged-in local user
//! - `FlowSession` - Ephemeral Discord login flow state
//! - `MessageSession` - Messages queued for the login page

use tower_sessions::Session;

use crate::server::{error::AppError, model::flow::FlowState};

const SESSION_AUTH_USER_ID: &str = "auth:user";
const SESSION_AUTH_DISCORD_FLOW: &str = "auth:discord_flow";
const SESSION_AUTH_MESSAGES: &str = "auth:messages";

/// Authentication session management.
///
/// Stores the local ID of the logged-in user.
pub struct AuthSession<'a> {
    session: &'a Session,
}

impl<'a> AuthSession<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Logs a user in.
    ///
    /// Issues a new session ID first so an ID planted before login cannot be reused
    /// afterwards.
    ///
    /// # Returns
    /// - `Ok(())` - User ID stored under a fresh session ID
    /// - `Err(AppError::SessionErr(_))` - Failed to cycle or write the session
    pub async fn login(&self, user_id: i32) -> Result<(), AppError> {
        self.session.cycle_id().await?;
        self.session.insert(SESSION_AUTH_USER_ID, user_id).await?;
        Ok(())
    }

    /// Retrieves the logged-in user's ID.
    ///
    /// # Returns
    /// - `Ok(Some(user_id))` - User is logged in
    /// - `Ok(None)` - No user in session
    /// - `Err(AppError::SessionErr(_))` - Failed to access session
    pub async fn get_user_id(&self) -> Result<Option<i32>, AppError> {
        Ok(self.session.get::<i32>(SESSION_AUTH_USER_ID).await?)
    }

    /// Clears all data from the session.
    ///
    /// Used during logout to remove authentication state together with any pending
    /// login flow.
    pub async fn clear(&self) {
        self.session.clear().await;
    }
}

/// Discord login flow state management.
///
/// Holds one [`FlowState`] between the initiate and callback requests. Every exit of
/// the callback removes it, so a CSRF state can be checked at most once.
pub struct FlowSession<'a> {
    session: &'a Session,
}

impl<'a> FlowSession<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Starts a flow, replacing any flow the session was still waiting on.
    pub async fn start(&self, state: &FlowState) -> Result<(), AppError> {
        self.session
            .insert(SESSION_AUTH_DISCORD_FLOW, state)
            .await?;
        Ok(())
    }

    /// Reads the pending flow without removing it.
    ///
    /// # Returns
    /// - `Ok(Some(state))` - A flow is awaiting its callback
    /// - `Ok(None)` - No flow in progress
    /// - `Err(AppError::SessionErr(_))` - Failed to access session
    pub async fn state(&self) -> Result<Option<FlowState>, AppError> {
        Ok(self
            .session
            .get::<FlowState>(SESSION_AUTH_DISCORD_FLOW)
            .await?)
    }

    /// Records the access token obtained for the pending flow.
    ///
    /// Does nothing if no flow is pending.
    pub async fn set_access_token(&self, access_token: &str) -> Result<(), AppError> {
        if let Some(mut state) = self.state().await? {
            state.pending_access_token = Some(access_token.to_string());
            self.start(&state).await?;
        }
        Ok(())
    }

    /// Removes the flow state, including the CSRF state and any access token.
    pub async fn clear(&self) -> Result<(), AppError> {
        self.session
            .remove_value(SESSION_AUTH_DISCORD_FLOW)
            .await?;
        Ok(())
    }
}

/// Messages queued for display on the login page.
pub struct MessageSession<'a> {
    session: &'a Session,
}

impl<'a> MessageSession<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Queues a message.
    pub async fn push(&self, message: &str) -> Result<(), AppError> {
        let mut messages = self
            .session
            .get::<Vec<String>>(SESSION_AUTH_MESSAGES)
            .await?
            .unwrap_or_default();
        messages.push(message.to_string());

        self.session
            .insert(SESSION_AUTH_MESSAGES, messages)
            .await?;
        Ok(())
    }

    /// Removes and returns all queued messages, oldest first.
    pub async fn take_all(&self) -> Result<Vec<String>, AppError> {
        let messages = self
            .session
            .remove::<Vec<String>>(SESSION_AUTH_MESSAGES)
            .await?
            .unwrap_or_default();
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::context::TestContext;

    #[tokio::test]
    async fn access_token_is_recorded_on_pending_flow() -> Result<(), AppError> {
        let mut test = TestContext::new();
        let session = test.session().await.unwrap();

        let flow = FlowSession::new(session);
        flow.start(&FlowState::new("state".to_string(), Some("/node/1".to_string()), None))
            .await?;
        flow.set_access_token("token").await?;

        let state = flow.state().await?.unwrap();
        assert_eq!(state.csrf_state, "state");
        assert_eq!(state.pending_destination.as_deref(), Some("/node/1"));
        assert_eq!(state.pending_access_token.as_deref(), Some("token"));

        flow.clear().await?;
        assert!(flow.state().await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn access_token_without_flow_is_ignored() -> Result<(), AppError> {
        let mut test = TestContext::new();
        let session = test.session().await.unwrap();

        let flow = FlowSession::new(session);
        flow.set_access_token("token").await?;

        assert!(flow.state().await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn messages_are_drained_in_order() -> Result<(), AppError> {
        let mut test = TestContext::new();
        let session = test.session().await.unwrap();

        let messages = MessageSession::new(session);
        messages.push("first").await?;
        messages.push("second").await?;

        assert_eq!(messages.take_all().await?, vec!["first", "second"]);
        assert!(messages.take_all().await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn logout_clears_user_and_flow() -> Result<(), AppError> {
        let mut test = TestContext::new();
        let session = test.session().await.unwrap();

        let auth = AuthSession::new(session);
        auth.login(7).await?;
        FlowSession::new(session)
            .start(&FlowState::new("state".to_string(), None, None))
            .await?;
        assert_eq!(auth.get_user_id().await?, Some(7));

        auth.clear().await;

        assert_eq!(auth.get_user_id().await?, None);
        assert!(FlowSession::new(session).state().await?.is_none());

        Ok(())
    }
}
