//! Login flow state and the extra data collected for new accounts.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::server::error::AppError;

/// Per-session state of a Discord login flow.
///
/// Written when the flow is initiated and consumed by the callback. Its presence in
/// the session is what marks the flow as awaiting a callback; it is removed as soon as
/// the callback finishes, whatever the outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowState {
    /// CSRF state sent to Discord, expected back unchanged on the callback.
    pub csrf_state: String,
    /// Local path to redirect to once logged in.
    pub pending_destination: Option<String>,
    /// Access token obtained during the callback.
    pub pending_access_token: Option<String>,
    /// Admin code checked when the flow was initiated, consumed once the login succeeds.
    #[serde(default)]
    pub admin_code: Option<String>,
}

impl FlowState {
    pub fn new(
        csrf_state: String,
        pending_destination: Option<String>,
        admin_code: Option<String>,
    ) -> Self {
        Self {
            csrf_state,
            pending_destination,
            pending_access_token: None,
            admin_code,
        }
    }

    /// Checks the `state` parameter of a callback against this flow.
    ///
    /// Both values must be non-empty and equal. An empty stored state never matches,
    /// not even an empty incoming one.
    pub fn matches(&self, incoming: Option<&str>) -> bool {
        match incoming {
            Some(incoming) => !self.csrf_state.is_empty() && self.csrf_state == incoming,
            None => false,
        }
    }
}

/// Outcome of one extra API call.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtraCallOutcome {
    Fetched(Value),
    Failed,
}

/// Result of one configured extra API call.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtraCallResult {
    /// Specifier line as configured.
    pub endpoint: String,
    pub outcome: ExtraCallOutcome,
}

#[derive(Serialize)]
struct ExtraCallRecord<'a> {
    endpoint: &'a str,
    success: bool,
    data: &'a Value,
}

/// Extra API call results, in the order the calls are configured.
///
/// Serialized into the blob stored alongside a newly provisioned identity. A failed
/// call keeps its slot with `"success": false` and an empty string as data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtraData(Vec<ExtraCallResult>);

impl ExtraData {
    pub fn push_fetched(&mut self, endpoint: &str, data: Value) {
        self.0.push(ExtraCallResult {
            endpoint: endpoint.to_string(),
            outcome: ExtraCallOutcome::Fetched(data),
        });
    }

    pub fn push_failed(&mut self, endpoint: &str) {
        self.0.push(ExtraCallResult {
            endpoint: endpoint.to_string(),
            outcome: ExtraCallOutcome::Failed,
        });
    }

    pub fn entries(&self) -> &[ExtraCallResult] {
        &self.0
    }

    /// Serializes the results into a JSON array.
    pub fn to_blob(&self) -> Result<String, AppError> {
        let empty = Value::String(String::new());

        let records: Vec<ExtraCallRecord> = self
            .0
            .iter()
            .map(|result| match &result.outcome {
                ExtraCallOutcome::Fetched(data) => ExtraCallRecord {
                    endpoint: &result.endpoint,
                    success: true,
                    data,
                },
                ExtraCallOutcome::Failed => ExtraCallRecord {
                    endpoint: &result.endpoint,
                    success: false,
                    data: &empty,
                },
            })
            .collect();

        Ok(serde_json::to_string(&records)?)
    }
}
