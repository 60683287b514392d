//! Gateway error type

use thiserror::Error;

use crate::ports::CallProfile;

/// A failed call to the model service.
///
/// Every variant names the profile that failed. The gateway never retries;
/// callers decide whether a failure is fatal.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("{profile} call could not reach the model service: {reason}")]
    Transport { profile: CallProfile, reason: String },

    #[error("{profile} call rejected by the model service (HTTP {status}): {body}")]
    Upstream { profile: CallProfile, status: u16, body: String },

    #[error("{profile} call returned an unusable response: {reason}")]
    MalformedResponse { profile: CallProfile, reason: String },

    #[error("{profile} call is misconfigured: {reason}")]
    InvalidRequest { profile: CallProfile, reason: String },
}

impl GatewayError {
    /// The call profile that failed
    pub fn profile(&self) -> CallProfile {
        match self {
            GatewayError::Transport { profile, .. }
            | GatewayError::Upstream { profile, .. }
            | GatewayError::MalformedResponse { profile, .. }
            | GatewayError::InvalidRequest { profile, .. } => *profile,
        }
    }

    /// True when the service refused the call for quota or rate reasons
    pub fn is_quota(&self) -> bool {
        matches!(self, GatewayError::Upstream { status: 429, .. })
    }
}
