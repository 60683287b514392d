//! Model Gateway port definitions

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// Named model configuration a call runs under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallProfile {
    /// Low-latency plain text
    Fast,
    /// Balanced model with web-search grounding
    Default,
    /// High-reasoning model with a thinking budget
    Deep,
    /// Output constrained to a JSON schema
    Structured,
}

impl CallProfile {
    pub fn name(&self) -> &'static str {
        match self {
            CallProfile::Fast => "fast",
            CallProfile::Default => "default",
            CallProfile::Deep => "deep",
            CallProfile::Structured => "structured",
        }
    }
}

impl fmt::Display for CallProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Instruction text plus an optional output schema, ready for the gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptPayload {
    /// Full natural-language instructions
    pub text: String,

    /// JSON schema the response must satisfy, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
}

impl PromptPayload {
    pub fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into(), response_schema: None }
    }

    pub fn with_schema(text: impl Into<String>, schema: serde_json::Value) -> Self {
        Self { text: text.into(), response_schema: Some(schema) }
    }
}

/// Per-call options resolved from a profile and payload
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CallOptions {
    /// Enable web-search grounding
    pub search_grounding: bool,

    /// Constrain output to this JSON schema
    pub response_schema: Option<serde_json::Value>,

    /// Thinking budget in tokens for reasoning models
    pub thinking_budget: Option<u32>,
}

impl CallOptions {
    /// Resolve the options for `profile`, rejecting combinations the service refuses
    ///
    /// Search grounding and a response schema are mutually exclusive.
    pub fn resolve(
        profile: CallProfile,
        payload: &PromptPayload,
        deep_thinking_budget: u32,
    ) -> Result<Self, GatewayError> {
        let options = match profile {
            CallProfile::Fast => CallOptions::default(),
            CallProfile::Default => CallOptions { search_grounding: true, ..Default::default() },
            CallProfile::Deep => {
                CallOptions { thinking_budget: Some(deep_thinking_budget), ..Default::default() }
            }
            CallProfile::Structured => CallOptions {
                response_schema: payload.response_schema.clone(),
                ..Default::default()
            },
        };

        if payload.response_schema.is_some() && profile != CallProfile::Structured {
            return Err(GatewayError::InvalidRequest {
                profile,
                reason: "a response schema is only accepted by the structured profile".to_string(),
            });
        }

        if options.search_grounding && options.response_schema.is_some() {
            return Err(GatewayError::InvalidRequest {
                profile,
                reason: "search grounding cannot be combined with a response schema".to_string(),
            });
        }

        Ok(options)
    }
}

/// Text plus the provenance URIs the service reported
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GatewayOutput {
    pub text: String,

    /// Reference URIs, deduplicated, first-seen order
    pub provenance: Vec<String>,
}

impl GatewayOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into(), provenance: Vec::new() }
    }
}

/// Port for invoking the generative model service
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Send `payload` under `profile` and return the response text
    async fn invoke(
        &self,
        profile: CallProfile,
        payload: &PromptPayload,
    ) -> Result<GatewayOutput, GatewayError>;
}

#[async_trait]
impl<G: ModelGateway + ?Sized> ModelGateway for std::sync::Arc<G> {
    async fn invoke(
        &self,
        profile: CallProfile,
        payload: &PromptPayload,
    ) -> Result<GatewayOutput, GatewayError> {
        (**self).invoke(profile, payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_names() {
        let names: Vec<_> =
            [CallProfile::Fast, CallProfile::Default, CallProfile::Deep, CallProfile::Structured]
                .iter()
                .map(|p| p.to_string())
                .collect();
        assert_eq!(names, ["fast", "default", "deep", "structured"]);
    }

    #[test]
    fn test_default_profile_is_grounded() {
        let options =
            CallOptions::resolve(CallProfile::Default, &PromptPayload::plain("hi"), 1024).unwrap();
        assert!(options.search_grounding);
        assert!(options.response_schema.is_none());
        assert!(options.thinking_budget.is_none());
    }

    #[test]
    fn test_deep_profile_has_thinking_budget() {
        let options =
            CallOptions::resolve(CallProfile::Deep, &PromptPayload::plain("hi"), 4096).unwrap();
        assert_eq!(options.thinking_budget, Some(4096));
        assert!(!options.search_grounding);
    }

    #[test]
    fn test_structured_profile_carries_schema() {
        let schema = json!({"type": "ARRAY"});
        let payload = PromptPayload::with_schema("chart", schema.clone());
        let options = CallOptions::resolve(CallProfile::Structured, &payload, 0).unwrap();
        assert_eq!(options.response_schema, Some(schema));
        assert!(!options.search_grounding);
    }

    #[test]
    fn test_schema_rejected_outside_structured_profile() {
        let payload = PromptPayload::with_schema("report", json!({"type": "OBJECT"}));
        let err = CallOptions::resolve(CallProfile::Default, &payload, 0).unwrap_err();
        assert!(matches!(
            err,
            GatewayError::InvalidRequest { profile: CallProfile::Default, .. }
        ));
    }
}
