//! Generative-language REST adapter for the Model Gateway port

use std::time::{Duration, Instant};

use async_trait::async_trait;
use geoprospect_core::config::{LayeredConfig, DEFAULT_DEEP_THINKING_BUDGET};
use serde::Serialize;

use crate::error::GatewayError;
use crate::ports::{CallOptions, CallProfile, GatewayOutput, ModelGateway, PromptPayload};
use crate::response::GatewayResponse;

/// Per-request timeout; deep calls routinely take over a minute
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Model identifiers per call profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileModels {
    pub fast: String,
    pub default: String,
    pub deep: String,
    pub structured: String,
}

impl ProfileModels {
    pub fn model_for(&self, profile: CallProfile) -> &str {
        match profile {
            CallProfile::Fast => &self.fast,
            CallProfile::Default => &self.default,
            CallProfile::Deep => &self.deep,
            CallProfile::Structured => &self.structured,
        }
    }
}

/// Gateway backed by the generateContent REST endpoint
pub struct GenerativeGateway {
    /// Base URL (e.g., "https://generativelanguage.googleapis.com/v1beta")
    base_url: String,

    /// Credential sent with every call
    api_key: String,

    models: ProfileModels,

    thinking_budget: u32,

    /// HTTP client
    client: reqwest::Client,
}

impl GenerativeGateway {
    /// Create a new gateway
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, models: ProfileModels) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            models,
            thinking_budget: DEFAULT_DEEP_THINKING_BUDGET,
            client,
        }
    }

    /// Create from resolved configuration; fails when no API key is set
    pub fn from_config(config: &LayeredConfig) -> geoprospect_core::Result<Self> {
        let models = ProfileModels {
            fast: config.fast_model.value.clone(),
            default: config.default_model.value.clone(),
            deep: config.deep_model.value.clone(),
            structured: config.structured_model.value.clone(),
        };
        Ok(Self::new(config.api_base_url.value.clone(), config.api_key()?, models)
            .with_thinking_budget(config.deep_thinking_budget.value))
    }

    pub fn with_thinking_budget(mut self, budget: u32) -> Self {
        self.thinking_budget = budget;
        self
    }

    pub fn models(&self) -> &ProfileModels {
        &self.models
    }

    fn endpoint(&self, profile: CallProfile) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.models.model_for(profile))
    }
}

#[async_trait]
impl ModelGateway for GenerativeGateway {
    async fn invoke(
        &self,
        profile: CallProfile,
        payload: &PromptPayload,
    ) -> Result<GatewayOutput, GatewayError> {
        let options = CallOptions::resolve(profile, payload, self.thinking_budget)?;
        let request = GenerateContentRequest::build(&payload.text, &options);
        let model = self.models.model_for(profile);

        tracing::debug!(%profile, model, prompt_chars = payload.text.len(), "invoking model");
        let started = Instant::now();

        let response = self
            .client
            .post(self.endpoint(profile))
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::Transport {
                profile,
                reason: if e.is_timeout() {
                    format!("request timed out after {}s", REQUEST_TIMEOUT.as_secs())
                } else {
                    e.to_string()
                },
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| GatewayError::Transport {
            profile,
            reason: format!("failed to read response body: {}", e),
        })?;

        if !status.is_success() {
            tracing::warn!(%profile, model, status = status.as_u16(), "model service returned an error");
            return Err(GatewayError::Upstream { profile, status: status.as_u16(), body });
        }

        let output = GatewayResponse::parse(profile, &body)?.into_output();
        tracing::info!(
            %profile,
            model,
            elapsed_ms = started.elapsed().as_millis() as u64,
            references = output.provenance.len(),
            "model call complete"
        );

        Ok(output)
    }
}

/// Request body for the generateContent endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<&'a serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking_config: Option<ThinkingConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

impl<'a> GenerateContentRequest<'a> {
    fn build(text: &'a str, options: &'a CallOptions) -> Self {
        let tools = if options.search_grounding {
            vec![Tool { google_search: GoogleSearch {} }]
        } else {
            Vec::new()
        };

        let generation_config = if options.response_schema.is_some()
            || options.thinking_budget.is_some()
        {
            Some(GenerationConfig {
                response_mime_type: options.response_schema.as_ref().map(|_| "application/json"),
                response_schema: options.response_schema.as_ref(),
                thinking_config: options
                    .thinking_budget
                    .map(|thinking_budget| ThinkingConfig { thinking_budget }),
            })
        } else {
            None
        };

        Self {
            contents: vec![RequestContent { role: "user", parts: vec![RequestPart { text }] }],
            tools,
            generation_config,
        }
    }
}
