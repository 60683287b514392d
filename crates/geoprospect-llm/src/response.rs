//! Per-profile response types validated at the gateway boundary

use serde::Deserialize;

use crate::error::GatewayError;
use crate::ports::{CallProfile, GatewayOutput};
use crate::text::strip_code_fences;

/// Response of a search-grounded call
#[derive(Debug, Clone, PartialEq)]
pub struct SearchGroundedResponse {
    pub text: String,
    pub references: Vec<String>,
}

/// Response of a schema-constrained call; `text` is guaranteed to parse as JSON
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredResponse {
    pub text: String,
    pub value: serde_json::Value,
}

/// Response of a fast or deep call
#[derive(Debug, Clone, PartialEq)]
pub struct PlainResponse {
    pub text: String,
}

/// A model response, shaped by the profile that produced it
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayResponse {
    SearchGrounded(SearchGroundedResponse),
    Structured(StructuredResponse),
    Plain(PlainResponse),
}

impl GatewayResponse {
    /// Validate a raw response body for `profile`
    pub fn parse(profile: CallProfile, body: &str) -> Result<Self, GatewayError> {
        let wire: GenerateContentResponse =
            serde_json::from_str(body).map_err(|e| GatewayError::MalformedResponse {
                profile,
                reason: format!("response body is not valid JSON: {}", e),
            })?;
        Self::from_wire(profile, wire)
    }

    fn from_wire(profile: CallProfile, wire: GenerateContentResponse) -> Result<Self, GatewayError> {
        let Some(candidate) = wire.candidates.into_iter().next() else {
            let reason = match wire.prompt_feedback.and_then(|f| f.block_reason) {
                Some(block) => format!("no candidates returned (blocked: {})", block),
                None => "no candidates returned".to_string(),
            };
            return Err(GatewayError::MalformedResponse { profile, reason });
        };

        let text: String = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter(|part| !part.thought)
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            let reason = match candidate.finish_reason {
                Some(finish) => format!("response contained no text (finish reason: {})", finish),
                None => "response contained no text".to_string(),
            };
            return Err(GatewayError::MalformedResponse { profile, reason });
        }

        let response = match profile {
            CallProfile::Default => {
                let references = candidate
                    .grounding_metadata
                    .map(|metadata| metadata.reference_uris())
                    .unwrap_or_default();
                GatewayResponse::SearchGrounded(SearchGroundedResponse { text, references })
            }
            CallProfile::Structured => {
                let json_text = strip_code_fences(&text).to_string();
                let value = serde_json::from_str(&json_text).map_err(|e| {
                    GatewayError::MalformedResponse {
                        profile,
                        reason: format!("structured output is not valid JSON: {}", e),
                    }
                })?;
                GatewayResponse::Structured(StructuredResponse { text: json_text, value })
            }
            CallProfile::Fast | CallProfile::Deep => {
                GatewayResponse::Plain(PlainResponse { text })
            }
        };

        Ok(response)
    }

    /// Lower to the profile-agnostic output shape
    pub fn into_output(self) -> GatewayOutput {
        match self {
            GatewayResponse::SearchGrounded(r) => {
                GatewayOutput { text: r.text, provenance: r.references }
            }
            GatewayResponse::Structured(r) => GatewayOutput::text(r.text),
            GatewayResponse::Plain(r) => GatewayOutput::text(r.text),
        }
    }
}

/// Response body from the generateContent endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    grounding_metadata: Option<GroundingMetadata>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

impl GroundingMetadata {
    fn reference_uris(self) -> Vec<String> {
        let mut uris: Vec<String> = Vec::new();
        for chunk in self.grounding_chunks {
            let Some(uri) = chunk.web.and_then(|web| web.uri) else {
                continue;
            };
            if !uri.is_empty() && !uris.contains(&uri) {
                uris.push(uri);
            }
        }
        uris
    }
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    web: Option<WebSource>,
}

#[derive(Debug, Deserialize)]
struct WebSource {
    uri: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: serde_json::Value) -> String {
        value.to_string()
    }

    #[test]
    fn test_grounded_response_collects_unique_uris() {
        let raw = body(json!({
            "candidates": [{
                "content": {"parts": [{"text": "Report "}, {"text": "body"}]},
                "groundingMetadata": {"groundingChunks": [
                    {"web": {"uri": "https://a.example", "title": "A"}},
                    {"web": {"uri": "https://b.example", "title": "B"}},
                    {"web": {"uri": "https://a.example", "title": "A again"}},
                    {"retrievedContext": {}}
                ]}
            }]
        }));

        let response = GatewayResponse::parse(CallProfile::Default, &raw).unwrap();
        let output = response.into_output();
        assert_eq!(output.text, "Report body");
        assert_eq!(output.provenance, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn test_grounded_response_without_metadata() {
        let raw = body(json!({"candidates": [{"content": {"parts": [{"text": "ok"}]}}]}));
        match GatewayResponse::parse(CallProfile::Default, &raw).unwrap() {
            GatewayResponse::SearchGrounded(r) => assert!(r.references.is_empty()),
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[test]
    fn test_structured_response_strips_fence() {
        let raw = body(json!({
            "candidates": [{"content": {"parts": [{"text": "```json\n[{\"depth\": 0}]\n```"}]}}]
        }));
        match GatewayResponse::parse(CallProfile::Structured, &raw).unwrap() {
            GatewayResponse::Structured(r) => {
                assert_eq!(r.text, "[{\"depth\": 0}]");
                assert_eq!(r.value, json!([{"depth": 0}]));
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[test]
    fn test_structured_response_rejects_prose() {
        let raw = body(json!({"candidates": [{"content": {"parts": [{"text": "not json at all"}]}}]}));
        let err = GatewayResponse::parse(CallProfile::Structured, &raw).unwrap_err();
        assert!(matches!(
            err,
            GatewayError::MalformedResponse { profile: CallProfile::Structured, .. }
        ));
    }

    #[test]
    fn test_thought_parts_are_skipped() {
        let raw = body(json!({
            "candidates": [{"content": {"parts": [
                {"text": "thinking...", "thought": true},
                {"text": "answer"}
            ]}}]
        }));
        let output = GatewayResponse::parse(CallProfile::Deep, &raw).unwrap().into_output();
        assert_eq!(output.text, "answer");
        assert!(output.provenance.is_empty());
    }

    #[test]
    fn test_blocked_prompt_is_malformed() {
        let raw = body(json!({"promptFeedback": {"blockReason": "SAFETY"}}));
        let err = GatewayResponse::parse(CallProfile::Fast, &raw).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_empty_text_is_malformed() {
        let raw = body(json!({
            "candidates": [{"content": {"parts": []}, "finishReason": "MAX_TOKENS"}]
        }));
        let err = GatewayResponse::parse(CallProfile::Fast, &raw).unwrap_err();
        assert!(err.to_string().contains("MAX_TOKENS"));
    }

    #[test]
    fn test_non_json_body_is_malformed() {
        let err = GatewayResponse::parse(CallProfile::Fast, "<html>").unwrap_err();
        assert_eq!(err.profile(), CallProfile::Fast);
    }
}
