//! GeoProspect LLM - Model Gateway port and adapters
//!
//! This crate defines the port through which the analysis pipeline reaches the
//! generative model service, the typed per-profile responses validated at that
//! boundary, and the HTTP adapter for the generative-language REST API.

pub mod error;
pub mod gemini;
pub mod ports;
pub mod response;
pub mod text;

// Re-export main types
pub use error::GatewayError;
pub use gemini::GenerativeGateway;
pub use ports::{CallOptions, CallProfile, GatewayOutput, ModelGateway, PromptPayload};
pub use response::{GatewayResponse, PlainResponse, SearchGroundedResponse, StructuredResponse};
pub use text::strip_code_fences;
