//! LLM integration
//!
//! Provides:
//! - The [`LLMBackend`] trait for local model servers
//! - HTTP backends for Ollama and LM Studio
//! - [`LLMClient`], which adds the liveness check and bounded retry

mod client;
mod http;
mod traits;

pub use client::{
    is_malformed_response, LLMClient, ProviderInfo, RetryPolicy, MALFORMED_RESPONSE_MARKERS,
};
pub use http::{
    build_request_body, extract_completion_text, extract_error_message, HttpBackend,
    HEALTH_CHECK_TIMEOUT,
};
pub use traits::*;
