//! Remote model access
//!
//! Everything that talks to the hosted generation API goes through here:
//! - [`ModelTransport`] - one HTTP exchange per call, swappable in tests
//! - [`ModelClient`] - the shared handle adding retries and timeouts
//! - [`GeminiTransport`] - the production transport
//! - [`ImageModelCatalog`] - capability descriptors for image models
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use yit::llm::{CallWeight, GeminiTransport, GenerateRequest, ModelClient, RetryPolicy};
//!
//! let transport = GeminiTransport::new(std::env::var("GEMINI_API_KEY").ok(), GEMINI_API_BASE_URL);
//! let client = ModelClient::new(Arc::new(transport), RetryPolicy::default());
//!
//! let request = GenerateRequest::new("gemini-2.5-flash").with_user_text("What is 2+2?");
//! let response = client.generate(&request, CallWeight::Light).await?;
//! println!("{}", response.text());
//! ```

/// Image model capability descriptors.
pub mod capabilities;
/// Request/response types, the transport trait and the retrying client.
pub mod client;
/// Gemini REST transport.
pub mod gemini;
/// Backoff policy and error classification.
pub mod retry;

pub use capabilities::{ImageApi, ImageModel, ImageModelCatalog};
pub use client::{
    GenerateRequest, ImagePredictRequest, ImagePredictResponse, ModelClient, ModelResponse,
    ModelTransport, Part,
};
pub use gemini::{GeminiTransport, GEMINI_API_BASE_URL};
pub use retry::{classify, CallWeight, FailureClass, RetryPolicy};
