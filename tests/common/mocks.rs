//! Mock implementations for testing.
//!
//! [`ScriptedTransport`] stands in for the Gemini API. Every call is
//! recorded (model, prompts, virtual time) and answered by a handler
//! closure, so a test can route on the model id or the system prompt and
//! script failures per attempt.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::time::Instant;
use yit::llm::client::{ImagePrediction, ImagePredictResponse};
use yit::llm::{GenerateRequest, ImagePredictRequest, ModelResponse, ModelTransport, Part};
use yit::types::{AppError, Result};
use yit::{ModelClient, RetryPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Generate,
    Predict,
}

/// One request as the transport saw it.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub kind: CallKind,
    pub model: String,
    pub system: String,
    pub prompt: String,
    /// Whether the request carried an inline image (edits do).
    pub has_image: bool,
    pub at: Instant,
}

type Handler = dyn Fn(&RecordedCall) -> Result<ModelResponse> + Send + Sync;

/// Transport whose replies come from a closure.
///
/// `predict` calls are answered by the same handler; the first inline image
/// of the returned response becomes the prediction.
///
/// # Examples
///
/// ```ignore
/// let transport = ScriptedTransport::new(|call| match call.model.as_str() {
///     "model-a" => Err(api_error(503, "UNAVAILABLE")),
///     _ => image("image/png", "AAAA"),
/// });
/// let client = transport.client(RetryPolicy::no_retries());
/// ```
pub struct ScriptedTransport {
    handler: Box<Handler>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    pub fn new<F>(handler: F) -> Arc<Self>
    where
        F: Fn(&RecordedCall) -> Result<ModelResponse> + Send + Sync + 'static,
    {
        Arc::new(Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn client(self: &Arc<Self>, policy: RetryPolicy) -> ModelClient {
        ModelClient::new(self.clone(), policy)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Model ids in call order.
    pub fn models_called(&self) -> Vec<String> {
        self.calls.lock().iter().map(|c| c.model.clone()).collect()
    }

    fn record(&self, call: RecordedCall) -> Result<ModelResponse> {
        let reply = (self.handler)(&call);
        self.calls.lock().push(call);
        reply
    }
}

#[async_trait]
impl ModelTransport for ScriptedTransport {
    async fn generate_content(&self, request: &GenerateRequest) -> Result<ModelResponse> {
        let has_image = request
            .contents
            .iter()
            .flat_map(|c| c.parts.iter())
            .any(|p| p.inline_data.is_some());
        self.record(RecordedCall {
            kind: CallKind::Generate,
            model: request.model.clone(),
            system: request.system_text(),
            prompt: request.prompt_text(),
            has_image,
            at: Instant::now(),
        })
    }

    async fn predict_images(
        &self,
        request: &ImagePredictRequest,
    ) -> Result<ImagePredictResponse> {
        let response = self.record(RecordedCall {
            kind: CallKind::Predict,
            model: request.model.clone(),
            system: String::new(),
            prompt: request
                .instances
                .iter()
                .map(|i| i.prompt.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
            has_image: false,
            at: Instant::now(),
        })?;

        let predictions = response
            .first_inline_data()
            .map(|d| ImagePrediction {
                bytes_base64_encoded: Some(d.data.clone()),
                mime_type: Some(d.mime_type.clone()),
            })
            .into_iter()
            .collect();
        Ok(ImagePredictResponse { predictions })
    }
}

// ============= Reply Helpers =============

pub fn text(body: impl Into<String>) -> Result<ModelResponse> {
    Ok(ModelResponse::from_text(body))
}

pub fn json_reply(value: &Value) -> Result<ModelResponse> {
    text(value.to_string())
}

pub fn image(mime_type: &str, data: &str) -> Result<ModelResponse> {
    Ok(ModelResponse::from_parts(vec![Part::inline(mime_type, data)]))
}

pub fn api_error(status: u16, message: &str) -> AppError {
    AppError::Api {
        status,
        message: message.to_string(),
    }
}

// ============= Fixtures =============

/// Research with `case_studies` entries, alternating winners and losers.
pub fn research_json(case_studies: usize) -> Value {
    let cases: Vec<Value> = (0..case_studies)
        .map(|i| {
            json!({
                "name": format!("Store {}", i + 1),
                "type": if i % 2 == 0 { "WINNER" } else { "LOSER" },
                "background": "Started with a Shopify theme and a credit card.",
                "strategy": "Paid social ads on trending gadgets.",
                "outcome": if i % 2 == 0 { "Sold the store" } else { "Closed after six months" },
                "revenue": format!("${}k", (i + 1) * 12)
            })
        })
        .collect();

    json!({
        "summary": "Dropshipping sells the dream of inventory-free retail.",
        "ethicalRating": 4,
        "profitPotential": "Low for most, high for course sellers",
        "marketStats": [
            {"label": "Failure rate", "value": "90%", "context": "within the first year"}
        ],
        "hiddenCosts": [
            {"label": "Ad spend", "value": "$1,500/mo", "context": "before the first sale"}
        ],
        "caseStudies": cases,
        "affiliates": [
            {
                "program": "Shopify Partners",
                "potential": "High",
                "type": "WRITER",
                "commission": "200% of first month",
                "notes": "Pays for referrals"
            }
        ]
    })
}

/// A book with `chapters` numbered chapters, covers and one visual each.
pub fn book_json(chapters: usize) -> Value {
    let chapters: Vec<Value> = (1..=chapters)
        .map(|n| {
            json!({
                "number": n,
                "title": format!("Chapter {}", n),
                "content": format!("## Part {}\n\nThe numbers do not add up, again.", n),
                "posiBotQuotes": [{"position": "LEFT", "text": "Passive income!"}],
                "visuals": [{
                    "type": "CHART",
                    "description": format!("Bar chart of losses, chapter {}", n),
                    "caption": "Where the money went"
                }]
            })
        })
        .collect();

    json!({
        "title": "Why It Fails",
        "subtitle": "A forensic look at dropshipping",
        "frontCover": {
            "titleText": "Why It Fails",
            "visualDescription": "A cardboard box full of unpaid invoices"
        },
        "backCover": {
            "blurb": "Before you buy the course, read this.",
            "visualDescription": "An empty warehouse at night"
        },
        "chapters": chapters
    })
}
