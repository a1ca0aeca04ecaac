//! Image generation and editing over an ordered list of models.
//!
//! Candidates are tried in order, one attempt each (retries for transient
//! errors happen inside the model client). The first image returned wins;
//! every failure is logged and the next model is tried.

use crate::llm::capabilities::{ImageApi, ImageModel, ImageModelCatalog};
use crate::llm::client::{ImageConfig, InlineData};
use crate::llm::{CallWeight, GenerateRequest, ImagePredictRequest, ModelClient, Part};
use crate::types::{AppError, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::{debug, info, warn};

pub const DEFAULT_IMAGE_STYLE: &str = "Photorealistic, Gritty, Forensic, High Contrast";
pub const ASPECT_RATIO: &str = "3:4";
pub const HIGH_RES_SIZE: &str = "2K";
const DEFAULT_MIME: &str = "image/png";

/// `data:<mime>;base64,<data>`
pub fn to_data_uri(mime_type: &str, data: &str) -> String {
    let mime = if mime_type.trim().is_empty() {
        DEFAULT_MIME
    } else {
        mime_type
    };
    format!("data:{};base64,{}", mime, data)
}

/// Splits a data URI into mime type and base64 payload. Bare base64 is
/// accepted and assumed to be PNG.
pub fn split_data_uri(uri: &str) -> (String, String) {
    match uri.strip_prefix("data:").and_then(|rest| rest.split_once(',')) {
        Some((header, payload)) => {
            let mime = header
                .split(';')
                .next()
                .filter(|m| !m.is_empty())
                .unwrap_or(DEFAULT_MIME);
            (mime.to_string(), payload.to_string())
        }
        None => (DEFAULT_MIME.to_string(), uri.to_string()),
    }
}

/// Decodes a data URI (or bare base64) into its mime type and raw bytes.
pub fn decode_data_uri(uri: &str) -> Result<(String, Vec<u8>)> {
    let (mime, payload) = split_data_uri(uri);
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| AppError::InvalidInput(format!("image is not valid base64: {}", e)))?;
    Ok((mime, bytes))
}

pub fn encode_data_uri(mime_type: &str, bytes: &[u8]) -> String {
    to_data_uri(mime_type, &STANDARD.encode(bytes))
}

/// Mime type for an image file extension, if it is one we know.
pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

pub fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "png",
    }
}

pub fn image_prompt(description: &str, style: Option<&str>) -> String {
    let style = style
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(DEFAULT_IMAGE_STYLE);
    format!(
        "Style: {}. Subject: {}. No text in image.",
        style, description
    )
}

fn edit_prompt(instruction: &str) -> String {
    format!(
        "Modify this image: {}. Keep the same aspect ratio.",
        instruction
    )
}

pub struct ImageService {
    client: ModelClient,
    catalog: ImageModelCatalog,
}

impl ImageService {
    pub fn new(client: ModelClient, catalog: ImageModelCatalog) -> Self {
        Self { client, catalog }
    }

    pub fn catalog(&self) -> &ImageModelCatalog {
        &self.catalog
    }

    /// Generates an image and returns it as a data URI.
    ///
    /// `high_res` only takes effect on models that support it. An empty
    /// `hierarchy` uses the catalog's default order.
    pub async fn generate_image(
        &self,
        description: &str,
        style: Option<&str>,
        high_res: bool,
        hierarchy: &[ImageModel],
    ) -> Result<String> {
        let candidates = if hierarchy.is_empty() {
            self.catalog.default_hierarchy()
        } else {
            hierarchy.to_vec()
        };
        let prompt = image_prompt(description, style);

        let mut failures = Vec::new();
        for model in &candidates {
            debug!(model = %model.id, high_res, "Attempting image generation");
            match self.generate_with(model, &prompt, high_res).await {
                Ok(uri) => {
                    info!(model = %model.id, "Image generated");
                    return Ok(uri);
                }
                Err(e) => {
                    warn!(model = %model.id, error = %e, "Image model failed, trying next");
                    failures.push(format!("{}: {}", model.id, e));
                }
            }
        }

        Err(AppError::AllModelsFailed(exhausted(&failures)))
    }

    /// Applies `instruction` to an existing image (data URI or bare base64).
    ///
    /// Only edit-capable models are tried; if the hierarchy has none, the
    /// catalog's edit fallback is used.
    pub async fn edit_image(
        &self,
        image: &str,
        instruction: &str,
        hierarchy: &[ImageModel],
    ) -> Result<String> {
        let mut candidates: Vec<ImageModel> = if hierarchy.is_empty() {
            self.catalog.default_hierarchy()
        } else {
            hierarchy.to_vec()
        };
        candidates.retain(|m| m.supports_edit);
        if candidates.is_empty() {
            let fallback = self.catalog.edit_fallback();
            debug!(model = %fallback.id, "No edit-capable model in hierarchy, using fallback");
            candidates.push(fallback);
        }

        let (mime_type, data) = split_data_uri(image);
        let parts = vec![
            Part::inline(mime_type, data),
            Part::text(edit_prompt(instruction)),
        ];

        let mut failures = Vec::new();
        for model in &candidates {
            let request = GenerateRequest::new(&model.id).with_user_parts(parts.clone());
            match self.inline_image(&request).await {
                Ok(uri) => {
                    info!(model = %model.id, "Image edited");
                    return Ok(uri);
                }
                Err(e) => {
                    warn!(model = %model.id, error = %e, "Image edit failed, trying next");
                    failures.push(format!("{}: {}", model.id, e));
                }
            }
        }

        Err(AppError::AllModelsFailed(exhausted(&failures)))
    }

    async fn generate_with(
        &self,
        model: &ImageModel,
        prompt: &str,
        high_res: bool,
    ) -> Result<String> {
        match model.api {
            ImageApi::Predict => {
                let request = ImagePredictRequest::new(&model.id, prompt, ASPECT_RATIO);
                let response = self.client.predict_images(&request).await?;
                response
                    .predictions
                    .into_iter()
                    .find_map(|p| {
                        let mime = p.mime_type.as_deref().unwrap_or("image/jpeg");
                        p.bytes_base64_encoded
                            .as_deref()
                            .map(|data| to_data_uri(mime, data))
                    })
                    .ok_or_else(|| AppError::LLM("no image payload in response".to_string()))
            }
            ImageApi::GenerateContent => {
                let image_size =
                    (high_res && model.supports_high_res).then(|| HIGH_RES_SIZE.to_string());
                let request = GenerateRequest::new(&model.id)
                    .with_user_text(prompt)
                    .with_image_config(ImageConfig {
                        aspect_ratio: Some(ASPECT_RATIO.to_string()),
                        image_size,
                    });
                self.inline_image(&request).await
            }
        }
    }

    async fn inline_image(&self, request: &GenerateRequest) -> Result<String> {
        let response = self.client.generate(request, CallWeight::Light).await?;
        match response.first_inline_data() {
            Some(InlineData { mime_type, data }) if !data.is_empty() => {
                Ok(to_data_uri(mime_type, data))
            }
            _ => Err(AppError::LLM("no image payload in response".to_string())),
        }
    }
}

fn exhausted(failures: &[String]) -> String {
    if failures.is_empty() {
        "no models to try".to_string()
    } else {
        failures.join("; ")
    }
}
