//! Image model capabilities
//!
//! Each image model is described by what it can do rather than by its name.
//! The image service reads these flags to pick request options and to filter
//! candidates for editing.
//!
//! # Example
//!
//! ```rust,ignore
//! use yit::llm::capabilities::ImageModelCatalog;
//!
//! let catalog = ImageModelCatalog::default();
//! let hierarchy = catalog.resolve(&["gemini-2.5-flash-image".to_string()]);
//! assert!(hierarchy[0].supports_edit);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

pub const GEMINI_3_PRO_IMAGE: &str = "gemini-3-pro-image-preview";
pub const GEMINI_25_FLASH_IMAGE: &str = "gemini-2.5-flash-image";
pub const IMAGEN_3: &str = "imagen-3.0-generate-001";

/// Which endpoint an image model is served from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageApi {
    /// Multimodal `generateContent`; image comes back as inline data.
    #[default]
    GenerateContent,
    /// Imagen `predict`; image comes back as a base64 prediction.
    Predict,
}

/// Capability descriptor for one image model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageModel {
    /// Model identifier sent to the API
    pub id: String,

    #[serde(default)]
    pub api: ImageApi,

    /// Accepts the `imageSize: "2K"` option
    #[serde(default)]
    pub supports_high_res: bool,

    /// Accepts an input image plus an instruction
    #[serde(default)]
    pub supports_edit: bool,
}

impl ImageModel {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            api: ImageApi::GenerateContent,
            supports_high_res: false,
            supports_edit: false,
        }
    }

    pub fn with_api(mut self, api: ImageApi) -> Self {
        self.api = api;
        self
    }

    pub fn with_high_res(mut self) -> Self {
        self.supports_high_res = true;
        self
    }

    pub fn with_edit(mut self) -> Self {
        self.supports_edit = true;
        self
    }
}

/// Known image models plus the default generation order.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageModelCatalog {
    models: Vec<ImageModel>,
    default_hierarchy: Vec<String>,
    edit_fallback: String,
}

impl Default for ImageModelCatalog {
    fn default() -> Self {
        let models = vec![
            ImageModel::new(GEMINI_3_PRO_IMAGE).with_high_res().with_edit(),
            ImageModel::new(GEMINI_25_FLASH_IMAGE).with_edit(),
            ImageModel::new(IMAGEN_3).with_api(ImageApi::Predict),
        ];
        let default_hierarchy = models.iter().map(|m| m.id.clone()).collect();
        Self {
            models,
            default_hierarchy,
            edit_fallback: GEMINI_25_FLASH_IMAGE.to_string(),
        }
    }
}

impl ImageModelCatalog {
    pub fn new(
        models: Vec<ImageModel>,
        default_hierarchy: Vec<String>,
        edit_fallback: impl Into<String>,
    ) -> Self {
        Self {
            models,
            default_hierarchy,
            edit_fallback: edit_fallback.into(),
        }
    }

    /// Adds or replaces a descriptor by id.
    pub fn register(&mut self, model: ImageModel) {
        match self.models.iter_mut().find(|m| m.id == model.id) {
            Some(existing) => *existing = model,
            None => self.models.push(model),
        }
    }

    pub fn get(&self, id: &str) -> Option<&ImageModel> {
        self.models.iter().find(|m| m.id == id)
    }

    /// Descriptor for `id`; unknown ids get a plain generate-only descriptor.
    pub fn describe(&self, id: &str) -> ImageModel {
        match self.get(id) {
            Some(model) => model.clone(),
            None => {
                debug!(model = id, "Unknown image model, assuming generate-only");
                ImageModel::new(id)
            }
        }
    }

    pub fn resolve(&self, ids: &[String]) -> Vec<ImageModel> {
        ids.iter().map(|id| self.describe(id)).collect()
    }

    pub fn default_hierarchy(&self) -> Vec<ImageModel> {
        self.resolve(&self.default_hierarchy)
    }

    /// Uses `ids` when given and non-empty, the default order otherwise.
    pub fn hierarchy_or_default(&self, ids: Option<&[String]>) -> Vec<ImageModel> {
        match ids {
            Some(ids) if !ids.is_empty() => self.resolve(ids),
            _ => self.default_hierarchy(),
        }
    }

    pub fn edit_fallback(&self) -> ImageModel {
        let mut model = self.describe(&self.edit_fallback);
        model.supports_edit = true;
        model
    }

    pub fn models(&self) -> &[ImageModel] {
        &self.models
    }
}
