//! # yit-forge - forensic research dossiers and nano-books
//!
//! Turns a single topic into structured research and an illustrated,
//! 8-chapter "nano-book", using the Gemini API for every model call.
//!
//! ## Overview
//!
//! yit-forge can be used in two ways:
//!
//! 1. **As a command-line tool** - Run the `yit-forge` binary
//! 2. **As a library** - Embed the pipeline behind your own front end
//!
//! ### Basic Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use yit::{GeminiTransport, GenSettings, ModelClient, RetryPolicy, Studio, YitConfig};
//!
//! #[tokio::main]
//! async fn main() -> yit::Result<()> {
//!     let config = YitConfig::default();
//!     let transport = GeminiTransport::new(config.api_key().ok(), &config.api.base_url);
//!     let client = ModelClient::new(Arc::new(transport), RetryPolicy::default());
//!
//!     let studio = Studio::from_config(&config, client);
//!     let project = studio
//!         .investigate("Dropshipping", GenSettings::default(), None)
//!         .await?;
//!
//!     println!("{}", project.branches[0].book.title);
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! 1. [`research`] - Four agents investigate in parallel; their reports are
//!    synthesized into a validated [`ResearchData`]
//! 2. [`agents::author`] - Drafts a [`Book`] from the research and [`GenSettings`]
//! 3. [`media`] - Fills image slots through an ordered list of image models
//! 4. [`workflows`] - Keeps everything in an immutable [`Project`] with branches
//!
//! ## Modules
//!
//! - [`agents`] - Research agents and the author
//! - [`llm`] - Model client, retry policy and the Gemini transport
//! - [`schema`] - Response schemas and structural validation
//! - [`types`] - Domain records and error handling
//! - [`utils`] - JSON extraction and TOML configuration

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// Research agents and the book author.
pub mod agents;
/// Command-line front end.
pub mod cli;
/// Model client, retry policy and transports.
pub mod llm;
/// Image generation and editing.
pub mod media;
/// Multi-agent research coordination.
pub mod research;
/// Response schemas and validation.
pub mod schema;
/// Core types (records, settings, errors).
pub mod types;
/// JSON extraction and configuration.
pub mod utils;
/// Project workflow.
pub mod workflows;

// Re-export commonly used types
pub use agents::{AuthorAgent, Investigator, InvestigatorRole};
pub use llm::{
    GeminiTransport, ImageModel, ImageModelCatalog, ModelClient, ModelTransport, RetryPolicy,
};
pub use media::ImageService;
pub use research::{AgentState, AgentStatus, ProgressObserver, ResearchCoordinator};
pub use types::{
    AppError, Book, Branch, GenSettings, ImageTarget, Project, ProjectExport, ResearchData, Result,
};
pub use utils::toml_config::YitConfig;
pub use workflows::Studio;
