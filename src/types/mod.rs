pub mod book;
pub mod project;
pub mod research;
pub mod settings;

pub use book::{
    Book, Chapter, Cover, CoverSide, ImageTarget, PosiBotQuote, QuotePosition, VisualElement,
    VisualKind,
};
pub use project::{Branch, Project, ProjectExport, EXPORT_SCHEMA_VERSION, ORIGINAL_BRANCH_NAME};
pub use research::{
    AffiliateKind, AffiliateOpportunity, CaseStudy, CaseStudyKind, ResearchData, Stat,
};
pub use settings::{GenSettings, SettingsWarning};

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Model API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("LLM error: {0}")]
    LLM(String),

    /// Model output could not be parsed as JSON. `raw` keeps the original
    /// text for diagnostics and is not part of the display message.
    #[error("Failed to parse model output as JSON: {message}")]
    Parse { message: String, raw: String },

    #[error("Invalid {subject} structure: {reason}")]
    Validation {
        subject: &'static str,
        reason: String,
    },

    #[error("Investigation failed: all research agents failed ({0})")]
    AllAgentsFailed(String),

    #[error("All image models failed: {0}")]
    AllModelsFailed(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub(crate) fn parse(message: impl Into<String>, raw: &str) -> Self {
        AppError::Parse {
            message: message.into(),
            raw: raw.to_string(),
        }
    }

    pub(crate) fn validation(subject: &'static str, reason: impl Into<String>) -> Self {
        AppError::Validation {
            subject,
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(format!("JSON error: {}", err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(format!("I/O error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
