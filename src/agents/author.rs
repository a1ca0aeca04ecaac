//! Drafting a book from research and user settings.

use super::prompts::{
    AUTHOR_SYSTEM_PROMPT, BACK_COVER_METAPHOR, BRAND_STYLE, FRONT_COVER_METAPHOR, NANO_BOOK_SPEC,
};
use crate::llm::{CallWeight, GenerateRequest, ModelClient};
use crate::schema::{parse_validated, response::book_schema};
use crate::types::{Book, CoverSide, GenSettings, ImageTarget, ResearchData, Result};
use serde_json::json;
use tracing::{info, warn};

pub const DEFAULT_AUTHOR_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_THINKING_BUDGET: u32 = 4096;
pub const DEFAULT_CASE_STUDY_COUNT: u32 = 7;

/// Settings translated into the prose the author model is given.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftInstructions {
    pub length: String,
    pub density: String,
    pub technicality: String,
    pub case_studies: String,
    pub front_cover: String,
    pub back_cover: String,
    pub structure: String,
}

impl DraftInstructions {
    pub fn from_settings(settings: &GenSettings) -> Self {
        let length = match settings.target_word_count {
            Some(words) => format!(
                "STRICT CONSTRAINT: each chapter must be exactly {} words.",
                words
            ),
            None => match settings.length_level {
                1 => "Keep it NANO: condensed chapters of roughly 250-300 words.".to_string(),
                3 => "DEEP DIVE: long chapters of roughly 700-900 words.".to_string(),
                _ => "Standard chapters of roughly 400-500 words.".to_string(),
            },
        };

        let density = match settings.image_density {
            1 => "Text focused. Minimal visuals (0-1 per chapter).",
            3 => "Visually rich: 3-4 visual placeholders per chapter, mixing HERO images and CHARTs.",
            _ => "1-2 visual placeholders per chapter.",
        }
        .to_string();

        let technicality = match settings.tech_level {
            1 => "Visual descriptions should be ARTISTIC and abstract: metaphors, mood, symbolism.",
            3 => "Visual descriptions should be HIGHLY TECHNICAL: precise charts, axes, figures and diagrams.",
            _ => "Visual descriptions should mix metaphorical imagery with clear data charts.",
        }
        .to_string();

        let count = settings
            .case_study_count
            .unwrap_or(DEFAULT_CASE_STUDY_COUNT);
        let case_studies = format!(
            "The case-study chapter should cover {} stories, drawn from the research case studies.",
            count
        );

        let front_cover = match settings.front_cover_prompt.as_deref() {
            Some(prompt) if !prompt.trim().is_empty() => prompt.trim().to_string(),
            _ => format!("{} Style: {}", FRONT_COVER_METAPHOR, BRAND_STYLE),
        };
        let back_cover = match settings.back_cover_prompt.as_deref() {
            Some(prompt) if !prompt.trim().is_empty() => prompt.trim().to_string(),
            _ => format!("{} Style: {}", BACK_COVER_METAPHOR, BRAND_STYLE),
        };

        let structure = match settings.custom_spec.as_deref() {
            Some(spec) if !spec.trim().is_empty() => spec.to_string(),
            _ => NANO_BOOK_SPEC.to_string(),
        };

        Self {
            length,
            density,
            technicality,
            case_studies,
            front_cover,
            back_cover,
            structure,
        }
    }
}

fn draft_prompt(
    topic: &str,
    research: &ResearchData,
    settings: &GenSettings,
    instructions: &DraftInstructions,
) -> String {
    let research_json = json!({
        "summary": research.summary,
        "marketStats": research.market_stats,
        "caseStudies": research.case_studies,
    });

    format!(
        r#"Topic: {topic}

RESEARCH DATA:
{research}

USER CONSTRAINTS:
Tone: {tone}
Visual style: {style}
{length}
{density}
{technicality}
{case_studies}

COVER ART:
Front: {front}
Back: {back}

BOOK STRUCTURE:
{structure}"#,
        topic = topic,
        research = research_json,
        tone = settings.tone,
        style = settings.visual_style,
        length = instructions.length,
        density = instructions.density,
        technicality = instructions.technicality,
        case_studies = instructions.case_studies,
        front = instructions.front_cover,
        back = instructions.back_cover,
        structure = instructions.structure,
    )
}

/// Writes books from validated research.
pub struct AuthorAgent {
    client: ModelClient,
    model: String,
    thinking_budget: Option<u32>,
}

impl AuthorAgent {
    pub fn new(client: ModelClient) -> Self {
        Self {
            client,
            model: DEFAULT_AUTHOR_MODEL.to_string(),
            thinking_budget: Some(DEFAULT_THINKING_BUDGET),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_thinking_budget(mut self, budget: Option<u32>) -> Self {
        self.thinking_budget = budget;
        self
    }

    /// Produces a validated [`Book`].
    ///
    /// Out-of-range settings are logged and passed through as prompt text.
    /// User-supplied cover images replace the drafted covers' image slots.
    ///
    /// # Errors
    ///
    /// [`crate::types::AppError::Parse`] or
    /// [`crate::types::AppError::Validation`] when the model output is not a
    /// usable book, plus any error from the model client.
    pub async fn generate_draft(
        &self,
        topic: &str,
        research: &ResearchData,
        settings: &GenSettings,
    ) -> Result<Book> {
        for warning in settings.check() {
            warn!(%warning, "Generation setting outside expected range");
        }

        let instructions = DraftInstructions::from_settings(settings);
        let mut request = GenerateRequest::new(&self.model)
            .with_system_instruction(AUTHOR_SYSTEM_PROMPT)
            .with_user_text(draft_prompt(topic, research, settings, &instructions))
            .with_json_schema(book_schema());
        if let Some(budget) = self.thinking_budget {
            request = request.with_thinking_budget(budget);
        }

        info!(topic, model = %self.model, "Drafting book");
        let response = self.client.generate(&request, CallWeight::Heavy).await?;
        let book: Book = parse_validated(&response.text())?;
        info!(
            chapters = book.chapters.len(),
            words = book.total_words(),
            "Draft complete"
        );

        apply_cover_images(book, settings)
    }
}

fn apply_cover_images(mut book: Book, settings: &GenSettings) -> Result<Book> {
    let overrides = [
        (CoverSide::Front, settings.front_cover_image.as_deref()),
        (CoverSide::Back, settings.back_cover_image.as_deref()),
    ];
    for (side, image) in overrides {
        let Some(image) = image else { continue };
        if book.cover(side).is_some() {
            book = book.with_image(ImageTarget::Cover(side), image)?;
        } else {
            warn!(?side, "Custom cover image supplied but the draft has no such cover");
        }
    }
    Ok(book)
}
