use super::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============= Book Types =============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisualKind {
    Hero,
    Chart,
    Callout,
    Portrait,
    Diagram,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualElement {
    #[serde(rename = "type")]
    pub kind: VisualKind,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cover {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blurb: Option<String>,
    pub visual_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuotePosition {
    Left,
    Right,
}

/// Margin quip from the book's sarcastic mascot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PosiBotQuote {
    pub position: QuotePosition,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub number: u32,
    pub title: String,
    /// Markdown body.
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posi_bot_quotes: Option<Vec<PosiBotQuote>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visuals: Option<Vec<VisualElement>>,
}

impl Chapter {
    pub fn visuals(&self) -> &[VisualElement] {
        self.visuals.as_deref().unwrap_or_default()
    }

    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub title: String,
    pub subtitle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_cover: Option<Cover>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_cover: Option<Cover>,
    pub chapters: Vec<Chapter>,
}

// ============= Image Slots =============

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverSide {
    Front,
    Back,
}

/// Addresses one image slot in a [`Book`].
///
/// `chapter` and `visual` are zero-based indices, not chapter numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageTarget {
    Cover(CoverSide),
    Visual { chapter: usize, visual: usize },
}

impl fmt::Display for ImageTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageTarget::Cover(CoverSide::Front) => write!(f, "front"),
            ImageTarget::Cover(CoverSide::Back) => write!(f, "back"),
            ImageTarget::Visual { chapter, visual } => write!(f, "visual:{}:{}", chapter, visual),
        }
    }
}

impl FromStr for ImageTarget {
    type Err = AppError;

    /// Accepts `front`, `back` or `visual:<chapter>:<visual>`.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "front" => Ok(ImageTarget::Cover(CoverSide::Front)),
            "back" => Ok(ImageTarget::Cover(CoverSide::Back)),
            other => {
                let mut parts = other.split(':');
                match (parts.next(), parts.next(), parts.next(), parts.next()) {
                    (Some("visual"), Some(c), Some(v), None) => {
                        let chapter = c.parse().map_err(|_| invalid_target(s))?;
                        let visual = v.parse().map_err(|_| invalid_target(s))?;
                        Ok(ImageTarget::Visual { chapter, visual })
                    }
                    _ => Err(invalid_target(s)),
                }
            }
        }
    }
}

fn invalid_target(s: &str) -> AppError {
    AppError::InvalidInput(format!(
        "image target '{}' must be 'front', 'back' or 'visual:<chapter>:<visual>'",
        s
    ))
}

impl Book {
    pub fn cover(&self, side: CoverSide) -> Option<&Cover> {
        match side {
            CoverSide::Front => self.front_cover.as_ref(),
            CoverSide::Back => self.back_cover.as_ref(),
        }
    }

    fn cover_mut(&mut self, side: CoverSide) -> Option<&mut Cover> {
        match side {
            CoverSide::Front => self.front_cover.as_mut(),
            CoverSide::Back => self.back_cover.as_mut(),
        }
    }

    fn visual(&self, chapter: usize, visual: usize) -> Option<&VisualElement> {
        self.chapters.get(chapter)?.visuals().get(visual)
    }

    /// Text the image generator should draw for a slot.
    pub fn image_prompt(&self, target: ImageTarget) -> Option<&str> {
        match target {
            ImageTarget::Cover(side) => self.cover(side).map(|c| c.visual_description.as_str()),
            ImageTarget::Visual { chapter, visual } => self
                .visual(chapter, visual)
                .map(|v| v.description.as_str()),
        }
    }

    pub fn image_url(&self, target: ImageTarget) -> Option<&str> {
        match target {
            ImageTarget::Cover(side) => self.cover(side)?.image_url.as_deref(),
            ImageTarget::Visual { chapter, visual } => {
                self.visual(chapter, visual)?.image_url.as_deref()
            }
        }
    }

    /// Slots that have a description but no image yet, in reading order.
    pub fn placeholders(&self) -> Vec<ImageTarget> {
        let mut targets = Vec::new();
        for side in [CoverSide::Front, CoverSide::Back] {
            if matches!(self.cover(side), Some(c) if c.image_url.is_none()) {
                targets.push(ImageTarget::Cover(side));
            }
        }
        for (chapter, ch) in self.chapters.iter().enumerate() {
            for (visual, v) in ch.visuals().iter().enumerate() {
                if v.image_url.is_none() {
                    targets.push(ImageTarget::Visual { chapter, visual });
                }
            }
        }
        targets
    }

    /// Returns a new book with `url` stored in the given slot. `self` is
    /// left untouched.
    pub fn with_image(&self, target: ImageTarget, url: impl Into<String>) -> Result<Book> {
        let mut next = self.clone();
        let slot = match target {
            ImageTarget::Cover(side) => next.cover_mut(side).map(|c| &mut c.image_url),
            ImageTarget::Visual { chapter, visual } => next
                .chapters
                .get_mut(chapter)
                .and_then(|ch| ch.visuals.as_mut())
                .and_then(|vs| vs.get_mut(visual))
                .map(|v| &mut v.image_url),
        };
        match slot {
            Some(slot) => {
                *slot = Some(url.into());
                Ok(next)
            }
            None => Err(AppError::NotFound(format!("image slot {}", target))),
        }
    }

    pub fn total_words(&self) -> usize {
        self.chapters.iter().map(Chapter::word_count).sum()
    }
}
