use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_TONE: &str = "Satirical, forensic, data-driven";
pub const DEFAULT_VISUAL_STYLE: &str = "High contrast, editorial, gritty data visualization";

/// Bounds the front end enforces before calling into the pipeline. The
/// pipeline itself only warns when they are exceeded.
pub const MAX_TOPIC_CHARS: usize = 100;
pub const TARGET_WORD_COUNT_RANGE: std::ops::RangeInclusive<u32> = 100..=2000;
pub const CASE_STUDY_COUNT_RANGE: std::ops::RangeInclusive<u32> = 1..=50;

// ============= Generation Settings =============

/// User-chosen knobs for drafting a book.
///
/// The three levels are 1 (low), 2 (standard) and 3 (high).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenSettings {
    #[serde(default = "default_tone")]
    pub tone: String,
    #[serde(default = "default_visual_style")]
    pub visual_style: String,
    #[serde(default = "default_level")]
    pub length_level: u8,
    #[serde(default = "default_level")]
    pub image_density: u8,
    #[serde(default = "default_level")]
    pub tech_level: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_word_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_study_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_cover_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_cover_prompt: Option<String>,
    /// Replaces the default chapter plan when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_spec: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_model_hierarchy: Option<Vec<String>>,
    /// User-supplied cover art (data URI), applied after drafting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_cover_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_cover_image: Option<String>,
}

fn default_tone() -> String {
    DEFAULT_TONE.to_string()
}

fn default_visual_style() -> String {
    DEFAULT_VISUAL_STYLE.to_string()
}

fn default_level() -> u8 {
    2
}

impl Default for GenSettings {
    fn default() -> Self {
        Self {
            tone: default_tone(),
            visual_style: default_visual_style(),
            length_level: default_level(),
            image_density: default_level(),
            tech_level: default_level(),
            target_word_count: None,
            case_study_count: None,
            front_cover_prompt: None,
            back_cover_prompt: None,
            custom_spec: None,
            image_model_hierarchy: None,
            front_cover_image: None,
            back_cover_image: None,
        }
    }
}

/// A setting outside the range the front end is expected to enforce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsWarning {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for SettingsWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl GenSettings {
    /// Lists out-of-range values. Nothing is rejected or clamped.
    pub fn check(&self) -> Vec<SettingsWarning> {
        let mut warnings = Vec::new();

        for (field, level) in [
            ("lengthLevel", self.length_level),
            ("imageDensity", self.image_density),
            ("techLevel", self.tech_level),
        ] {
            if !(1..=3).contains(&level) {
                warnings.push(SettingsWarning {
                    field,
                    message: format!("level {} outside 1..=3, standard wording used", level),
                });
            }
        }

        if let Some(words) = self.target_word_count {
            if !TARGET_WORD_COUNT_RANGE.contains(&words) {
                warnings.push(SettingsWarning {
                    field: "targetWordCount",
                    message: format!(
                        "{} outside {}..={}",
                        words,
                        TARGET_WORD_COUNT_RANGE.start(),
                        TARGET_WORD_COUNT_RANGE.end()
                    ),
                });
            }
        }

        if let Some(count) = self.case_study_count {
            if !CASE_STUDY_COUNT_RANGE.contains(&count) {
                warnings.push(SettingsWarning {
                    field: "caseStudyCount",
                    message: format!(
                        "{} outside {}..={}",
                        count,
                        CASE_STUDY_COUNT_RANGE.start(),
                        CASE_STUDY_COUNT_RANGE.end()
                    ),
                });
            }
        }

        warnings
    }

    pub fn with_case_study_count(mut self, count: u32) -> Self {
        self.case_study_count = Some(count);
        self
    }

    pub fn with_image_model_hierarchy(mut self, models: Vec<String>) -> Self {
        self.image_model_hierarchy = Some(models);
        self
    }
}
