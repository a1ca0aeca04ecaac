//! Parse-then-validate for structured model output.
//!
//! Model text is first turned into JSON by [`crate::utils::json`], then
//! deserialized (structural checks: required fields, enum values, types)
//! and finally checked against the record's own invariants. Both checking
//! stages fail with [`AppError::Validation`]; nothing is coerced or patched.

pub mod response;

use crate::types::{AppError, Book, ResearchData, Result};
use crate::utils::json::extract_json;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Semantic invariants of a record produced by a model.
pub trait Validate {
    /// Used in error messages: "Invalid {SUBJECT} structure".
    const SUBJECT: &'static str;

    fn validate(&self) -> std::result::Result<(), String>;
}

/// Deserializes an already-parsed JSON value and checks its invariants.
pub fn validate_value<T>(value: Value) -> Result<T>
where
    T: DeserializeOwned + Validate,
{
    let record: T =
        serde_json::from_value(value).map_err(|e| AppError::validation(T::SUBJECT, e.to_string()))?;
    record
        .validate()
        .map_err(|reason| AppError::validation(T::SUBJECT, reason))?;
    Ok(record)
}

/// Extracts JSON from raw model text, then validates it as `T`.
pub fn parse_validated<T>(raw: &str) -> Result<T>
where
    T: DeserializeOwned + Validate,
{
    let value: Value = extract_json(raw)?;
    validate_value(value)
}

impl Validate for ResearchData {
    const SUBJECT: &'static str = "research";

    fn validate(&self) -> std::result::Result<(), String> {
        if !(1..=10).contains(&self.ethical_rating) {
            return Err(format!(
                "ethicalRating {} is outside 1..=10",
                self.ethical_rating
            ));
        }
        Ok(())
    }
}

impl Validate for Book {
    const SUBJECT: &'static str = "draft";

    fn validate(&self) -> std::result::Result<(), String> {
        if self.chapters.is_empty() {
            return Err("book has no chapters".to_string());
        }

        let mut previous: Option<u32> = None;
        for (index, chapter) in self.chapters.iter().enumerate() {
            if chapter.number == 0 {
                return Err(format!("chapter at position {} has number 0", index + 1));
            }
            if let Some(prev) = previous {
                if chapter.number <= prev {
                    return Err(format!(
                        "chapter numbers must increase (found {} after {})",
                        chapter.number, prev
                    ));
                }
            }
            if chapter.title.trim().is_empty() {
                return Err(format!("chapter {} has an empty title", chapter.number));
            }
            if chapter.content.trim().is_empty() {
                return Err(format!("chapter {} has empty content", chapter.number));
            }
            previous = Some(chapter.number);
        }
        Ok(())
    }
}
