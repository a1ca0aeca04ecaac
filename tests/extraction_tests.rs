//! Parse-then-validate pipeline on realistic model output

mod common;

use common::mocks::{book_json, research_json};
use rstest::rstest;
use yit::schema::parse_validated;
use yit::types::{AppError, Book, ResearchData};
use yit::utils::json::{extract_json, strip_code_fences};

fn wrappings(body: &str) -> Vec<String> {
    vec![
        body.to_string(),
        format!("```json\n{}\n```", body),
        format!("```\n{}\n```", body),
        format!("Sure! Here is the record:\n\n{}\n\nHope this helps.", body),
        format!("Notes first.\n```json\n{}\n```\nThat is all.", body),
    ]
}

#[test]
fn test_extraction_is_independent_of_wrapping() {
    let body = research_json(7).to_string();
    let expected: ResearchData = serde_json::from_str(&body).expect("fixture");

    for raw in wrappings(&body) {
        let parsed: ResearchData = parse_validated(&raw).expect("wrapped research");
        assert_eq!(parsed, expected, "wrapping: {:?}", raw);
    }
}

#[test]
fn test_extraction_is_idempotent_on_cleaned_text() {
    let raw = format!("```json\n{}\n```", book_json(8));
    let once = strip_code_fences(&raw);
    let twice = strip_code_fences(&once);
    assert_eq!(once, twice);

    let first: Book = extract_json(&raw).expect("book");
    let second: Book = extract_json(&once).expect("book");
    assert_eq!(first, second);
}

#[test]
fn test_markdown_fences_in_chapter_content_survive() {
    let mut book: Book = serde_json::from_value(book_json(3)).expect("fixture");
    book.chapters[1].content =
        "The guru's bot:\n```json\n{\"roi\": 900}\n```\nDon't.".to_string();

    let compact = serde_json::to_string(&book).expect("serialize");
    let pretty = serde_json::to_string_pretty(&book).expect("serialize");

    for body in [compact, pretty] {
        for raw in [body.clone(), format!("```json\n{}\n```", body)] {
            let parsed: Book = parse_validated(&raw).expect("book with fenced content");
            assert_eq!(parsed, book, "input: {:?}", raw);
        }
    }
}

#[rstest]
#[case("")]
#[case("   \n ")]
#[case("I could not find anything about that topic.")]
#[case("{ this is not json }")]
fn test_unparseable_output_is_a_parse_error(#[case] raw: &str) {
    let err = parse_validated::<ResearchData>(raw).unwrap_err();
    match err {
        AppError::Parse { raw: kept, .. } => assert_eq!(kept, raw),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_missing_list_is_a_validation_error() {
    let mut research = research_json(2);
    research
        .as_object_mut()
        .expect("object")
        .remove("caseStudies");

    let err = parse_validated::<ResearchData>(&research.to_string()).unwrap_err();
    assert!(matches!(err, AppError::Validation { subject: "research", .. }));
}

#[test]
fn test_null_list_is_a_validation_error() {
    let mut research = research_json(2);
    research["hiddenCosts"] = serde_json::Value::Null;

    let err = parse_validated::<ResearchData>(&research.to_string()).unwrap_err();
    assert!(matches!(err, AppError::Validation { .. }));
}

#[test]
fn test_book_without_chapters_is_rejected() {
    let mut book = book_json(0);
    book["chapters"] = serde_json::json!([]);

    let err = parse_validated::<Book>(&book.to_string()).unwrap_err();
    assert!(err.to_string().starts_with("Invalid draft structure"));
}

#[test]
fn test_chapter_numbers_must_increase() {
    let mut book = book_json(3);
    book["chapters"][2]["number"] = serde_json::json!(2);

    let err = parse_validated::<Book>(&book.to_string()).unwrap_err();
    assert!(matches!(err, AppError::Validation { subject: "draft", .. }));

    // Gaps are fine
    let mut book = book_json(3);
    book["chapters"][2]["number"] = serde_json::json!(7);
    assert!(parse_validated::<Book>(&book.to_string()).is_ok());
}
