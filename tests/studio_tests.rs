//! End-to-end project workflow against a scripted Gemini API
//!
//! Covers the full investigation, branching with different settings and
//! filling image slots, checking that every update yields a new project
//! value and leaves the previous one untouched.

mod common;

use common::mocks::{book_json, image, json_reply, research_json, text, ScriptedTransport};
use std::sync::Arc;
use yit::agents::prompts::{AUTHOR_SYSTEM_PROMPT, RESEARCH_SYSTEM_PROMPT};
use yit::types::{CoverSide, ORIGINAL_BRANCH_NAME};
use yit::{AppError, GenSettings, ImageTarget, ProjectExport, RetryPolicy, Studio, YitConfig};

/// Research returns seven case studies, drafts eight chapters, images a
/// fixed PNG. Agents answer with a plain report.
fn dropshipping_transport() -> Arc<ScriptedTransport> {
    ScriptedTransport::new(|call| {
        if call.system == RESEARCH_SYSTEM_PROMPT {
            json_reply(&research_json(7))
        } else if call.system == AUTHOR_SYSTEM_PROMPT {
            // Fenced output with commentary must still parse
            text(format!("Here is your book:\n```json\n{}\n```", book_json(8)))
        } else if call.model.contains("image") || call.model.starts_with("imagen") {
            image("image/png", "UE5H")
        } else {
            text("Refund requests tripled; suppliers ship late; ads eat margins.")
        }
    })
}

fn studio(transport: &Arc<ScriptedTransport>) -> Studio {
    Studio::from_config(
        &YitConfig::default(),
        transport.client(RetryPolicy::no_retries()),
    )
}

#[tokio::test]
async fn test_dropshipping_happy_path() {
    let transport = dropshipping_transport();
    let settings = GenSettings::default().with_case_study_count(7);

    let project = studio(&transport)
        .investigate("  Dropshipping ", settings, None)
        .await
        .expect("investigation");

    assert_eq!(project.topic, "Dropshipping");
    assert_eq!(project.research.case_studies.len(), 7);
    assert_eq!(project.branches.len(), 1);

    let branch = &project.branches[0];
    assert_eq!(branch.name, ORIGINAL_BRANCH_NAME);
    assert_eq!(branch.book.chapters.len(), 8);
    assert!(branch
        .book
        .chapters
        .iter()
        .all(|c| !c.content.trim().is_empty()));

    // Four agents, one synthesis, one draft
    assert_eq!(transport.call_count(), 6);
    let draft_call = transport
        .calls()
        .into_iter()
        .find(|c| c.system == AUTHOR_SYSTEM_PROMPT)
        .expect("draft call");
    assert!(draft_call.prompt.contains("Dropshipping"));
}

#[tokio::test]
async fn test_default_case_study_count_comes_from_config() {
    let transport = dropshipping_transport();

    studio(&transport)
        .investigate("Dropshipping", GenSettings::default(), None)
        .await
        .expect("investigation");

    let synthesis = transport
        .calls()
        .into_iter()
        .find(|c| c.system == RESEARCH_SYSTEM_PROMPT)
        .expect("synthesis call");
    let expected = YitConfig::default().research.default_case_study_count;
    assert!(synthesis
        .prompt
        .contains(&format!("Generate exactly {} case studies", expected)));
}

#[tokio::test]
async fn test_empty_topic_is_rejected_before_any_call() {
    let transport = dropshipping_transport();

    let err = studio(&transport)
        .investigate("   ", GenSettings::default(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidInput(_)));
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_branches_are_independent() {
    let transport = dropshipping_transport();
    let studio = studio(&transport);

    let original = studio
        .investigate("Dropshipping", GenSettings::default(), None)
        .await
        .expect("investigation");

    let short = GenSettings {
        length_level: 1,
        ..GenSettings::default()
    };
    let branched = studio
        .create_branch(&original, short.clone(), None)
        .await
        .expect("branch");

    // The earlier value is untouched
    assert_eq!(original.branches.len(), 1);
    assert_eq!(branched.branches.len(), 2);
    assert_eq!(branched.branches[1].name, "Draft 2");
    assert_eq!(branched.branches[1].settings, short);
    assert_ne!(branched.branches[0].id, branched.branches[1].id);
    assert!(Arc::ptr_eq(&original.research, &branched.research));

    let last_draft = transport
        .calls()
        .into_iter()
        .rev()
        .find(|c| c.system == AUTHOR_SYSTEM_PROMPT)
        .expect("second draft call");
    assert!(last_draft.prompt.contains("NANO"));

    // Illustrating the new branch leaves the original branch alone
    let second_id = branched.branches[1].id.clone();
    let illustrated = studio
        .render_image(
            &branched,
            &second_id,
            ImageTarget::Cover(CoverSide::Front),
            None,
            false,
        )
        .await
        .expect("render");

    let front = ImageTarget::Cover(CoverSide::Front);
    assert_eq!(
        illustrated.branches[1].book.image_url(front),
        Some("data:image/png;base64,UE5H")
    );
    assert_eq!(illustrated.branches[0].book.image_url(front), None);
    assert_eq!(branched.branches[1].book.image_url(front), None);
}

#[tokio::test]
async fn test_render_uses_slot_description_and_branch_style() {
    let transport = dropshipping_transport();
    let studio = studio(&transport);
    let settings = GenSettings {
        visual_style: "Charcoal sketch".to_string(),
        image_model_hierarchy: Some(vec!["gemini-2.5-flash-image".to_string()]),
        ..GenSettings::default()
    };

    let project = studio
        .investigate("Dropshipping", settings, None)
        .await
        .expect("investigation");
    let branch_id = project.branches[0].id.clone();
    let target = ImageTarget::Visual {
        chapter: 2,
        visual: 0,
    };

    let project = studio
        .render_image(&project, &branch_id, target, None, true)
        .await
        .expect("render");

    let image_call = transport.calls().last().cloned().expect("image call");
    assert_eq!(image_call.model, "gemini-2.5-flash-image");
    assert_eq!(
        image_call.prompt,
        "Style: Charcoal sketch. Subject: Bar chart of losses, chapter 3. No text in image."
    );
    assert!(project.branches[0].book.image_url(target).is_some());
    assert_eq!(project.branches[0].book.placeholders().len(), 2 + 8 - 1);
}

#[tokio::test]
async fn test_edit_requires_an_existing_image() {
    let transport = dropshipping_transport();
    let studio = studio(&transport);

    let project = studio
        .investigate("Dropshipping", GenSettings::default(), None)
        .await
        .expect("investigation");
    let branch_id = project.branches[0].id.clone();
    let back = ImageTarget::Cover(CoverSide::Back);

    let err = studio
        .edit_image(&project, &branch_id, back, "add rain")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));

    let rendered = studio
        .render_image(&project, &branch_id, back, Some("A closed storefront"), false)
        .await
        .expect("render");
    let edited = studio
        .edit_image(&rendered, &branch_id, back, "add rain")
        .await
        .expect("edit");

    let edit_call = transport.calls().last().cloned().expect("edit call");
    assert!(edit_call.has_image);
    assert!(edit_call.prompt.contains("add rain"));
    assert!(edited.branches[0].book.image_url(back).is_some());
}

#[tokio::test]
async fn test_unknown_branch_is_not_found() {
    let transport = dropshipping_transport();
    let studio = studio(&transport);
    let project = studio
        .investigate("Dropshipping", GenSettings::default(), None)
        .await
        .expect("investigation");

    let err = studio
        .render_image(
            &project,
            "no-such-branch",
            ImageTarget::Cover(CoverSide::Front),
            None,
            false,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_project_export_round_trip() {
    let transport = dropshipping_transport();
    let project = studio(&transport)
        .investigate("Dropshipping", GenSettings::default(), None)
        .await
        .expect("investigation");

    let json = ProjectExport::new(project.clone()).to_json().expect("export");
    assert!(json.contains("\"schemaVersion\": 1"));

    let restored = ProjectExport::from_json(&json).expect("import");
    assert_eq!(restored.project, project);
}
