//! Image waterfall tests
//!
//! Models are tried strictly in hierarchy order with one attempt each; the
//! first image wins and exhaustion surfaces as `AllModelsFailed`.

mod common;

use common::mocks::{api_error, image, text, CallKind, ScriptedTransport};
use yit::llm::{ImageApi, ImageModel};
use yit::media::ImageService;
use yit::types::AppError;
use yit::{ImageModelCatalog, RetryPolicy};

fn model(id: &str) -> ImageModel {
    ImageModel::new(id).with_edit()
}

fn service(transport: &std::sync::Arc<ScriptedTransport>) -> ImageService {
    ImageService::new(
        transport.client(RetryPolicy::no_retries()),
        ImageModelCatalog::default(),
    )
}

#[tokio::test]
async fn test_generation_falls_through_in_order() {
    let transport = ScriptedTransport::new(|call| match call.model.as_str() {
        "model-a" => Err(api_error(503, "UNAVAILABLE")),
        "model-b" => text("I cannot draw that."),
        _ => image("image/png", "QUJD"),
    });

    let uri = service(&transport)
        .generate_image(
            "a rented warehouse",
            Some("Noir"),
            false,
            &[model("model-a"), model("model-b"), model("model-c")],
        )
        .await
        .expect("third model answers");

    assert_eq!(uri, "data:image/png;base64,QUJD");
    assert_eq!(
        transport.models_called(),
        vec!["model-a", "model-b", "model-c"]
    );
    assert!(transport.calls()[0]
        .prompt
        .starts_with("Style: Noir. Subject: a rented warehouse."));
}

#[tokio::test]
async fn test_generation_stops_at_first_success() {
    let transport = ScriptedTransport::new(|_| image("image/jpeg", "QUJD"));

    service(&transport)
        .generate_image("x", None, false, &[model("model-a"), model("model-b")])
        .await
        .expect("image");

    assert_eq!(transport.models_called(), vec!["model-a"]);
}

#[tokio::test]
async fn test_generation_exhaustion() {
    let transport = ScriptedTransport::new(|_| Err(api_error(500, "INTERNAL")));

    let err = service(&transport)
        .generate_image("x", None, true, &[model("model-a"), model("model-b")])
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::AllModelsFailed(_)));
    assert!(err.to_string().contains("model-a"));
    assert!(err.to_string().contains("model-b"));
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test]
async fn test_predict_models_use_the_predict_endpoint() {
    let transport = ScriptedTransport::new(|call| match call.kind {
        CallKind::Predict => image("image/jpeg", "SU1H"),
        CallKind::Generate => Err(api_error(503, "UNAVAILABLE")),
    });

    let uri = service(&transport)
        .generate_image(
            "x",
            None,
            false,
            &[
                ImageModel::new("gen-model"),
                ImageModel::new("imagen-x").with_api(ImageApi::Predict),
            ],
        )
        .await
        .expect("predict answers");

    assert_eq!(uri, "data:image/jpeg;base64,SU1H");
    let kinds: Vec<CallKind> = transport.calls().iter().map(|c| c.kind).collect();
    assert_eq!(kinds, vec![CallKind::Generate, CallKind::Predict]);
}

#[tokio::test]
async fn test_default_hierarchy_when_empty() {
    let transport = ScriptedTransport::new(|_| Err(api_error(503, "UNAVAILABLE")));

    let _ = service(&transport).generate_image("x", None, false, &[]).await;

    assert_eq!(
        transport.models_called(),
        vec![
            "gemini-3-pro-image-preview",
            "gemini-2.5-flash-image",
            "imagen-3.0-generate-001"
        ]
    );
}

#[tokio::test]
async fn test_edit_falls_through_in_order() {
    let transport = ScriptedTransport::new(|call| match call.model.as_str() {
        "model-c" => image("image/png", "RURJVA=="),
        _ => Err(api_error(429, "RESOURCE_EXHAUSTED")),
    });

    let uri = service(&transport)
        .edit_image(
            "data:image/png;base64,QUJD",
            "add a sold-out sign",
            &[model("model-a"), model("model-b"), model("model-c")],
        )
        .await
        .expect("third model edits");

    assert_eq!(uri, "data:image/png;base64,RURJVA==");
    assert_eq!(
        transport.models_called(),
        vec!["model-a", "model-b", "model-c"]
    );
    assert!(transport.calls().iter().all(|c| c.has_image));
}

#[tokio::test]
async fn test_edit_exhaustion() {
    let transport = ScriptedTransport::new(|_| text("no image for you"));

    let err = service(&transport)
        .edit_image("QUJD", "brighter", &[model("model-a"), model("model-b")])
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::AllModelsFailed(_)));
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test]
async fn test_edit_skips_generate_only_models() {
    let transport = ScriptedTransport::new(|_| image("image/png", "QUJD"));

    service(&transport)
        .edit_image(
            "QUJD",
            "brighter",
            &[ImageModel::new("generate-only"), model("editor")],
        )
        .await
        .expect("edit");

    assert_eq!(transport.models_called(), vec!["editor"]);
}

#[tokio::test]
async fn test_edit_uses_fallback_without_edit_capable_models() {
    let transport = ScriptedTransport::new(|_| image("image/png", "QUJD"));

    service(&transport)
        .edit_image(
            "QUJD",
            "brighter",
            &[ImageModel::new("imagen-x").with_api(ImageApi::Predict)],
        )
        .await
        .expect("edit");

    assert_eq!(transport.models_called(), vec!["gemini-2.5-flash-image"]);
}
