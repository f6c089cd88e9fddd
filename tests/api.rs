mod common;

use std::sync::Arc;

use common::{fixed, image_part, multipart_body, multipart_content_type, state_with, FilePart, FAKE_JPEG};
use rstest::rstest;
use serde_json::Value;
use tunitales::{routes, AppState, Monument, RecognitionOutcome, RecognitionResult};
use warp::http::StatusCode;

async fn get(state: &Arc<AppState>, path: &str) -> (StatusCode, Value) {
    let resp = warp::test::request()
    .method("GET")
    .path(path)
    .reply(&routes(state.clone()))
    .await;
    let body = serde_json::from_slice(resp.body()).unwrap_or(Value::Null);
    (resp.status(), body)
}

async fn post_recognize(state: &Arc<AppState>, body: Vec<u8>) -> (StatusCode, Value) {
    let resp = warp::test::request()
    .method("POST")
    .path("/recognize")
    .header("content-type", multipart_content_type())
    .body(body)
    .reply(&routes(state.clone()))
    .await;
    let body = serde_json::from_slice(resp.body()).unwrap_or(Value::Null);
    (resp.status(), body)
}

#[tokio::test]
async fn lists_the_seeded_catalogue() {
    let (state, _dir) = state_with(fixed("el_jem", 90.0));
    let (status, body) = get(&state, "/monuments").await;
    assert_eq!(status, StatusCode::OK);

    let monuments: Vec<Monument> = serde_json::from_value(body).expect("monument list");
    assert_eq!(monuments.len(), 8);
    let ids: Vec<u64> = monuments.iter().map(|m| m.id).collect();
    assert_eq!(ids, (1..=8).collect::<Vec<_>>());
}

#[tokio::test]
async fn monument_json_uses_camel_case() {
    let (state, _dir) = state_with(fixed("el_jem", 90.0));
    let (status, body) = get(&state, "/monuments/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "El Djem Amphitheater");
    assert!(body["imageUrl"].is_string());
    assert!(body["details"]["visitorInfo"]["openingHours"].is_string());
    assert!(body["coordinates"]["lat"].is_number());
}

#[rstest]
#[case("/monuments/999", StatusCode::NOT_FOUND, "Monument not found")]
#[case("/monuments/abc", StatusCode::BAD_REQUEST, "Invalid monument ID")]
#[case("/monuments/-1", StatusCode::NOT_FOUND, "Monument not found")]
#[case("/monuments/0", StatusCode::NOT_FOUND, "Monument not found")]
#[case("/monuments/1.5", StatusCode::BAD_REQUEST, "Invalid monument ID")]
#[case("/monuments/category", StatusCode::BAD_REQUEST, "Invalid monument ID")]
#[case("/recognition-results/-1", StatusCode::NOT_FOUND, "Recognition result not found")]
#[case("/recognition-results/42", StatusCode::NOT_FOUND, "Recognition result not found")]
#[case("/recognition-results/x", StatusCode::BAD_REQUEST, "Invalid recognition result ID")]
#[tokio::test]
async fn lookups_report_errors_as_json(
    #[case] path: &str,
    #[case] status: StatusCode,
    #[case] message: &str,
) {
    let (state, _dir) = state_with(fixed("el_jem", 90.0));
    let (got, body) = get(&state, path).await;
    assert_eq!(got, status);
    assert_eq!(body["message"], message);
}

#[rstest]
#[case("Roman%20Era", vec![1])]
#[case("Islamic%20Architecture", vec![3, 7, 8])]
#[case("All%20Monuments", (1..=8).collect())]
#[case("Space%20Station", vec![])]
#[case("roman%20era", vec![])]
#[tokio::test]
async fn filters_by_category(#[case] segment: &str, #[case] expected: Vec<u64>) {
    let (state, _dir) = state_with(fixed("el_jem", 90.0));
    let (status, body) = get(&state, &format!("/monuments/category/{}", segment)).await;
    assert_eq!(status, StatusCode::OK);

    let monuments: Vec<Monument> = serde_json::from_value(body).expect("monument list");
    let ids: Vec<u64> = monuments.iter().map(|m| m.id).collect();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn health_reports_ok() {
    let (state, _dir) = state_with(fixed("el_jem", 90.0));
    let (status, body) = get(&state, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "status": "ok" }));
}

#[tokio::test]
async fn unknown_routes_are_json_404s() {
    let (state, _dir) = state_with(fixed("el_jem", 90.0));
    let (status, body) = get(&state, "/api/nothing-here").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn recognize_runs_the_full_workflow() {
    let (state, dir) = state_with(fixed("el_jem", 93.5));
    let (status, body) = post_recognize(&state, multipart_body(&[image_part(FAKE_JPEG)])).await;
    assert_eq!(status, StatusCode::OK, "body: {}", body);

    let outcome: RecognitionOutcome = serde_json::from_value(body).expect("outcome");
    assert_eq!(outcome.monument.id, 1);
    assert_eq!(outcome.recognition.monument_id, outcome.monument.id);
    assert_eq!(outcome.recognition.confidence, "93.5%");
    assert!(outcome.recognition.image_url.starts_with("/uploads/"));
    assert!(outcome.recognition.image_url.ends_with(".jpg"));

    let filename = outcome.recognition.image_url.trim_start_matches("/uploads/");
    let saved = std::fs::read(dir.path().join(filename)).expect("upload on disk");
    assert_eq!(saved, FAKE_JPEG);

    let images = state.store.get_user_images();
    assert_eq!(images.len(), 1);
    assert!(images[0].processed);
    assert_eq!(images[0].image_url, outcome.recognition.image_url);

    let (status, body) = get(&state, "/recognition-results").await;
    assert_eq!(status, StatusCode::OK);
    let results: Vec<RecognitionResult> = serde_json::from_value(body).expect("results");
    assert_eq!(results, vec![outcome.recognition.clone()]);

    let (status, body) = get(&state, &format!("/recognition-results/{}", outcome.recognition.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["monumentId"], 1);

    let resp = warp::test::request()
    .method("GET")
    .path(&outcome.recognition.image_url)
    .reply(&routes(state.clone()))
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.body().as_ref(), FAKE_JPEG);
}

#[tokio::test]
async fn recognize_without_image_part_touches_nothing() {
    let (state, dir) = state_with(fixed("el_jem", 93.5));
    let body = multipart_body(&[FilePart {
        name: "caption",
        filename: None,
        content_type: None,
        bytes: b"sunset at el djem",
    }]);

    let (status, body) = post_recognize(&state, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No image file provided");
    assert!(state.store.get_user_images().is_empty());
    assert!(state.store.get_recognition_results().is_empty());
    assert_eq!(std::fs::read_dir(dir.path()).expect("dir").count(), 0);
}

#[tokio::test]
async fn recognize_rejects_non_image_uploads() {
    let (state, _dir) = state_with(fixed("el_jem", 93.5));
    let body = multipart_body(&[FilePart {
        name: "image",
        filename: Some("notes.txt"),
        content_type: Some("text/plain"),
        bytes: b"not a photo",
    }]);

    let (status, body) = post_recognize(&state, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Only image files are allowed");
    assert!(state.store.get_user_images().is_empty());
}

#[tokio::test]
async fn recognize_rejects_oversized_bodies() {
    let (state, _dir) = state_with(fixed("el_jem", 93.5));
    let state = Arc::new(
        Arc::try_unwrap(state)
        .ok()
        .expect("sole owner")
        .with_max_upload_bytes(64),
    );
    let big = vec![0xAB; 1024];

    let (status, _) = post_recognize(&state, multipart_body(&[image_part(&big)])).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(state.store.get_user_images().is_empty());
}

#[tokio::test]
async fn uncatalogued_label_leaves_image_unprocessed() {
    let (state, _dir) = state_with(fixed("synagogue_ghriba", 88.0));
    let (status, body) = post_recognize(&state, multipart_body(&[image_part(FAKE_JPEG)])).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap_or_default().contains("synagogue_ghriba"));

    let images = state.store.get_user_images();
    assert_eq!(images.len(), 1);
    assert!(!images[0].processed);
    assert!(state.store.get_recognition_results().is_empty());
}

#[tokio::test]
async fn ids_keep_counting_across_recognitions() {
    let (state, _dir) = state_with(fixed("okba_mosque", 81.25));
    for expected in 1..=3u64 {
        let (status, body) = post_recognize(&state, multipart_body(&[image_part(FAKE_JPEG)])).await;
        assert_eq!(status, StatusCode::OK);
        let outcome: RecognitionOutcome = serde_json::from_value(body).expect("outcome");
        assert_eq!(outcome.recognition.id, expected);
        assert_eq!(outcome.monument.name, "Great Mosque of Kairouan");
        assert_eq!(outcome.recognition.confidence, "81.25%");
    }
    assert_eq!(state.store.get_user_images().len(), 3);
}
