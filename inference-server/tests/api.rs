mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::*;

#[tokio::test]
async fn test_predict_zero_reading() {
    let app = app(&ready_state(ImpactClassifier, true));

    let (status, body) = send(&app, post_predict(json!({"acc_x": 0, "acc_y": 0, "acc_z": 0}).to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction"], 0);
    assert_eq!(body["label"], "stable");
    assert_eq!(body["prob_fall"], 0.0);
}

#[tokio::test]
async fn test_predict_fall_label_matches_prediction() {
    let app = app(&ready_state(ImpactClassifier, true));

    let (status, body) = send(&app, post_predict(r#"{"acc_x": 3.0, "acc_y": -2.0, "acc_z": 1.5}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prediction"], 1);
    assert_eq!(body["label"], "fall");
    let p = body["prob_fall"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&p));
}

#[tokio::test]
async fn test_predict_without_probability_reports_null() {
    let app = app(&ready_state(LabelOnlyClassifier, true));

    let (status, body) = send(&app, post_predict(r#"{"acc_x": 1, "acc_y": 1, "acc_z": 1}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["label"], "stable");
    assert!(body["prob_fall"].is_null());
}

#[tokio::test]
async fn test_numeric_strings_are_accepted() {
    let app = app(&ready_state(ImpactClassifier, true));

    let (status, body) = send(&app, post_predict(r#"{"acc_x": "3", "acc_y": "4", "acc_z": "0"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["label"], "fall");
    assert_eq!(body["prob_fall"], 1.0);
}

#[tokio::test]
async fn test_empty_body_defaults_to_zero() {
    let state = ready_state(ImpactClassifier, true);
    let app = app(&state);

    for body in ["", "not json", "[1, 2, 3]", "{}"] {
        let (status, reply) = send(&app, post_predict(body)).await;
        assert_eq!(status, StatusCode::OK, "body {:?}", body);
        assert_eq!(reply["label"], "stable");
    }

    let snapshot = state.latest.as_ref().unwrap().get();
    assert_eq!((snapshot.acc_x, snapshot.acc_y, snapshot.acc_z), (0.0, 0.0, 0.0));
    assert_eq!(snapshot.label, "stable");
}

#[tokio::test]
async fn test_invalid_input_is_rejected_and_snapshot_kept() {
    let state = ready_state(ImpactClassifier, true);
    let app = app(&state);

    let (status, _) = send(&app, post_predict(r#"{"acc_x": 1, "acc_y": 2, "acc_z": 3}"#)).await;
    assert_eq!(status, StatusCode::OK);
    let before = state.latest.as_ref().unwrap().get();

    for bad in [
        r#"{"acc_x": "abc", "acc_y": 0, "acc_z": 0}"#,
        r#"{"acc_x": 0, "acc_y": null, "acc_z": 0}"#,
        r#"{"acc_x": 0, "acc_y": 0, "acc_z": true}"#,
    ] {
        let (status, body) = send(&app, post_predict(bad)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {}", bad);
        assert_eq!(body["error"], "Invalid input. Provide numeric acc_x, acc_y, acc_z.");
        assert_eq!(body["status"], 400);
    }

    assert_eq!(state.latest.as_ref().unwrap().get(), before);
}

#[tokio::test]
async fn test_overflowing_number_is_rejected_and_snapshot_kept() {
    let state = ready_state(ImpactClassifier, true);
    let app = app(&state);

    let (status, _) = send(&app, post_predict(r#"{"acc_x": 3, "acc_y": 4, "acc_z": 0}"#)).await;
    assert_eq!(status, StatusCode::OK);
    let before = state.latest.as_ref().unwrap().get();

    let (status, body) = send(&app, post_predict(r#"{"acc_x": 1e400, "acc_y": 4, "acc_z": 0}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert_eq!(state.latest.as_ref().unwrap().get(), before);
    assert_eq!(before.label, "fall");
}

#[tokio::test]
async fn test_unavailable_model_answers_500() {
    let state = degraded_state();
    let app = app(&state);

    // Model check runs before input validation
    for body in [r#"{"acc_x": 0, "acc_y": 0, "acc_z": 0}"#, r#"{"acc_x": "abc"}"#] {
        let (status, reply) = send(&app, post_predict(body)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(reply["error"], "Model not loaded on server.");
        assert_eq!(reply["status"], 500);
    }

    let (status, latest) = send(&app, get("/latest")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(latest["label"], "waiting...");

    let response = tower::ServiceExt::oneshot(app.clone(), get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_latest_reflects_last_prediction() {
    let app = app(&ready_state(ImpactClassifier, true));

    let (status, initial) = send(&app, get("/latest")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(initial, json!({"acc_x": 0.0, "acc_y": 0.0, "acc_z": 0.0, "label": "waiting...", "prob_fall": null}));

    send(&app, post_predict(r#"{"acc_x": 0.1, "acc_y": 0.2, "acc_z": 0.9}"#)).await;
    send(&app, post_predict(r#"{"acc_x": 3, "acc_y": 4, "acc_z": 0}"#)).await;

    let (_, latest) = send(&app, get("/latest")).await;
    assert_eq!(latest, json!({"acc_x": 3.0, "acc_y": 4.0, "acc_z": 0.0, "label": "fall", "prob_fall": 1.0}));
}

#[tokio::test]
async fn test_latest_absent_without_live_reading() {
    let state = ready_state(ImpactClassifier, false);
    let app = app(&state);

    let (status, body) = send(&app, get("/latest")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
    assert_eq!(body["error"], "Live reading is disabled");

    let (status, body) = send(&app, post_predict(r#"{"acc_x": 3, "acc_y": 4, "acc_z": 0}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["label"], "fall");
    assert!(state.latest.is_none());
}

#[tokio::test]
async fn test_dashboard_is_served() {
    let app = app(&ready_state(ImpactClassifier, true));

    let response = tower::ServiceExt::oneshot(app, get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("/latest"));
}

#[tokio::test]
async fn test_health_reports_model_status() {
    let (status, ready) = send(&app(&ready_state(ImpactClassifier, true)), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ready["status"], "healthy");
    assert_eq!(ready["model_loaded"], true);
    assert_eq!(ready["live_reading"], true);

    let (status, degraded) = send(&app(&degraded_state()), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(degraded["status"], "degraded");
    assert_eq!(degraded["model_loaded"], false);
    assert!(degraded["model_sha256"].is_null());
}
