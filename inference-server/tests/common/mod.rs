#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use fallwatch_core::{Classifier, FeatureVector, Label};
use fallwatch_server::{create_router, AppState, Config, ModelState};
use serde_json::Value;
use tower::ServiceExt;

/// Fall when the resultant magnitude exceeds 2 g
pub struct ImpactClassifier;

impl Classifier for ImpactClassifier {
    fn predict(&self, features: &FeatureVector) -> Label {
        if resultant(features) > 2.0 {
            Label::Fall
        } else {
            Label::Stable
        }
    }

    fn predict_probability(&self, features: &FeatureVector) -> Option<f64> {
        Some((resultant(features) / 4.0).min(1.0))
    }
}

/// Always stable, with no probability output
pub struct LabelOnlyClassifier;

impl Classifier for LabelOnlyClassifier {
    fn predict(&self, _features: &FeatureVector) -> Label {
        Label::Stable
    }
}

fn resultant(features: &FeatureVector) -> f64 {
    features.get_by_name("resultant").unwrap_or(0.0)
}

pub fn ready_state(classifier: impl Classifier + 'static, live_reading: bool) -> AppState {
    AppState::new(
        Config { live_reading, ..Config::default() },
        ModelState::ready(Arc::new(classifier)),
    )
}

pub fn degraded_state() -> AppState {
    AppState::new(Config::default(), ModelState::unavailable("model file not found"))
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

pub fn post_predict(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn app(state: &AppState) -> Router {
    create_router(state.clone())
}
