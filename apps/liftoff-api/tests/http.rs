use std::sync::Arc;

use axum::{
	Router,
	body::{self, Body},
	http::{Request, StatusCode},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_json::{Value, json};
use tower::util::ServiceExt;

use liftoff_api::{routes, state::AppState};
use liftoff_service::LiftoffService;
use liftoff_storage::MemoryStore;
use liftoff_testkit::{FakeFrameSource, Fault, fake_image, test_config};

fn app(source: Arc<FakeFrameSource>) -> Router {
	let service =
		LiftoffService::with_parts(test_config(), Arc::new(MemoryStore::new()), source);

	routes::router(AppState::with_service(Arc::new(service)))
}

fn source() -> Arc<FakeFrameSource> {
	Arc::new(FakeFrameSource::new().with_video("eight", 8, Some(2.0)))
}

async fn post(app: &Router, uri: &str, payload: Value) -> (StatusCode, Value) {
	let response = app
		.clone()
		.oneshot(
			Request::builder()
				.method("POST")
				.uri(uri)
				.header("content-type", "application/json")
				.body(Body::from(payload.to_string()))
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call route.");
	let status = response.status();
	let body = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");
	let json: Value = serde_json::from_slice(&body).expect("Failed to parse response.");

	(status, json)
}

fn decode(image: &Value) -> Vec<u8> {
	STANDARD.decode(image.as_str().expect("Image must be a string.")).expect("Invalid base64.")
}

#[tokio::test]
async fn health_ok() {
	let response = app(source())
		.oneshot(Request::builder().uri("/health").body(Body::empty()).expect("Failed to build request."))
		.await
		.expect("Failed to call /health.");

	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn search_round_trip_over_http() {
	let app = app(source());
	let (status, json) =
		post(&app, "/v1/search/start", json!({ "user_id": "alice", "video_id": "eight" })).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["status"], "in_progress");
	assert_eq!(json["current_probe"], 3);
	assert_eq!(json["estimated_remaining_steps"], 3);
	assert_eq!(decode(&json["current_probe_image"]), fake_image("eight", 3));

	for launched in [false, true] {
		let (status, _) =
			post(&app, "/v1/search/answer", json!({ "user_id": "alice", "launched": launched }))
				.await;

		assert_eq!(status, StatusCode::OK);
	}

	let (status, json) = post(&app, "/v1/search/status", json!({ "user_id": "alice" })).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["current_probe"], 4);
	assert_eq!(json["step_count"], 2);
	assert!(json["current_probe_image"].is_null());

	let (_, json) =
		post(&app, "/v1/search/answer", json!({ "user_id": "alice", "launched": true })).await;

	assert_eq!(json["status"], "found");
	assert_eq!(json["result_frame"], 4);
	assert_eq!(json["result_timestamp"], 2.0);
	assert_eq!(decode(&json["result_image"]), fake_image("eight", 4));

	let (status, json) = post(&app, "/v1/search/end", json!({ "user_id": "alice" })).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["ended"], true);

	let (_, json) = post(&app, "/v1/search/end", json!({ "user_id": "alice" })).await;

	assert_eq!(json["ended"], false);
}

#[tokio::test]
async fn missing_session_is_not_found() {
	let app = app(source());
	let (status, json) =
		post(&app, "/v1/search/answer", json!({ "user_id": "bob", "launched": true })).await;

	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(json["error_code"], "no_active_session");
}

#[tokio::test]
async fn source_failure_is_service_unavailable() {
	let source = source();
	let app = app(source.clone());

	source.fail_next_info(Fault::Fail("metadata down".to_string()));

	let (status, json) =
		post(&app, "/v1/search/start", json!({ "user_id": "alice", "video_id": "eight" })).await;

	assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
	assert_eq!(json["error_code"], "source_unavailable");
}

#[tokio::test]
async fn blank_user_is_a_bad_request() {
	let app = app(source());
	let (status, json) = post(&app, "/v1/search/status", json!({ "user_id": " " })).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json["error_code"], "invalid_request");
}
