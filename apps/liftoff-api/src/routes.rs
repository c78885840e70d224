use axum::{
	Json, Router,
	extract::State,
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

use liftoff_domain::session::SessionStatus;
use liftoff_service::{Error as ServiceError, SessionView};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/search/start", post(start))
		.route("/v1/search/answer", post(answer))
		.route("/v1/search/status", post(status))
		.route("/v1/search/end", post(end))
		.with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct StartRequest {
	pub user_id: String,
	#[serde(default)]
	pub video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
	pub user_id: String,
	pub launched: bool,
}

#[derive(Debug, Deserialize)]
pub struct UserRequest {
	pub user_id: String,
}

/// [`SessionView`] on the wire. Images are base64 encoded.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
	pub user_id: String,
	pub video_id: String,
	pub status: SessionStatus,
	pub total_frames: u64,
	pub current_probe: Option<u64>,
	pub current_probe_image: Option<String>,
	pub step_count: u32,
	pub estimated_remaining_steps: Option<u32>,
	pub progress_percent: u8,
	pub result_frame: Option<u64>,
	pub result_timestamp: Option<f64>,
	pub result_image: Option<String>,
}
impl From<SessionView> for SessionResponse {
	fn from(view: SessionView) -> Self {
		Self {
			user_id: view.user_id,
			video_id: view.video_id,
			status: view.status,
			total_frames: view.total_frames,
			current_probe: view.current_probe,
			current_probe_image: view.current_probe_image.map(|bytes| STANDARD.encode(bytes)),
			step_count: view.step_count,
			estimated_remaining_steps: view.estimated_remaining_steps,
			progress_percent: view.progress_percent,
			result_frame: view.result_frame,
			result_timestamp: view.result_timestamp,
			result_image: view.result_image.map(|bytes| STANDARD.encode(bytes)),
		}
	}
}

#[derive(Debug, Serialize)]
pub struct EndResponse {
	pub user_id: String,
	pub ended: bool,
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn start(
	State(state): State<AppState>,
	Json(payload): Json<StartRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
	let view = state.service.start_search(&payload.user_id, payload.video_id.as_deref()).await?;

	Ok(Json(view.into()))
}

async fn answer(
	State(state): State<AppState>,
	Json(payload): Json<AnswerRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
	let view = state.service.submit_answer(&payload.user_id, payload.launched).await?;

	Ok(Json(view.into()))
}

async fn status(
	State(state): State<AppState>,
	Json(payload): Json<UserRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
	let view = state.service.get_status(&payload.user_id).await?;

	Ok(Json(view.into()))
}

async fn end(
	State(state): State<AppState>,
	Json(payload): Json<UserRequest>,
) -> Result<Json<EndResponse>, ApiError> {
	let ended = state.service.end_session(&payload.user_id).await?;

	Ok(Json(EndResponse { user_id: payload.user_id, ended }))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}
impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		let message = err.to_string();

		match err {
			ServiceError::InvalidRange { .. } => {
				json_error(StatusCode::UNPROCESSABLE_ENTITY, "invalid_range", message)
			},
			ServiceError::SourceUnavailable { .. } => {
				json_error(StatusCode::SERVICE_UNAVAILABLE, "source_unavailable", message)
			},
			ServiceError::NoActiveSession { .. } => {
				json_error(StatusCode::NOT_FOUND, "no_active_session", message)
			},
			ServiceError::ConcurrentModification { .. } => {
				json_error(StatusCode::CONFLICT, "concurrent_modification", message)
			},
			ServiceError::StepLimitExceeded { .. } => {
				json_error(StatusCode::UNPROCESSABLE_ENTITY, "step_limit_exceeded", message)
			},
			ServiceError::InvalidRequest { .. } => {
				json_error(StatusCode::BAD_REQUEST, "invalid_request", message)
			},
			ServiceError::InvalidConfig { .. } | ServiceError::Storage { .. } => {
				tracing::error!(error = %message, "Request failed.");

				json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal", "Internal error.")
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}

pub fn json_error(status: StatusCode, code: &str, message: impl Into<String>) -> ApiError {
	ApiError::new(status, code, message)
}
