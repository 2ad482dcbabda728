use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use folio_domain::Profile;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/api/ask", post(ask))
		.route("/api/profile/init", post(init_profile))
		.route("/api/profile", get(get_profile).delete(delete_profile))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
	pub query: String,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
	pub answer: String,
}

async fn ask(
	State(state): State<AppState>,
	Json(payload): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
	let query = payload.query.trim().to_string();

	if query.is_empty() {
		return Err(json_error(
			StatusCode::BAD_REQUEST,
			"invalid_request",
			"Query is required.",
			None,
		));
	}

	match state.service.ask(&query).await {
		Ok(answer) => Ok(Json(AskResponse { answer })),
		Err(err) => {
			tracing::error!(%err, "Failed to answer a question.");

			Err(json_error(
				StatusCode::INTERNAL_SERVER_ERROR,
				"answer_failed",
				"Failed to answer the question.",
				None,
			))
		},
	}
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitProfileResponse {
	pub saved_at: String,
}

async fn init_profile(
	State(state): State<AppState>,
	Json(document): Json<Value>,
) -> Result<(StatusCode, Json<InitProfileResponse>), ApiError> {
	// The raw document is persisted verbatim; deserializing up front is the
	// schema check.
	if let Err(err) = serde_json::from_value::<Profile>(document.clone()) {
		return Err(json_error(
			StatusCode::BAD_REQUEST,
			"invalid_profile",
			format!("Profile document is invalid: {err}."),
			None,
		));
	}

	let saved_at = state.profiles.save_latest(&document, OffsetDateTime::now_utc())?;

	Ok((StatusCode::CREATED, Json(InitProfileResponse { saved_at })))
}

async fn get_profile(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
	Ok(Json(state.profiles.load_latest_raw()?))
}

#[derive(Debug, Serialize)]
pub struct DeleteProfileResponse {
	pub deleted: bool,
}

async fn delete_profile(
	State(state): State<AppState>,
) -> Result<Json<DeleteProfileResponse>, ApiError> {
	let deleted = state.profiles.delete_latest()?;

	Ok(Json(DeleteProfileResponse { deleted }))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError::new(status, code, message, fields)
}

impl From<folio_storage::Error> for ApiError {
	fn from(err: folio_storage::Error) -> Self {
		match err {
			folio_storage::Error::NotFound(_) => json_error(
				StatusCode::NOT_FOUND,
				"profile_not_found",
				"No profile has been saved yet.",
				None,
			),
			folio_storage::Error::InvalidArgument(message) => {
				json_error(StatusCode::BAD_REQUEST, "invalid_request", message, None)
			},
			err => {
				tracing::error!(%err, "Profile storage operation failed.");

				json_error(
					StatusCode::INTERNAL_SERVER_ERROR,
					"storage_error",
					"Storage operation failed.",
					None,
				)
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody {
			error_code: self.error_code,
			message: self.message,
			fields: self.fields,
		};
		(self.status, Json(body)).into_response()
	}
}
