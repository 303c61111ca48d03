use axum::{
	extract::rejection::QueryRejection,
	response::{IntoResponse, Response},
	Json,
};
use hyper::StatusCode;
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

#[derive(serde::Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
	pub field: String,
	pub message: String,
}

impl FieldError {
	pub fn new(field: &str, message: &str) -> Self {
		FieldError {
			field: field.to_owned(),
			message: message.to_owned(),
		}
	}
}

#[derive(Error, Debug)]
pub enum ApiError {
	#[error("Invalid data")]
	Validation(Vec<FieldError>),

	#[error("{0}")]
	BadRequest(String),

	#[error("Not authenticated")]
	NotAuthenticated,

	#[error("Invalid credentials")]
	InvalidCredentials,

	#[error("{0}")]
	NotFound(String),

	#[error("{0}")]
	Conflict(String),

	#[error("{0}")]
	Internal(String),
}

impl ApiError {
	pub fn status(&self) -> StatusCode {
		match self {
			ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
			ApiError::NotAuthenticated | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
			ApiError::NotFound(_) => StatusCode::NOT_FOUND,
			// duplicates and unavailable cars are reported as plain bad requests
			ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
			ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl From<StoreError> for ApiError {
	fn from(e: StoreError) -> Self {
		match e {
			StoreError::UsernameTaken(_) => ApiError::Conflict("Username already taken".to_string()),
			StoreError::EmailInUse(_) => ApiError::Conflict("Email already in use".to_string()),
			StoreError::UserNotFound(_) => ApiError::NotFound("User not found".to_string()),
			StoreError::CarNotFound(_) => ApiError::NotFound("Car not found".to_string()),
			StoreError::CarUnavailable(_) => ApiError::Conflict("Car is not available for booking".to_string()),
		}
	}
}

impl From<QueryRejection> for ApiError {
	fn from(rejection: QueryRejection) -> Self {
		ApiError::BadRequest(rejection.body_text())
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let status = self.status();
		let body = match self {
			ApiError::Validation(errors) => json!({ "message": "Invalid data", "errors": errors }),
			ApiError::Internal(detail) => {
				log::error!("internal error: {}", detail);
				json!({ "message": "Internal server error" })
			}
			other => json!({ "message": other.to_string() }),
		};
		(status, Json(body)).into_response()
	}
}
