use axum::{
	extract::{rejection::JsonRejection, State},
	response::IntoResponse,
	Json,
};
use chrono::{DateTime, Utc};
use hyper::StatusCode;
use serde_json::{json, Value};
use tower_sessions::Session;

use crate::{
	auth::{self, CurrentUser},
	error::{ApiError, FieldError},
	AppState,
};

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
	#[default]
	NotUploaded,
	PendingVerification,
	Verified,
	Rejected,
}

#[derive(serde::Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
	pub id: u32,
	pub username: String,
	#[serde(skip_serializing)]
	pub password: String,
	pub full_name: String,
	pub email: String,
	pub phone: Option<String>,
	pub document_status: DocumentStatus,
	pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
	pub username: String,
	pub password: String,
	pub full_name: String,
	pub email: String,
	pub phone: Option<String>,
}

impl User {
	/// Fresh accounts never start with documents on file.
	pub fn from_new(id: u32, user: NewUser, created_at: DateTime<Utc>) -> Self {
		User {
			id,
			username: user.username,
			password: user.password,
			full_name: user.full_name,
			email: user.email,
			phone: user.phone,
			document_status: DocumentStatus::NotUploaded,
			created_at,
		}
	}
}

#[derive(serde::Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PublicUser {
	pub id: u32,
	pub username: String,
}

impl From<&User> for PublicUser {
	fn from(user: &User) -> Self {
		PublicUser {
			id: user.id,
			username: user.username.clone(),
		}
	}
}

/// Everything about a user except the password.
#[derive(serde::Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
	pub id: u32,
	pub username: String,
	pub full_name: String,
	pub email: String,
	pub phone: Option<String>,
	pub document_status: DocumentStatus,
	pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
	fn from(user: User) -> Self {
		UserProfile {
			id: user.id,
			username: user.username,
			full_name: user.full_name,
			email: user.email,
			phone: user.phone,
			document_status: user.document_status,
			created_at: user.created_at,
		}
	}
}

#[derive(serde::Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
	username: Option<String>,
	password: Option<String>,
	full_name: Option<String>,
	email: Option<String>,
	phone: Option<String>,
}

fn required(field: &str, value: Option<String>, errors: &mut Vec<FieldError>) -> String {
	match value {
		Some(v) if !v.trim().is_empty() => v,
		_ => {
			errors.push(FieldError::new(field, "Required"));
			String::new()
		}
	}
}

impl RegisterRequest {
	pub fn validate(self) -> Result<NewUser, ApiError> {
		let mut errors = Vec::new();
		let user = NewUser {
			username: required("username", self.username, &mut errors),
			password: required("password", self.password, &mut errors),
			full_name: required("fullName", self.full_name, &mut errors),
			email: required("email", self.email, &mut errors),
			phone: self.phone.filter(|p| !p.trim().is_empty()),
		};
		if errors.is_empty() {
			Ok(user)
		} else {
			Err(ApiError::Validation(errors))
		}
	}
}

#[derive(serde::Deserialize, Debug, Default)]
pub struct Logins {
	username: Option<String>,
	password: Option<String>,
}

fn bad_json(rejection: JsonRejection) -> ApiError {
	ApiError::BadRequest(rejection.body_text())
}

/// POST /api/register
pub async fn register(
	State(state): State<AppState>,
	session: Session,
	payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
	let Json(request) = payload.map_err(bad_json)?;
	let user = request.validate()?;
	let user = auth::register(state.store.as_ref(), &session, state.config.session_ttl(), user).await?;
	Ok((StatusCode::CREATED, Json(user)))
}

/// POST /api/login
pub async fn login(
	State(state): State<AppState>,
	session: Session,
	payload: Result<Json<Logins>, JsonRejection>,
) -> Result<Json<PublicUser>, ApiError> {
	let Json(logins) = payload.map_err(bad_json)?;
	let (Some(username), Some(password)) = (
		logins.username.filter(|u| !u.is_empty()),
		logins.password.filter(|p| !p.is_empty()),
	) else {
		return Err(ApiError::BadRequest("Username and password are required".to_string()));
	};
	auth::login(state.store.as_ref(), &session, state.config.session_ttl(), &username, &password)
		.await
		.map(Json)
}

/// POST /api/logout
pub async fn logout(session: Session) -> Result<Json<Value>, ApiError> {
	auth::logout(&session).await?;
	Ok(Json(json!({ "message": "Logout successful" })))
}

/// GET /api/me
pub async fn me(State(state): State<AppState>, session: Session) -> Result<Json<UserProfile>, ApiError> {
	auth::current_user(state.store.as_ref(), &session).await.map(Json)
}

/// POST /api/user/document
///
/// The upload itself is simulated: the body is ignored and the user's
/// documents move to pending verification.
pub async fn upload_document(State(state): State<AppState>, user: CurrentUser) -> Result<Json<Value>, ApiError> {
	let updated = state
		.store
		.update_user_document_status(user.id, DocumentStatus::PendingVerification)
		.await
		.ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
	log::info!("user {} submitted documents", user.id);
	Ok(Json(json!({
		"message": "Document uploaded successfully",
		"status": updated.document_status,
	})))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn register_request_lists_every_missing_field() {
		let err = RegisterRequest {
			username: Some("alice".into()),
			email: Some("  ".into()),
			..Default::default()
		}
		.validate()
		.unwrap_err();
		let ApiError::Validation(errors) = err else {
			panic!("expected validation error");
		};
		let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
		assert_eq!(fields, vec!["password", "fullName", "email"]);
	}

	#[test]
	fn register_request_drops_blank_phone() {
		let user = RegisterRequest {
			username: Some("alice".into()),
			password: Some("pw".into()),
			full_name: Some("Alice".into()),
			email: Some("alice@example.com".into()),
			phone: Some("".into()),
		}
		.validate()
		.unwrap();
		assert_eq!(user.phone, None);
	}

	#[test]
	fn document_status_wire_names() {
		assert_eq!(
			serde_json::to_string(&DocumentStatus::PendingVerification).unwrap(),
			"\"pending_verification\""
		);
		assert_eq!(DocumentStatus::default(), DocumentStatus::NotUploaded);
	}

	#[test]
	fn user_json_never_contains_password() {
		let user = User::from_new(
			1,
			NewUser {
				username: "alice".into(),
				password: "hunter2".into(),
				full_name: "Alice".into(),
				email: "alice@example.com".into(),
				phone: None,
			},
			Utc::now(),
		);
		let json = serde_json::to_value(&user).unwrap();
		assert!(json.get("password").is_none());
		assert_eq!(json["documentStatus"], "not_uploaded");
		assert_eq!(json["fullName"], "Alice");
	}
}
