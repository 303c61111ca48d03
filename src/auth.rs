use axum::{extract::FromRequestParts, http::request::Parts};
use time::{Duration, OffsetDateTime};
use tower_sessions::{cookie::SameSite, session, Expiry, MemoryStore, Session, SessionManagerLayer};

use crate::{
	config::Config,
	error::ApiError,
	store::Storage,
	users::{NewUser, PublicUser, UserProfile},
	AppState,
};

pub const SESSION_USER_ID_KEY: &str = "user_id";

/// Cookie sessions backed by process memory. The cookie only carries the
/// session id; the user binding stays on the server.
pub fn session_layer(config: &Config) -> SessionManagerLayer<MemoryStore> {
	SessionManagerLayer::new(MemoryStore::default())
		.with_name(config.session_cookie.clone())
		.with_secure(config.secure_cookies)
		.with_http_only(true)
		.with_same_site(SameSite::Lax)
}

fn session_error(e: session::Error) -> ApiError {
	ApiError::Internal(format!("session store: {}", e))
}

/// Binds `session` to `user_id` under a fresh session id. The binding lapses
/// `ttl` from now however active the session is.
pub async fn establish(session: &Session, user_id: u32, ttl: Duration) -> Result<(), ApiError> {
	session.cycle_id().await.map_err(session_error)?;
	session.insert(SESSION_USER_ID_KEY, user_id).await.map_err(session_error)?;
	session.set_expiry(Some(Expiry::AtDateTime(OffsetDateTime::now_utc() + ttl)));
	Ok(())
}

pub async fn login(
	store: &dyn Storage,
	session: &Session,
	ttl: Duration,
	username: &str,
	password: &str,
) -> Result<PublicUser, ApiError> {
	let user = match store.get_user_by_username(username).await {
		Some(user) if user.password == password => user,
		_ => {
			log::warn!("rejected login for {}", username);
			return Err(ApiError::InvalidCredentials);
		}
	};
	establish(session, user.id, ttl).await?;
	log::info!("user {} logged in", user.id);
	Ok(PublicUser::from(&user))
}

pub async fn register(store: &dyn Storage, session: &Session, ttl: Duration, user: NewUser) -> Result<PublicUser, ApiError> {
	let user = store.register_user(user).await?;
	establish(session, user.id, ttl).await?;
	log::info!("registered user {} ({})", user.id, user.username);
	Ok(PublicUser::from(&user))
}

/// Drops the session and its binding. Fine to call without one.
pub async fn logout(session: &Session) -> Result<(), ApiError> {
	session.flush().await.map_err(session_error)
}

pub async fn require_auth(session: &Session) -> Result<u32, ApiError> {
	session
		.get::<u32>(SESSION_USER_ID_KEY)
		.await
		.map_err(session_error)?
		.ok_or(ApiError::NotAuthenticated)
}

pub async fn current_user(store: &dyn Storage, session: &Session) -> Result<UserProfile, ApiError> {
	let user_id = require_auth(session).await?;
	store
		.get_user(user_id)
		.await
		.map(UserProfile::from)
		.ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}

/// The authenticated caller. Extraction fails with 401 before the handler
/// runs when there is no valid session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
	pub id: u32,
}

impl FromRequestParts<AppState> for CurrentUser {
	type Rejection = ApiError;

	async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
		let session = Session::from_request_parts(parts, state)
			.await
			.map_err(|(_, msg)| ApiError::Internal(msg.to_string()))?;
		let id = require_auth(&session).await?;
		Ok(CurrentUser { id })
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use tower_sessions::session::Id;

	use super::*;
	use crate::{store::MemStorage, users::DocumentStatus};

	fn alice() -> NewUser {
		NewUser {
			username: "alice".into(),
			password: "Secret1".into(),
			full_name: "Alice Liddell".into(),
			email: "alice@example.com".into(),
			phone: Some("555-0100".into()),
		}
	}

	fn day() -> Duration {
		Duration::hours(24)
	}

	// A request arriving with the given session cookie, or none.
	fn request(sessions: &Arc<MemoryStore>, id: Option<Id>) -> Session {
		Session::new(id, sessions.clone(), None)
	}

	#[tokio::test]
	async fn register_then_login() {
		let store = MemStorage::new();
		let sessions = Arc::new(MemoryStore::default());

		let session = request(&sessions, None);
		let user = register(&store, &session, day(), alice()).await.unwrap();
		assert_eq!(user, PublicUser { id: 1, username: "alice".into() });
		session.save().await.unwrap();
		let first = session.id();
		assert!(first.is_some());

		let session = request(&sessions, first);
		assert_eq!(require_auth(&session).await.unwrap(), 1);

		let user = login(&store, &session, day(), "alice", "Secret1").await.unwrap();
		assert_eq!(user.id, 1);
		session.save().await.unwrap();
		assert_ne!(session.id(), first);

		// logging in again retires the old id
		assert!(require_auth(&request(&sessions, first)).await.is_err());
		assert_eq!(require_auth(&request(&sessions, session.id())).await.unwrap(), 1);
	}

	#[tokio::test]
	async fn wrong_password_creates_no_session() {
		let store = MemStorage::new();
		let sessions = Arc::new(MemoryStore::default());
		register(&store, &request(&sessions, None), day(), alice()).await.unwrap();

		let session = request(&sessions, None);
		let err = login(&store, &session, day(), "alice", "secret1").await.unwrap_err();
		assert!(matches!(err, ApiError::InvalidCredentials));
		let err = login(&store, &session, day(), "nobody", "Secret1").await.unwrap_err();
		assert!(matches!(err, ApiError::InvalidCredentials));
		assert!(!session.is_modified());
		assert!(session.is_empty().await);
	}

	#[tokio::test]
	async fn duplicate_registration_is_rejected() {
		let store = MemStorage::new();
		let sessions = Arc::new(MemoryStore::default());
		register(&store, &request(&sessions, None), day(), alice()).await.unwrap();

		let session = request(&sessions, None);
		let err = register(&store, &session, day(), alice()).await.unwrap_err();
		assert_eq!(err.to_string(), "Username already taken");
		let err = register(
			&store,
			&session,
			day(),
			NewUser {
				username: "alice2".into(),
				..alice()
			},
		)
		.await
		.unwrap_err();
		assert_eq!(err.to_string(), "Email already in use");
		assert!(!session.is_modified());
	}

	#[tokio::test]
	async fn current_user_without_session() {
		let store = MemStorage::new();
		let sessions = Arc::new(MemoryStore::default());
		let err = current_user(&store, &request(&sessions, None)).await.unwrap_err();
		assert!(matches!(err, ApiError::NotAuthenticated));
		let err = current_user(&store, &request(&sessions, Some(Id(42)))).await.unwrap_err();
		assert!(matches!(err, ApiError::NotAuthenticated));
	}

	#[tokio::test]
	async fn current_user_hides_password() {
		let store = MemStorage::new();
		let sessions = Arc::new(MemoryStore::default());
		let session = request(&sessions, None);
		register(&store, &session, day(), alice()).await.unwrap();
		let profile = current_user(&store, &session).await.unwrap();
		assert_eq!(profile.full_name, "Alice Liddell");
		assert_eq!(profile.document_status, DocumentStatus::NotUploaded);
		let json = serde_json::to_value(&profile).unwrap();
		assert!(json.get("password").is_none());
	}

	#[tokio::test]
	async fn logout_is_idempotent() {
		let store = MemStorage::new();
		let sessions = Arc::new(MemoryStore::default());
		let session = request(&sessions, None);
		register(&store, &session, day(), alice()).await.unwrap();
		session.save().await.unwrap();
		let id = session.id();

		let session = request(&sessions, id);
		logout(&session).await.unwrap();
		logout(&session).await.unwrap();
		logout(&request(&sessions, None)).await.unwrap();
		assert!(require_auth(&request(&sessions, id)).await.is_err());
	}

	#[tokio::test]
	async fn sessions_expire_a_fixed_time_after_login() {
		let store = MemStorage::new();
		let sessions = Arc::new(MemoryStore::default());
		let session = request(&sessions, None);
		register(&store, &session, day(), alice()).await.unwrap();
		let left = session.expiry_date() - OffsetDateTime::now_utc();
		assert!(left > Duration::hours(23) && left <= day());

		let session = request(&sessions, None);
		login(&store, &session, Duration::seconds(-1), "alice", "Secret1").await.unwrap();
		session.save().await.unwrap();
		let err = require_auth(&request(&sessions, session.id())).await.unwrap_err();
		assert!(matches!(err, ApiError::NotAuthenticated));
	}
}
