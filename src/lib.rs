use std::sync::Arc;

use axum::routing::{get, post, Router};
use tower_http::cors::CorsLayer;

pub mod auth;
pub mod cars;
pub mod config;
pub mod error;
pub mod rental;
pub mod search;
pub mod store;
pub mod users;

use config::Config;
use store::{MemStorage, Storage};

/// Handles shared by every request handler.
#[derive(Clone)]
pub struct AppState {
	pub store: Arc<dyn Storage>,
	pub config: Arc<Config>,
}

impl AppState {
	pub fn new(store: Arc<dyn Storage>, config: Config) -> Self {
		AppState {
			store,
			config: Arc::new(config),
		}
	}

	/// State over a freshly seeded in-memory store.
	pub fn seeded(config: Config) -> Self {
		Self::new(Arc::new(MemStorage::seeded()), config)
	}
}

pub fn router(state: AppState) -> Router {
	let sessions = auth::session_layer(&state.config);
	Router::new()
		.route("/health", get(|| async { "ok" }))
		.route("/api/cars", get(cars::cars::get_cars))
		.route("/api/cars/search", get(search::search_cars))
		.route("/api/cars/{id}", get(cars::cars::get_car))
		.route("/api/cars/{id}/quote", post(rental::quote::quote_car))
		.route("/api/register", post(users::register))
		.route("/api/login", post(users::login))
		.route("/api/logout", post(users::logout))
		.route("/api/me", get(users::me))
		.route("/api/user/document", post(users::upload_document))
		.route(
			"/api/bookings",
			post(rental::booking::create_booking).get(rental::booking::list_bookings),
		)
		.route("/api/bookings/{id}", get(rental::booking::get_booking))
		.layer(sessions)
		.layer(CorsLayer::permissive())
		.with_state(state)
}
