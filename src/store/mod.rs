mod memory;
mod table;

use async_trait::async_trait;
use thiserror::Error;

use crate::{
	cars::cars::{Availability, Car, NewCar},
	rental::booking::{Booking, BookingStatus, NewBooking},
	users::{DocumentStatus, NewUser, User},
};

pub use memory::MemStorage;
pub use table::MemTable;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
	#[error("username already taken: {0}")]
	UsernameTaken(String),

	#[error("email already in use: {0}")]
	EmailInUse(String),

	#[error("user not found: {0}")]
	UserNotFound(u32),

	#[error("car not found: {0}")]
	CarNotFound(u32),

	#[error("car not available for booking: {0}")]
	CarUnavailable(u32),
}

/// Data access for users, cars and bookings.
///
/// Lookups report absence with `None`; only the compound domain operations
/// (`register_user`, `book_car`) return errors.
#[async_trait]
pub trait Storage: Send + Sync {
	async fn get_user(&self, id: u32) -> Option<User>;
	async fn get_user_by_username(&self, username: &str) -> Option<User>;
	async fn get_user_by_email(&self, email: &str) -> Option<User>;
	/// Inserts without any duplicate check.
	async fn create_user(&self, user: NewUser) -> User;
	/// Checks username and email uniqueness and inserts in one step.
	async fn register_user(&self, user: NewUser) -> Result<User, StoreError>;
	async fn update_user_document_status(&self, id: u32, status: DocumentStatus) -> Option<User>;

	async fn get_all_cars(&self) -> Vec<Car>;
	async fn get_car_by_id(&self, id: u32) -> Option<Car>;
	async fn get_cars_by_type(&self, car_type: &str) -> Vec<Car>;
	async fn get_cars_by_availability(&self, availability: Availability) -> Vec<Car>;
	/// Both bounds are inclusive.
	async fn get_cars_by_price_range(&self, min: u32, max: u32) -> Vec<Car>;
	async fn create_car(&self, car: NewCar) -> Car;
	async fn update_car_availability(&self, id: u32, availability: Availability) -> Option<Car>;

	/// Records the booking and marks its car unavailable, with no checks.
	async fn create_booking(&self, booking: NewBooking) -> Booking;
	/// Books a car: the user and car must exist and the car must be
	/// `available` or `limited`. The car always ends up `unavailable`.
	async fn book_car(&self, booking: NewBooking) -> Result<Booking, StoreError>;
	async fn get_booking_by_id(&self, id: u32) -> Option<Booking>;
	async fn get_bookings_by_user_id(&self, user_id: u32) -> Vec<Booking>;
	async fn update_booking_status(&self, id: u32, status: BookingStatus) -> Option<Booking>;
}
