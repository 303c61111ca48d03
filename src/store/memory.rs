use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{MemTable, Storage, StoreError};
use crate::{
	cars::{
		cars::{Availability, Car, NewCar},
		seed::sample_cars,
	},
	rental::booking::{Booking, BookingStatus, NewBooking},
	users::{DocumentStatus, NewUser, User},
};

/// Process-memory backend. Nothing survives a restart.
///
/// Each collection has its own lock. Operations that touch more than one
/// collection take them in the order users, cars, bookings.
#[derive(Debug, Default)]
pub struct MemStorage {
	users: RwLock<MemTable<User>>,
	cars: RwLock<MemTable<Car>>,
	bookings: RwLock<MemTable<Booking>>,
}

impl MemStorage {
	pub fn new() -> Self {
		Self::default()
	}

	/// Store preloaded with the sample fleet.
	pub fn seeded() -> Self {
		let mut cars = MemTable::new();
		for car in sample_cars() {
			cars.create(|id| Car::from_new(id, car));
		}
		log::info!("seeded {} cars", cars.len());
		MemStorage {
			cars: RwLock::new(cars),
			..Self::default()
		}
	}
}

fn insert_booking(cars: &mut MemTable<Car>, bookings: &mut MemTable<Booking>, booking: NewBooking) -> Booking {
	let car_id = booking.car_id;
	let created_at = Utc::now();
	let booking = bookings.create(|id| Booking::from_new(id, booking, created_at));
	cars.update(car_id, |car| car.availability = Availability::Unavailable);
	booking
}

#[async_trait]
impl Storage for MemStorage {
	async fn get_user(&self, id: u32) -> Option<User> {
		self.users.read().await.get(id)
	}

	async fn get_user_by_username(&self, username: &str) -> Option<User> {
		self.users.read().await.find(|u| u.username == username)
	}

	async fn get_user_by_email(&self, email: &str) -> Option<User> {
		self.users.read().await.find(|u| u.email == email)
	}

	async fn create_user(&self, user: NewUser) -> User {
		let created_at = Utc::now();
		self.users.write().await.create(|id| User::from_new(id, user, created_at))
	}

	async fn register_user(&self, user: NewUser) -> Result<User, StoreError> {
		let mut users = self.users.write().await;
		if users.find(|u| u.username == user.username).is_some() {
			return Err(StoreError::UsernameTaken(user.username));
		}
		if users.find(|u| u.email == user.email).is_some() {
			return Err(StoreError::EmailInUse(user.email));
		}
		let created_at = Utc::now();
		Ok(users.create(|id| User::from_new(id, user, created_at)))
	}

	async fn update_user_document_status(&self, id: u32, status: DocumentStatus) -> Option<User> {
		self.users.write().await.update(id, |u| u.document_status = status)
	}

	async fn get_all_cars(&self) -> Vec<Car> {
		self.cars.read().await.list()
	}

	async fn get_car_by_id(&self, id: u32) -> Option<Car> {
		self.cars.read().await.get(id)
	}

	async fn get_cars_by_type(&self, car_type: &str) -> Vec<Car> {
		self.cars.read().await.filter(|c| c.car_type == car_type)
	}

	async fn get_cars_by_availability(&self, availability: Availability) -> Vec<Car> {
		self.cars.read().await.filter(|c| c.availability == availability)
	}

	async fn get_cars_by_price_range(&self, min: u32, max: u32) -> Vec<Car> {
		self.cars.read().await.filter(|c| c.price >= min && c.price <= max)
	}

	async fn create_car(&self, car: NewCar) -> Car {
		self.cars.write().await.create(|id| Car::from_new(id, car))
	}

	async fn update_car_availability(&self, id: u32, availability: Availability) -> Option<Car> {
		self.cars.write().await.update(id, |c| c.availability = availability)
	}

	async fn create_booking(&self, booking: NewBooking) -> Booking {
		let mut cars = self.cars.write().await;
		let mut bookings = self.bookings.write().await;
		insert_booking(&mut cars, &mut bookings, booking)
	}

	async fn book_car(&self, booking: NewBooking) -> Result<Booking, StoreError> {
		let users = self.users.read().await;
		let mut cars = self.cars.write().await;
		let mut bookings = self.bookings.write().await;

		if users.get(booking.user_id).is_none() {
			return Err(StoreError::UserNotFound(booking.user_id));
		}
		let car = cars.get(booking.car_id).ok_or(StoreError::CarNotFound(booking.car_id))?;
		if !car.availability.is_bookable() {
			return Err(StoreError::CarUnavailable(car.id));
		}
		Ok(insert_booking(&mut cars, &mut bookings, booking))
	}

	async fn get_booking_by_id(&self, id: u32) -> Option<Booking> {
		self.bookings.read().await.get(id)
	}

	async fn get_bookings_by_user_id(&self, user_id: u32) -> Vec<Booking> {
		self.bookings.read().await.filter(|b| b.user_id == user_id)
	}

	async fn update_booking_status(&self, id: u32, status: BookingStatus) -> Option<Booking> {
		self.bookings.write().await.update(id, |b| b.status = status)
	}
}
