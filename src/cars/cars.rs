use axum::{
	extract::{rejection::QueryRejection, Path, Query, State},
	Json,
};

use crate::{error::ApiError, AppState};

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
	#[default]
	Available,
	Limited,
	Unavailable,
}

impl Availability {
	pub fn parse(s: &str) -> Option<Self> {
		match s {
			"available" => Some(Availability::Available),
			"limited" => Some(Availability::Limited),
			"unavailable" => Some(Availability::Unavailable),
			_ => None,
		}
	}

	/// Booking is allowed on `available` and `limited` cars.
	pub fn is_bookable(&self) -> bool {
		matches!(self, Availability::Available | Availability::Limited)
	}
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Car {
	pub id: u32,
	pub name: String,
	#[serde(rename = "type")]
	pub car_type: String,
	pub price: u32,
	pub year: u16,
	pub fuel_type: String,
	pub transmission: String,
	pub seats: u8,
	pub doors: u8,
	pub luggage: u8,
	pub features: Vec<String>,
	pub description: String,
	pub availability: Availability,
	pub images: Vec<String>,
}

#[derive(serde::Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewCar {
	pub name: String,
	#[serde(rename = "type")]
	pub car_type: String,
	pub price: u32,
	pub year: u16,
	pub fuel_type: String,
	pub transmission: String,
	pub seats: u8,
	pub doors: u8,
	pub luggage: u8,
	pub features: Vec<String>,
	pub description: String,
	#[serde(default)]
	pub availability: Availability,
	pub images: Vec<String>,
}

impl Car {
	pub fn from_new(id: u32, car: NewCar) -> Self {
		Car {
			id,
			name: car.name,
			car_type: car.car_type,
			price: car.price,
			year: car.year,
			fuel_type: car.fuel_type,
			transmission: car.transmission,
			seats: car.seats,
			doors: car.doors,
			luggage: car.luggage,
			features: car.features,
			description: car.description,
			availability: car.availability,
			images: car.images,
		}
	}

	pub fn has_feature(&self, feature: &str) -> bool {
		self.features.iter().any(|f| f == feature)
	}
}

#[derive(serde::Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CarsParams {
	#[serde(rename = "type")]
	pub car_type: Option<String>,
	pub availability: Option<String>,
	pub min_price: Option<u32>,
	pub max_price: Option<u32>,
}

/// GET /api/cars
///
/// Only one criterion applies, checked in this order: type, availability,
/// then the price range when both bounds are present.
pub async fn get_cars(
	State(state): State<AppState>,
	query: Result<Query<CarsParams>, QueryRejection>,
) -> Result<Json<Vec<Car>>, ApiError> {
	let Query(params) = query?;
	let store = &state.store;
	let cars = if let Some(car_type) = params.car_type.as_deref().filter(|t| !t.is_empty()) {
		store.get_cars_by_type(car_type).await
	} else if let Some(availability) = params.availability.as_deref().filter(|a| !a.is_empty()) {
		match Availability::parse(availability) {
			Some(a) => store.get_cars_by_availability(a).await,
			None => Vec::new(),
		}
	} else if let (Some(min), Some(max)) = (params.min_price, params.max_price) {
		store.get_cars_by_price_range(min, max).await
	} else {
		store.get_all_cars().await
	};
	Ok(Json(cars))
}

/// GET /api/cars/{id}
pub async fn get_car(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Car>, ApiError> {
	let car_not_found = || ApiError::NotFound("Car not found".to_string());
	let id: u32 = id.parse().map_err(|_| car_not_found())?;
	state.store.get_car_by_id(id).await.map(Json).ok_or_else(car_not_found)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn availability_wire_names() {
		assert_eq!(serde_json::to_string(&Availability::Limited).unwrap(), "\"limited\"");
		assert_eq!(Availability::parse("unavailable"), Some(Availability::Unavailable));
		assert_eq!(Availability::parse("Available"), None);
		assert_eq!(Availability::default(), Availability::Available);
	}

	#[test]
	fn only_available_and_limited_are_bookable() {
		assert!(Availability::Available.is_bookable());
		assert!(Availability::Limited.is_bookable());
		assert!(!Availability::Unavailable.is_bookable());
	}

	#[test]
	fn car_serializes_type_field() {
		let car = Car::from_new(
			3,
			NewCar {
				name: "Test".into(),
				car_type: "SUV".into(),
				price: 40,
				year: 2022,
				fuel_type: "Petrol".into(),
				transmission: "Manual".into(),
				seats: 5,
				doors: 5,
				luggage: 2,
				features: vec!["Bluetooth Connection".into()],
				description: "A car".into(),
				availability: Availability::Available,
				images: vec!["a.jpg".into(), "b.jpg".into()],
			},
		);
		let v = serde_json::to_value(&car).unwrap();
		assert_eq!(v["type"], "SUV");
		assert_eq!(v["fuelType"], "Petrol");
		assert_eq!(v["availability"], "available");
		assert!(car.has_feature("Bluetooth Connection"));
	}
}
