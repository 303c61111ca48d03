use axum::{
	extract::{rejection::JsonRejection, Path, State},
	Json,
};
use chrono::{DateTime, Utc};

use super::booking::{rental_period, AdditionalService};
use crate::{error::ApiError, AppState};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Days billed for a rental. Both the first and the last day count, so a
/// same-day rental is one day.
pub fn rental_days(start: DateTime<Utc>, end: DateTime<Utc>) -> u64 {
	let ms = (end - start).num_milliseconds().unsigned_abs();
	let whole = (ms + (DAY_MS as u64) / 2) / DAY_MS as u64;
	whole + 1
}

#[derive(serde::Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
	pub days: u64,
	pub rental_total: u64,
	pub services_total: u64,
	pub total: u64,
}

pub fn quote(price_per_day: u32, start: DateTime<Utc>, end: DateTime<Utc>, services: &[AdditionalService]) -> Quote {
	let days = rental_days(start, end);
	let rental_total = u64::from(price_per_day) * days;
	let services_total: u64 = services.iter().map(|s| u64::from(s.price) * days).sum();
	Quote {
		days,
		rental_total,
		services_total,
		total: rental_total + services_total,
	}
}

#[derive(serde::Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
	pub start_date: Option<String>,
	pub end_date: Option<String>,
	#[serde(default)]
	pub additional_services: Vec<AdditionalService>,
}

/// POST /api/cars/{id}/quote
pub async fn quote_car(
	State(state): State<AppState>,
	Path(id): Path<String>,
	payload: Result<Json<QuoteRequest>, JsonRejection>,
) -> Result<Json<Quote>, ApiError> {
	let car_not_found = || ApiError::NotFound("Car not found".to_string());
	let id: u32 = id.parse().map_err(|_| car_not_found())?;
	let car = state.store.get_car_by_id(id).await.ok_or_else(car_not_found)?;

	let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
	let mut errors = Vec::new();
	let Some((start, end)) = rental_period(request.start_date.as_deref(), request.end_date.as_deref(), &mut errors) else {
		return Err(ApiError::Validation(errors));
	};
	Ok(Json(quote(car.price, start, end, &request.additional_services)))
}

#[cfg(test)]
mod tests {
	use chrono::{Duration, TimeZone};

	use super::*;

	fn at(day: u32, hour: u32) -> DateTime<Utc> {
		Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
	}

	#[test]
	fn both_ends_are_billed() {
		assert_eq!(rental_days(at(1, 0), at(1, 0)), 1);
		assert_eq!(rental_days(at(1, 0), at(4, 0)), 4);
		// half a day or more rounds up to a full day
		assert_eq!(rental_days(at(1, 0), at(3, 12)), 4);
		assert_eq!(rental_days(at(1, 0), at(3, 11)), 3);
	}

	#[test]
	fn reversed_dates_count_the_same() {
		assert_eq!(rental_days(at(4, 0), at(1, 0)), 4);
		let start = at(10, 9);
		assert_eq!(rental_days(start, start + Duration::days(6)), 7);
	}

	#[test]
	fn services_are_charged_per_day() {
		let services = vec![
			AdditionalService {
				name: "GPS Navigation".into(),
				price: 5,
			},
			AdditionalService {
				name: "Child Seat".into(),
				price: 8,
			},
		];
		let q = quote(65, at(1, 0), at(3, 0), &services);
		assert_eq!(
			q,
			Quote {
				days: 3,
				rental_total: 195,
				services_total: 39,
				total: 234,
			}
		);
		assert_eq!(quote(65, at(1, 0), at(3, 0), &[]).total, 195);
	}
}
