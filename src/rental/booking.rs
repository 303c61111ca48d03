use axum::{
	extract::{rejection::JsonRejection, Path, State},
	Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use hyper::StatusCode;

use crate::{
	auth::CurrentUser,
	error::{ApiError, FieldError},
	AppState,
};

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
	#[default]
	Pending,
	Confirmed,
	Cancelled,
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AdditionalService {
	pub name: String,
	pub price: u32,
}

#[derive(serde::Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
	pub id: u32,
	pub user_id: u32,
	pub car_id: u32,
	pub start_date: DateTime<Utc>,
	pub end_date: DateTime<Utc>,
	pub total_price: u32,
	pub status: BookingStatus,
	pub pickup_location: String,
	pub additional_services: Option<Vec<AdditionalService>>,
	pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
	pub user_id: u32,
	pub car_id: u32,
	pub start_date: DateTime<Utc>,
	pub end_date: DateTime<Utc>,
	pub total_price: u32,
	pub status: BookingStatus,
	pub pickup_location: String,
	pub additional_services: Option<Vec<AdditionalService>>,
}

impl Booking {
	pub fn from_new(id: u32, booking: NewBooking, created_at: DateTime<Utc>) -> Self {
		Booking {
			id,
			user_id: booking.user_id,
			car_id: booking.car_id,
			start_date: booking.start_date,
			end_date: booking.end_date,
			total_price: booking.total_price,
			status: booking.status,
			pickup_location: booking.pickup_location,
			additional_services: booking.additional_services,
			created_at,
		}
	}
}

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
	let raw = raw.trim();
	if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
		return Some(ts.with_timezone(&Utc));
	}
	NaiveDate::parse_from_str(raw, "%Y-%m-%d")
		.ok()
		.and_then(|d| d.and_hms_opt(0, 0, 0))
		.map(|d| d.and_utc())
}

fn date_field(field: &str, raw: Option<&str>, errors: &mut Vec<FieldError>) -> Option<DateTime<Utc>> {
	match raw {
		None => {
			errors.push(FieldError::new(field, "Required"));
			None
		}
		Some(raw) => {
			let parsed = parse_date(raw);
			if parsed.is_none() {
				errors.push(FieldError::new(field, "Invalid date"));
			}
			parsed
		}
	}
}

/// Validates a start/end pair; the end may not precede the start.
pub fn rental_period(
	start: Option<&str>,
	end: Option<&str>,
	errors: &mut Vec<FieldError>,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
	let start = date_field("startDate", start, errors);
	let end = date_field("endDate", end, errors);
	match (start, end) {
		(Some(s), Some(e)) if e < s => {
			errors.push(FieldError::new("endDate", "End date must not be before start date"));
			None
		}
		(Some(s), Some(e)) => Some((s, e)),
		_ => None,
	}
}

#[derive(serde::Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
	pub car_id: Option<u32>,
	pub start_date: Option<String>,
	pub end_date: Option<String>,
	pub total_price: Option<i64>,
	pub status: Option<BookingStatus>,
	pub pickup_location: Option<String>,
	pub additional_services: Option<Vec<AdditionalService>>,
}

impl BookingRequest {
	/// Builds the booking for `user_id`; the owner never comes from the body.
	pub fn validate(self, user_id: u32) -> Result<NewBooking, ApiError> {
		let mut errors = Vec::new();

		if self.car_id.is_none() {
			errors.push(FieldError::new("carId", "Required"));
		}
		let period = rental_period(self.start_date.as_deref(), self.end_date.as_deref(), &mut errors);
		let total_price = match self.total_price {
			None => {
				errors.push(FieldError::new("totalPrice", "Required"));
				None
			}
			Some(p) => match u32::try_from(p) {
				Ok(p) if p > 0 => Some(p),
				_ => {
					errors.push(FieldError::new("totalPrice", "Must be a positive amount"));
					None
				}
			},
		};
		let pickup_location = self.pickup_location.filter(|l| !l.trim().is_empty());
		if pickup_location.is_none() {
			errors.push(FieldError::new("pickupLocation", "Required"));
		}

		match (self.car_id, period, total_price, pickup_location) {
			(Some(car_id), Some((start_date, end_date)), Some(total_price), Some(pickup_location)) if errors.is_empty() => {
				Ok(NewBooking {
					user_id,
					car_id,
					start_date,
					end_date,
					total_price,
					status: self.status.unwrap_or_default(),
					pickup_location,
					additional_services: self.additional_services.filter(|s| !s.is_empty()),
				})
			}
			_ => Err(ApiError::Validation(errors)),
		}
	}
}

/// POST /api/bookings
pub async fn create_booking(
	State(state): State<AppState>,
	user: CurrentUser,
	payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Booking>), ApiError> {
	let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
	let booking = request.validate(user.id)?;
	let car_id = booking.car_id;
	let booking = state.store.book_car(booking).await.map_err(|e| {
		log::warn!("booking of car {} by user {} refused: {}", car_id, user.id, e);
		ApiError::from(e)
	})?;
	log::info!("booking {} created: car {} for user {}", booking.id, booking.car_id, booking.user_id);
	Ok((StatusCode::CREATED, Json(booking)))
}

/// GET /api/bookings
pub async fn list_bookings(State(state): State<AppState>, user: CurrentUser) -> Json<Vec<Booking>> {
	Json(state.store.get_bookings_by_user_id(user.id).await)
}

/// GET /api/bookings/{id}
///
/// Other users' bookings are reported as missing.
pub async fn get_booking(
	State(state): State<AppState>,
	user: CurrentUser,
	Path(id): Path<String>,
) -> Result<Json<Booking>, ApiError> {
	let not_found = || ApiError::NotFound("Booking not found".to_string());
	let id: u32 = id.parse().map_err(|_| not_found())?;
	match state.store.get_booking_by_id(id).await {
		Some(booking) if booking.user_id == user.id => Ok(Json(booking)),
		_ => Err(not_found()),
	}
}

#[cfg(test)]
mod tests {
	use chrono::TimeZone;

	use super::*;

	fn request() -> BookingRequest {
		BookingRequest {
			car_id: Some(2),
			start_date: Some("2024-07-01".into()),
			end_date: Some("2024-07-04T12:00:00Z".into()),
			total_price: Some(260),
			status: None,
			pickup_location: Some("Downtown Office".into()),
			additional_services: Some(vec![]),
		}
	}

	fn fields(err: ApiError) -> Vec<String> {
		match err {
			ApiError::Validation(errors) => errors.into_iter().map(|e| e.field).collect(),
			other => panic!("expected validation error, got {:?}", other),
		}
	}

	#[test]
	fn parses_both_date_forms() {
		assert_eq!(parse_date("2024-07-01"), Some(Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap()));
		assert_eq!(
			parse_date("2024-07-01T10:30:00+02:00"),
			Some(Utc.with_ymd_and_hms(2024, 7, 1, 8, 30, 0).unwrap())
		);
		assert_eq!(parse_date("next tuesday"), None);
	}

	#[test]
	fn valid_request_becomes_pending_booking() {
		let booking = request().validate(9).unwrap();
		assert_eq!(booking.user_id, 9);
		assert_eq!(booking.car_id, 2);
		assert_eq!(booking.status, BookingStatus::Pending);
		assert_eq!(booking.total_price, 260);
		assert_eq!(booking.additional_services, None);
	}

	#[test]
	fn same_day_rental_is_allowed() {
		let booking = BookingRequest {
			end_date: Some("2024-07-01".into()),
			..request()
		}
		.validate(1)
		.unwrap();
		assert_eq!(booking.start_date, booking.end_date);
	}

	#[test]
	fn end_before_start_is_rejected() {
		let err = BookingRequest {
			start_date: Some("2024-07-05".into()),
			..request()
		}
		.validate(1)
		.unwrap_err();
		assert_eq!(fields(err), vec!["endDate"]);
	}

	#[test]
	fn missing_and_bad_fields_are_all_reported() {
		let err = BookingRequest {
			car_id: None,
			start_date: Some("soon".into()),
			total_price: Some(0),
			pickup_location: Some(" ".into()),
			..request()
		}
		.validate(1)
		.unwrap_err();
		assert_eq!(fields(err), vec!["carId", "startDate", "totalPrice", "pickupLocation"]);

		let err = BookingRequest {
			total_price: Some(-5),
			..request()
		}
		.validate(1)
		.unwrap_err();
		assert_eq!(fields(err), vec!["totalPrice"]);
	}

	#[test]
	fn booking_json_shape() {
		let booking = Booking::from_new(
			4,
			BookingRequest {
				additional_services: Some(vec![AdditionalService {
					name: "GPS Navigation".into(),
					price: 5,
				}]),
				..request()
			}
			.validate(3)
			.unwrap(),
			Utc::now(),
		);
		let json = serde_json::to_value(&booking).unwrap();
		assert_eq!(json["carId"], 2);
		assert_eq!(json["userId"], 3);
		assert_eq!(json["status"], "pending");
		assert_eq!(json["pickupLocation"], "Downtown Office");
		assert_eq!(json["additionalServices"][0]["name"], "GPS Navigation");
	}
}
