use std::cmp::Ordering;

use axum::{
	extract::{rejection::QueryRejection, Query, State},
	Json,
};

use crate::{
	cars::cars::Car,
	error::{ApiError, FieldError},
	AppState,
};

/// Asking for this feature checks the transmission instead of the feature list.
pub const AUTOMATIC: &str = "Automatic";

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
	#[default]
	#[serde(rename = "price-asc")]
	PriceAsc,
	#[serde(rename = "price-desc")]
	PriceDesc,
	#[serde(rename = "name-asc")]
	NameAsc,
	#[serde(rename = "name-desc")]
	NameDesc,
}

impl SortOrder {
	pub fn parse(s: &str) -> Option<Self> {
		match s {
			"price-asc" => Some(SortOrder::PriceAsc),
			"price-desc" => Some(SortOrder::PriceDesc),
			"name-asc" => Some(SortOrder::NameAsc),
			"name-desc" => Some(SortOrder::NameDesc),
			_ => None,
		}
	}

	fn compare(&self, a: &Car, b: &Car) -> Ordering {
		match self {
			SortOrder::PriceAsc => a.price.cmp(&b.price),
			SortOrder::PriceDesc => b.price.cmp(&a.price),
			SortOrder::NameAsc => a.name.cmp(&b.name),
			SortOrder::NameDesc => b.name.cmp(&a.name),
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarFilters {
	pub search_term: Option<String>,
	pub types: Vec<String>,
	pub min_price: Option<u32>,
	pub max_price: Option<u32>,
	pub features: Vec<String>,
}

fn matches_feature(car: &Car, feature: &str) -> bool {
	if feature == AUTOMATIC {
		car.transmission == AUTOMATIC
	} else {
		car.has_feature(feature)
	}
}

/// Narrows `cars` stage by stage: search term, types, minimum price, maximum
/// price, then features. Absent or empty criteria leave the set untouched.
pub fn filter_cars(cars: &[Car], filters: &CarFilters) -> Vec<Car> {
	let mut filtered: Vec<Car> = cars.to_vec();

	if let Some(term) = filters.search_term.as_deref().filter(|t| !t.is_empty()) {
		let term = term.to_lowercase();
		filtered.retain(|car| car.name.to_lowercase().contains(&term) || car.car_type.to_lowercase().contains(&term));
	}
	if !filters.types.is_empty() {
		filtered.retain(|car| filters.types.iter().any(|t| *t == car.car_type));
	}
	if let Some(min) = filters.min_price {
		filtered.retain(|car| car.price >= min);
	}
	if let Some(max) = filters.max_price {
		filtered.retain(|car| car.price <= max);
	}
	if !filters.features.is_empty() {
		filtered.retain(|car| filters.features.iter().all(|f| matches_feature(car, f)));
	}
	filtered
}

/// Stable: cars with equal keys keep their relative order.
pub fn sort_cars(cars: &mut [Car], order: SortOrder) {
	cars.sort_by(|a, b| order.compare(a, b));
}

#[derive(serde::Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
	pub items: Vec<T>,
	pub page: usize,
	pub total_pages: usize,
	pub total_items: usize,
}

pub fn total_pages(total_items: usize, page_size: usize) -> usize {
	if page_size == 0 {
		return 0;
	}
	(total_items + page_size - 1) / page_size
}

/// Slices out 1-indexed `page`. Page 0 and pages past the end are empty.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
	let total_items = items.len();
	let slice = match page.checked_sub(1) {
		Some(index) if page_size > 0 => {
			let start = index.saturating_mul(page_size);
			if start >= total_items {
				Vec::new()
			} else {
				let end = (start + page_size).min(total_items);
				items[start..end].to_vec()
			}
		}
		_ => Vec::new(),
	};
	Page {
		items: slice,
		page,
		total_pages: total_pages(total_items, page_size),
		total_items,
	}
}

/// Browsing state for the catalogue. Any change to the search term,
/// filters or sort order sends the view back to page 1.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogView {
	filters: CarFilters,
	sort: SortOrder,
	page: usize,
	page_size: usize,
}

impl CatalogView {
	pub fn new(page_size: usize) -> Self {
		CatalogView {
			filters: CarFilters::default(),
			sort: SortOrder::default(),
			page: 1,
			page_size,
		}
	}

	pub fn page(&self) -> usize {
		self.page
	}

	pub fn filters(&self) -> &CarFilters {
		&self.filters
	}

	pub fn sort(&self) -> SortOrder {
		self.sort
	}

	pub fn set_search_term(&mut self, term: Option<String>) {
		self.filters.search_term = term;
		self.page = 1;
	}

	/// Replaces everything except the search term.
	pub fn set_filters(&mut self, filters: CarFilters) {
		let search_term = self.filters.search_term.take();
		self.filters = CarFilters { search_term, ..filters };
		self.page = 1;
	}

	pub fn set_sort(&mut self, sort: SortOrder) {
		self.sort = sort;
		self.page = 1;
	}

	pub fn set_page(&mut self, page: usize) {
		self.page = page;
	}

	pub fn render(&self, cars: &[Car]) -> Page<Car> {
		let mut matched = filter_cars(cars, &self.filters);
		sort_cars(&mut matched, self.sort);
		paginate(&matched, self.page, self.page_size)
	}
}

#[derive(serde::Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
	pub search: Option<String>,
	/// Comma separated.
	pub types: Option<String>,
	pub min_price: Option<u32>,
	pub max_price: Option<u32>,
	/// Comma separated.
	pub features: Option<String>,
	pub sort: Option<String>,
	pub page: Option<usize>,
}

fn split_list(raw: Option<&str>) -> Vec<String> {
	raw.map(|s| s.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect())
		.unwrap_or_default()
}

impl SearchParams {
	pub fn into_view(self, page_size: usize) -> Result<CatalogView, ApiError> {
		let mut view = CatalogView::new(page_size);
		view.set_search_term(self.search.filter(|s| !s.trim().is_empty()));
		view.set_filters(CarFilters {
			search_term: None,
			types: split_list(self.types.as_deref()),
			min_price: self.min_price,
			max_price: self.max_price,
			features: split_list(self.features.as_deref()),
		});
		if let Some(sort) = self.sort.as_deref() {
			let order = SortOrder::parse(sort).ok_or_else(|| {
				ApiError::Validation(vec![FieldError::new(
					"sort",
					"expected one of price-asc, price-desc, name-asc, name-desc",
				)])
			})?;
			view.set_sort(order);
		}
		view.set_page(self.page.unwrap_or(1));
		Ok(view)
	}
}

/// GET /api/cars/search
pub async fn search_cars(
	State(state): State<AppState>,
	query: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Page<Car>>, ApiError> {
	let Query(params) = query?;
	let view = params.into_view(state.config.page_size)?;
	let cars = state.store.get_all_cars().await;
	Ok(Json(view.render(&cars)))
}
