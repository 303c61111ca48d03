use std::collections::BTreeMap;

/// In-memory collection with a monotonic id counter.
///
/// Ids start at 1 and are never handed out twice, even if a future caller
/// were to remove rows. Listing walks rows in ascending id order, which is
/// also insertion order.
#[derive(Debug)]
pub struct MemTable<T> {
	rows: BTreeMap<u32, T>,
	next_id: u32,
}

impl<T: Clone> MemTable<T> {
	pub fn new() -> Self {
		MemTable {
			rows: BTreeMap::new(),
			next_id: 1,
		}
	}

	/// Allocates the next id and stores whatever `build` makes of it.
	pub fn create(&mut self, build: impl FnOnce(u32) -> T) -> T {
		let id = self.next_id;
		self.next_id += 1;
		let row = build(id);
		self.rows.insert(id, row.clone());
		row
	}

	pub fn get(&self, id: u32) -> Option<T> {
		self.rows.get(&id).cloned()
	}

	pub fn find(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
		self.rows.values().find(|row| pred(row)).cloned()
	}

	pub fn list(&self) -> Vec<T> {
		self.rows.values().cloned().collect()
	}

	pub fn filter(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
		self.rows.values().filter(|row| pred(row)).cloned().collect()
	}

	/// Applies `change` to the stored row and returns the new version.
	pub fn update(&mut self, id: u32, change: impl FnOnce(&mut T)) -> Option<T> {
		let row = self.rows.get_mut(&id)?;
		change(row);
		Some(row.clone())
	}

	pub fn len(&self) -> usize {
		self.rows.len()
	}
}

impl<T: Clone> Default for MemTable<T> {
	fn default() -> Self {
		Self::new()
	}
}
