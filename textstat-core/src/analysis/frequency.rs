use std::collections::HashMap;
use std::hash::Hash;

/// Occurrence counts of a sequence of items.
///
/// Items are remembered in the order they were first seen, so that ranking
/// can break ties by first occurrence.
///
/// ## Responsibilities:
/// - Count exact occurrences of each distinct item
/// - Rank items by count, descending, ties by first occurrence
/// - Cut the ranking down to the top `n`
///
/// ## Invariants
/// - `entries` holds each distinct item exactly once, in first-seen order
/// - Every count is strictly positive
#[derive(Clone, Debug)]
pub struct FrequencyTable<T> {
	/// Distinct items with their counts, in first-seen order.
	entries: Vec<(T, usize)>,
	/// Position of each item in `entries`.
	index: HashMap<T, usize>,
}

impl<T: Eq + Hash + Clone> FrequencyTable<T> {
	/// Counts every item of `items`.
	pub fn from_items<I: IntoIterator<Item = T>>(items: I) -> Self {
		let mut table = Self { entries: Vec::new(), index: HashMap::new() };
		for item in items {
			table.add(item);
		}
		table
	}

	fn add(&mut self, item: T) {
		match self.index.get(&item) {
			Some(&position) => self.entries[position].1 += 1,
			None => {
				self.index.insert(item.clone(), self.entries.len());
				self.entries.push((item, 1));
			}
		}
	}

	/// Occurrences of `item` (0 if never seen).
	pub fn count(&self, item: &T) -> usize {
		self.index.get(item).map_or(0, |&position| self.entries[position].1)
	}

	/// Number of distinct items.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Total number of counted items.
	pub fn total(&self) -> usize {
		self.entries.iter().map(|(_, count)| count).sum()
	}

	/// All items ranked by count, descending.
	///
	/// `sort_by` is stable, so equal counts keep first-seen order.
	pub fn ranked(self) -> Vec<(T, usize)> {
		let mut entries = self.entries;
		entries.sort_by(|a, b| b.1.cmp(&a.1));
		entries
	}

	/// The `n` highest ranked items; fewer if there are fewer distinct items.
	pub fn top_n(self, n: usize) -> Vec<(T, usize)> {
		let mut ranked = self.ranked();
		ranked.truncate(n);
		ranked
	}
}

/// Counts `items` and returns the `n` most frequent, ties by first occurrence.
///
/// `n == 0` yields an empty result.
pub fn top_n<T, I>(items: I, n: usize) -> Vec<(T, usize)>
where
	T: Eq + Hash + Clone,
	I: IntoIterator<Item = T>,
{
	if n == 0 {
		return Vec::new();
	}
	FrequencyTable::from_items(items).top_n(n)
}
