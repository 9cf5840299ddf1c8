use std::{cmp::Ordering, collections::HashMap};

use crate::Category;

/// One item hit attributed to one owning document. The score is the
/// effective score, after any exact-match override.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ItemMatch {
	pub category: Category,
	pub name: String,
	pub score: f32,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DocumentHit {
	pub document: String,
	pub matched_items: Vec<ItemMatch>,
	pub max_score: f32,
}

/// Collects item matches per owning document across category queries.
/// Owned by a single request; `order` remembers first encounter so ranking
/// ties stay deterministic.
#[derive(Debug, Default)]
pub struct DocumentAggregator {
	order: Vec<String>,
	matches: HashMap<String, Vec<ItemMatch>>,
}

impl DocumentAggregator {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, document: &str, item: ItemMatch) {
		let entry = self.matches.entry(document.to_string()).or_default();

		if entry.is_empty() {
			self.order.push(document.to_string());
		}

		entry.push(item);
	}

	/// Drains into hits ranked by aggregate score. The aggregate is the MAX
	/// of the document's effective scores, never a sum, so one strong match
	/// beats many weak ones. Empty input yields an empty list.
	pub fn into_ranked(mut self) -> Vec<DocumentHit> {
		let mut hits = self
			.order
			.into_iter()
			.map(|document| {
				let matched_items = self.matches.remove(&document).unwrap_or_default();
				let max_score = matched_items
					.iter()
					.map(|item| item.score)
					.fold(f32::NEG_INFINITY, f32::max);

				DocumentHit { document, matched_items, max_score }
			})
			.collect::<Vec<_>>();

		// Stable sort; equal scores keep first-encounter order.
		hits.sort_by(|a, b| b.max_score.partial_cmp(&a.max_score).unwrap_or(Ordering::Equal));

		hits
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn item(category: Category, name: &str, score: f32) -> ItemMatch {
		ItemMatch { category, name: name.to_string(), score }
	}

	#[test]
	fn aggregate_is_max_not_sum() {
		let mut agg = DocumentAggregator::new();

		agg.push("DocA", item(Category::Entity, "gene editing", 0.5));
		agg.push("DocA", item(Category::Compound, "Cas9 protein", 0.9));

		let hits = agg.into_ranked();

		assert_eq!(hits.len(), 1);
		assert_eq!(hits[0].max_score, 0.9);
		assert_eq!(hits[0].matched_items.len(), 2);
	}

	#[test]
	fn ties_keep_first_encounter_order() {
		let mut agg = DocumentAggregator::new();

		agg.push("DocB", item(Category::Entity, "alpha", 0.7));
		agg.push("DocA", item(Category::Entity, "beta", 0.7));
		agg.push("DocC", item(Category::Organism, "gamma", 0.9));

		let hits = agg.into_ranked();
		let order = hits.iter().map(|hit| hit.document.as_str()).collect::<Vec<_>>();

		assert_eq!(order, ["DocC", "DocB", "DocA"]);
	}

	#[test]
	fn empty_aggregation_ranks_to_empty() {
		assert!(DocumentAggregator::new().into_ranked().is_empty());
	}

	#[test]
	fn matches_stay_attached_to_their_document() {
		let mut agg = DocumentAggregator::new();

		agg.push("DocA", item(Category::Entity, "CRISPR", 100.0));
		agg.push("DocB", item(Category::Entity, "CRISPR", 100.0));
		agg.push("DocA", item(Category::Person, "Doudna", 0.3));

		let hits = agg.into_ranked();

		assert_eq!(hits[0].document, "DocA");
		assert_eq!(hits[0].matched_items.len(), 2);
		assert_eq!(hits[1].document, "DocB");
		assert_eq!(hits[1].matched_items.len(), 1);
	}
}
