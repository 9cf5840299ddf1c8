use std::{cmp::Ordering, collections::HashMap};

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SectionHit {
	pub document: String,
	pub best_section: String,
	pub max_score: f32,
}

/// Keeps the single best-scoring section per document. Replacement requires
/// a strictly greater score, so the first of two equal hits wins.
#[derive(Debug, Default)]
pub struct SectionAggregator {
	order: Vec<String>,
	best: HashMap<String, (String, f32)>,
}

impl SectionAggregator {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, document: &str, section_text: &str, score: f32) {
		match self.best.get_mut(document) {
			Some(best) =>
				if score > best.1 {
					*best = (section_text.to_string(), score);
				},
			None => {
				self.order.push(document.to_string());
				self.best.insert(document.to_string(), (section_text.to_string(), score));
			},
		}
	}

	pub fn into_ranked(mut self) -> Vec<SectionHit> {
		let mut hits = self
			.order
			.into_iter()
			.filter_map(|document| {
				let (best_section, max_score) = self.best.remove(&document)?;

				Some(SectionHit { document, best_section, max_score })
			})
			.collect::<Vec<_>>();

		hits.sort_by(|a, b| b.max_score.partial_cmp(&a.max_score).unwrap_or(Ordering::Equal));

		hits
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn keeps_only_the_best_section_per_document() {
		let mut agg = SectionAggregator::new();

		agg.push("DocA", "intro", 0.4);
		agg.push("DocA", "methods", 0.8);
		agg.push("DocA", "discussion", 0.6);

		let hits = agg.into_ranked();

		assert_eq!(hits.len(), 1);
		assert_eq!(hits[0].best_section, "methods");
		assert_eq!(hits[0].max_score, 0.8);
	}

	#[test]
	fn first_section_wins_a_tie() {
		let mut agg = SectionAggregator::new();

		agg.push("DocA", "first", 0.7);
		agg.push("DocA", "second", 0.7);

		let hits = agg.into_ranked();

		assert_eq!(hits[0].best_section, "first");
	}

	#[test]
	fn documents_rank_by_their_best_section() {
		let mut agg = SectionAggregator::new();

		agg.push("DocA", "a", 0.5);
		agg.push("DocB", "b", 0.9);
		agg.push("DocA", "a2", 0.6);

		let hits = agg.into_ranked();
		let order = hits.iter().map(|hit| hit.document.as_str()).collect::<Vec<_>>();

		assert_eq!(order, ["DocB", "DocA"]);
	}
}
