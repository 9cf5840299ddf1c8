use pubgraph_domain::{
	CATEGORIES, Category, DocumentAggregator, EXACT_MATCH_SCORE, ItemMatch, SectionAggregator,
	effective_score,
};

fn push_hit(agg: &mut DocumentAggregator, document: &str, category: Category, name: &str, raw: f32, query: &str) {
	agg.push(document, ItemMatch {
		category,
		name: name.to_string(),
		score: effective_score(raw, name, query),
	});
}

#[test]
fn exact_match_dominates_cross_category_aggregation() {
	// A document mentioning the query verbatim outranks everything, no
	// matter how strong the approximate hits elsewhere are.
	let query = "CRISPR";
	let mut agg = DocumentAggregator::new();

	push_hit(&mut agg, "DocA", Category::Entity, "CRISPR", 0.81, query);
	push_hit(&mut agg, "DocB", Category::Entity, "gene editing", 0.97, query);
	push_hit(&mut agg, "DocB", Category::Compound, "Cas9", 0.95, query);

	let hits = agg.into_ranked();

	assert_eq!(hits[0].document, "DocA");
	assert_eq!(hits[0].max_score, EXACT_MATCH_SCORE);
	assert_eq!(hits[1].document, "DocB");
	assert_eq!(hits[1].max_score, 0.97);
}

#[test]
fn cross_category_scores_never_accumulate() {
	let query = "photosynthesis";
	let mut agg = DocumentAggregator::new();

	push_hit(&mut agg, "DocA", Category::Entity, "chlorophyll", 0.5, query);
	push_hit(&mut agg, "DocA", Category::Organism, "Arabidopsis", 0.9, query);

	let hits = agg.into_ranked();

	assert_eq!(hits.len(), 1);
	assert_eq!(hits[0].max_score, 0.9);
}

#[test]
fn ranking_is_idempotent_for_identical_input() {
	let build = || {
		let mut agg = DocumentAggregator::new();

		for category in CATEGORIES {
			push_hit(&mut agg, "DocA", category, "shared term", 0.6, "q");
			push_hit(&mut agg, "DocB", category, "shared term", 0.6, "q");
		}

		agg.into_ranked()
	};

	assert_eq!(build(), build());
}

#[test]
fn one_item_owned_by_many_documents_scores_each_owner() {
	let query = "Cas9";
	let mut agg = DocumentAggregator::new();

	for document in ["DocA", "DocB", "DocC"] {
		push_hit(&mut agg, document, Category::Compound, "Cas9", 0.88, query);
	}

	let hits = agg.into_ranked();

	assert_eq!(hits.len(), 3);
	assert!(hits.iter().all(|hit| hit.max_score == EXACT_MATCH_SCORE));
	assert_eq!(
		hits.iter().map(|hit| hit.document.as_str()).collect::<Vec<_>>(),
		["DocA", "DocB", "DocC"],
	);
}

#[test]
fn section_ranking_matches_document_ranking_semantics() {
	let mut agg = SectionAggregator::new();

	agg.push("DocB", "weak passage", 0.4);
	agg.push("DocA", "strong passage", 0.9);
	agg.push("DocB", "stronger passage", 0.7);

	let hits = agg.into_ranked();

	assert_eq!(hits[0].document, "DocA");
	assert_eq!(hits[1].document, "DocB");
	assert_eq!(hits[1].best_section, "stronger passage");
}

#[test]
fn item_matches_serialize_with_snake_case_categories() {
	let matched = ItemMatch {
		category: Category::Person,
		name: "Doudna".to_string(),
		score: 0.72,
	};
	let json = serde_json::to_value(&matched).expect("Expected serializable match.");

	assert_eq!(json["category"], "person");
	assert_eq!(json["name"], "Doudna");
}
