/// The closed set of indexed item categories. Adding a category means adding
/// a variant here plus its collection suffix and mention kinds below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
	Entity,
	Organism,
	Compound,
	Person,
}

/// Canonical query order. Ranking ties resolve to first-encounter order, so
/// this order is part of the observable contract.
pub const CATEGORIES: [Category; 4] =
	[Category::Entity, Category::Organism, Category::Compound, Category::Person];

impl Category {
	pub fn label(self) -> &'static str {
		match self {
			Self::Entity => "entity",
			Self::Organism => "organism",
			Self::Compound => "compound",
			Self::Person => "person",
		}
	}

	pub fn parse(value: &str) -> Option<Self> {
		match value {
			"entity" => Some(Self::Entity),
			"organism" => Some(Self::Organism),
			"compound" => Some(Self::Compound),
			"person" => Some(Self::Person),
			_ => None,
		}
	}

	/// Suffix of the vector collection holding this category's embeddings.
	pub fn collection_suffix(self) -> &'static str {
		match self {
			Self::Entity => "entities",
			Self::Organism => "organisms",
			Self::Compound => "compounds",
			Self::Person => "people",
		}
	}

	/// Mention kinds that link an item of this category to a document.
	/// People are reachable through authorship or an in-text mention; an item
	/// linked both ways to the same document still resolves once.
	pub fn mention_kinds(self) -> &'static [&'static str] {
		match self {
			Self::Entity => &["mentions"],
			Self::Organism => &["mentions_organism"],
			Self::Compound => &["mentions_compound"],
			Self::Person => &["contributed_by", "mentions_person"],
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_round_trips_labels() {
		for category in CATEGORIES {
			assert_eq!(Category::parse(category.label()), Some(category));
		}

		assert_eq!(Category::parse("protein"), None);
		assert_eq!(Category::parse("Entity"), None);
	}

	#[test]
	fn person_links_through_both_kinds() {
		assert_eq!(Category::Person.mention_kinds(), ["contributed_by", "mentions_person"]);
		assert_eq!(Category::Entity.mention_kinds(), ["mentions"]);
	}
}
