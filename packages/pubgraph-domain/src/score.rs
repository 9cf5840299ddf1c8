/// Sentinel score for a verbatim name match. Deliberately above any cosine
/// similarity so exact hits always outrank approximate ones.
pub const EXACT_MATCH_SCORE: f32 = 100.0;

/// Case-sensitive, untrimmed comparison. "CRISPR" and "crispr" are different
/// names on purpose.
pub fn effective_score(raw: f32, item_name: &str, query: &str) -> f32 {
	if item_name == query { EXACT_MATCH_SCORE } else { raw }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn exact_name_match_overrides_raw_score() {
		assert_eq!(effective_score(0.81, "CRISPR", "CRISPR"), EXACT_MATCH_SCORE);
		assert_eq!(effective_score(0.0, "CRISPR", "CRISPR"), EXACT_MATCH_SCORE);
	}

	#[test]
	fn near_matches_keep_the_raw_score() {
		assert_eq!(effective_score(0.81, "crispr", "CRISPR"), 0.81);
		assert_eq!(effective_score(0.81, "CRISPR ", "CRISPR"), 0.81);
		assert_eq!(effective_score(0.42, "Cas9", "CRISPR"), 0.42);
	}
}
