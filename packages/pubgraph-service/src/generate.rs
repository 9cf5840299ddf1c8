use std::{collections::HashSet, fmt::Write};

use crate::{PubgraphService, SearchRequest, ServiceResult, sections::RetrievedSection};

#[derive(Debug, Clone, serde::Serialize)]
pub struct GenerateResponse {
	pub query: String,
	pub answer: String,
	pub documents: Vec<String>,
}

impl PubgraphService {
	/// Retrieval-augmented answering: retrieves the top sections for the
	/// query and asks the generation provider to synthesize an answer from
	/// them alone. `documents` lists the distinct source publications in
	/// retrieval order.
	pub async fn generate(&self, req: &SearchRequest) -> ServiceResult<GenerateResponse> {
		let sections = self.retrieve_sections(req).await?;

		// Nothing retrieved means nothing to ground an answer on; the
		// provider is not consulted.
		if sections.is_empty() {
			return Ok(GenerateResponse {
				query: req.query.clone(),
				answer: String::new(),
				documents: Vec::new(),
			});
		}

		let prompt = build_prompt(&req.query, &sections);
		let answer = self
			.collaborators
			.generation
			.complete(&self.cfg.providers.generation, &prompt)
			.await?;
		let documents = unique_documents(&sections);

		tracing::debug!(query = %req.query, sections = sections.len(), "Generated an answer.");

		Ok(GenerateResponse { query: req.query.clone(), answer, documents })
	}
}

fn build_prompt(query: &str, sections: &[RetrievedSection]) -> String {
	let mut prompt = String::from(
		"You are a research assistant answering questions about scientific \
		publications.\n\
		Answer using only the sections below that are relevant to the query. \
		Ignore irrelevant sections and do not add outside knowledge. \
		Reference sections where helpful (e.g. \"According to Section 2\"), \
		keep the answer compact, and state plainly when the sections do not \
		cover part of the query.\n\nSections:\n",
	);

	for (position, section) in sections.iter().enumerate() {
		let _ = writeln!(
			prompt,
			"Section {} (from {}): {}",
			position + 1,
			section.document,
			section.text
		);
	}

	let _ = write!(prompt, "\nQuery:\n{query}\n");

	prompt
}

fn unique_documents(sections: &[RetrievedSection]) -> Vec<String> {
	let mut seen = HashSet::new();

	sections
		.iter()
		.filter(|section| seen.insert(section.document.clone()))
		.map(|section| section.document.clone())
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn section(document: &str, text: &str, score: f32) -> RetrievedSection {
		RetrievedSection { document: document.to_string(), text: text.to_string(), score }
	}

	#[test]
	fn prompt_numbers_sections_and_names_their_documents() {
		let sections =
			[section("DocA", "Methods text.", 0.9), section("DocB", "Results text.", 0.7)];
		let prompt = build_prompt("How was it measured?", &sections);

		assert!(prompt.contains("Section 1 (from DocA): Methods text."));
		assert!(prompt.contains("Section 2 (from DocB): Results text."));
		assert!(prompt.ends_with("Query:\nHow was it measured?\n"));
	}

	#[test]
	fn source_documents_dedupe_in_retrieval_order() {
		let sections = [
			section("DocB", "a", 0.9),
			section("DocA", "b", 0.8),
			section("DocB", "c", 0.7),
		];

		assert_eq!(unique_documents(&sections), ["DocB", "DocA"]);
	}
}
