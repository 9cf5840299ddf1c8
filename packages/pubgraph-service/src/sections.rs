use pubgraph_domain::{SectionAggregator, SectionHit};

use crate::{PubgraphService, SearchRequest, ServiceResult};

#[derive(Debug, Clone, serde::Serialize)]
pub struct SectionSearchResponse {
	pub results: Vec<SectionHit>,
}

/// One section hit resolved to its owning document, in index score order.
#[derive(Debug, Clone)]
pub(crate) struct RetrievedSection {
	pub(crate) document: String,
	pub(crate) text: String,
	pub(crate) score: f32,
}

impl PubgraphService {
	/// Passage search over the single section-embeddings collection. Each
	/// document keeps only its best-scoring section; ranking then works the
	/// same way as document search.
	pub async fn search_sections(
		&self,
		req: &SearchRequest,
	) -> ServiceResult<SectionSearchResponse> {
		let sections = self.retrieve_sections(req).await?;
		let mut agg = SectionAggregator::new();

		for section in &sections {
			agg.push(&section.document, &section.text, section.score);
		}

		let results = agg.into_ranked();

		tracing::debug!(query = %req.query, count = results.len(), "Section search completed.");

		Ok(SectionSearchResponse { results })
	}

	/// Embeds the query, hits the sections collection, and resolves each hit
	/// to its owning document. Shared by passage search and answer
	/// generation.
	pub(crate) async fn retrieve_sections(
		&self,
		req: &SearchRequest,
	) -> ServiceResult<Vec<RetrievedSection>> {
		let top_k = self.validated_top_k(req)?;
		let vector = self.embed_query(&req.query).await?;
		let collection = self.sections_collection();
		let hits = self.collaborators.index.nearest(&collection, vector, top_k).await?;
		let mut sections = Vec::with_capacity(hits.len());

		for hit in hits {
			// Section rows deleted since indexing are orphans; skip them.
			let Some((document, text)) =
				self.collaborators.graph.section_owner(hit.item_id).await?
			else {
				continue;
			};

			sections.push(RetrievedSection { document, text, score: hit.score });
		}

		Ok(sections)
	}
}
