use std::collections::HashSet;

use pubgraph_domain::{CATEGORIES, DocumentAggregator, DocumentHit, ItemMatch, effective_score};

use crate::{PubgraphService, ServiceError, ServiceResult};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchRequest {
	pub query: String,
	#[serde(default)]
	pub top_k: Option<u32>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct SearchResponse {
	pub results: Vec<DocumentHit>,
}

impl PubgraphService {
	/// Cross-category document search. Queries every category index in
	/// canonical order, resolves hits to owning documents, and ranks by the
	/// per-document maximum effective score. `top_k` bounds the breadth of
	/// each index query, not the length of the result list.
	pub async fn search(&self, req: &SearchRequest) -> ServiceResult<SearchResponse> {
		let top_k = self.validated_top_k(req)?;
		let vector = self.embed_query(&req.query).await?;
		let mut agg = DocumentAggregator::new();

		for category in CATEGORIES {
			let collection = self.category_collection(category);
			let hits =
				self.collaborators.index.nearest(&collection, vector.clone(), top_k).await?;

			for hit in hits {
				let owners = self.collaborators.graph.item_owners(category, hit.item_id).await?;

				// Exact name matches use the raw query, untrimmed.
				let score = effective_score(hit.score, &hit.name, &req.query);
				let mut seen = HashSet::new();

				for owner in owners {
					if !seen.insert(owner.clone()) {
						continue;
					}

					agg.push(&owner, ItemMatch {
						category,
						name: hit.name.clone(),
						score,
					});
				}
			}
		}

		let results = agg.into_ranked();

		tracing::debug!(query = %req.query, count = results.len(), "Document search completed.");

		Ok(SearchResponse { results })
	}

	pub(crate) fn validated_top_k(&self, req: &SearchRequest) -> ServiceResult<u32> {
		if req.query.trim().is_empty() {
			return Err(ServiceError::InvalidRequest {
				message: "Query must be non-empty.".to_string(),
			});
		}

		match req.top_k {
			Some(0) => Err(ServiceError::InvalidRequest {
				message: "top_k must be greater than zero.".to_string(),
			}),
			Some(k) => Ok(k),
			None => Ok(self.cfg.search.default_top_k),
		}
	}
}
