use crate::{PubgraphService, ServiceResult};

#[derive(Debug, Clone, serde::Serialize)]
pub struct EnsureCollectionsReport {
	pub created: Vec<String>,
}

impl PubgraphService {
	/// Creates any missing vector collections. Search itself never creates
	/// collections; an absent index fails the request instead.
	pub async fn ensure_collections(&self) -> ServiceResult<EnsureCollectionsReport> {
		let created = self.qdrant.ensure_collections().await?;

		if !created.is_empty() {
			tracing::info!(created = ?created, "Created missing vector collections.");
		}

		Ok(EnsureCollectionsReport { created })
	}
}
