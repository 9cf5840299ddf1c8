use pubgraph_domain::Category;
use pubgraph_storage::documents as document_store;

use crate::{PubgraphService, ServiceError, ServiceResult};

#[derive(Debug, Clone, serde::Serialize)]
pub struct DocumentListItem {
	pub name: String,
	pub has_summary: bool,
}

/// A document paired with its stored summary text.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SummaryItem {
	pub name: String,
	pub summary: String,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct DocumentDetail {
	pub name: String,
	pub summary: Option<String>,
	pub text: String,
}

impl PubgraphService {
	pub async fn list_documents(&self) -> ServiceResult<Vec<DocumentListItem>> {
		let records = document_store::list_documents(&self.db.pool).await?;

		Ok(records
			.into_iter()
			.map(|record| DocumentListItem { name: record.name, has_summary: record.has_summary })
			.collect())
	}

	/// Only documents that actually carry a summary; the rest are omitted.
	pub async fn list_summaries(&self) -> ServiceResult<Vec<SummaryItem>> {
		let records = document_store::list_summaries(&self.db.pool).await?;

		Ok(records.into_iter().map(|(name, summary)| SummaryItem { name, summary }).collect())
	}

	pub async fn get_document(&self, name: &str) -> ServiceResult<DocumentDetail> {
		let record = document_store::document_by_name(&self.db.pool, name).await?.ok_or_else(
			|| ServiceError::NotFound { message: format!("Document {name:?} does not exist.") },
		)?;

		Ok(DocumentDetail { name: record.name, summary: record.summary, text: record.text })
	}

	pub async fn list_items(&self, category: &str) -> ServiceResult<Vec<String>> {
		let category = parse_category(category)?;

		Ok(document_store::list_items(&self.db.pool, category).await?)
	}

	pub async fn documents_for_item(
		&self,
		category: &str,
		name: &str,
	) -> ServiceResult<Vec<String>> {
		let category = parse_category(category)?;

		Ok(document_store::documents_for_item(&self.db.pool, category, name).await?)
	}
}

fn parse_category(value: &str) -> ServiceResult<Category> {
	Category::parse(value).ok_or_else(|| ServiceError::InvalidRequest {
		message: format!(
			"Unknown category {value:?}. Expected one of entity, organism, compound, or person."
		),
	})
}
