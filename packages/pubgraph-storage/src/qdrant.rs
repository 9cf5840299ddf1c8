use qdrant_client::qdrant::{
	Condition, CreateCollectionBuilder, DeletePointsBuilder, Distance, Filter, PointStruct, Query,
	QueryPointsBuilder, ScoredPoint, UpsertPointsBuilder, VectorParamsBuilder,
};

use pubgraph_domain::{CATEGORIES, Category};

use crate::Result;

pub const SECTIONS_SUFFIX: &str = "sections";

pub struct QdrantStore {
	pub client: qdrant_client::Qdrant,
	pub collection_prefix: String,
	pub vector_dim: u32,
}
impl QdrantStore {
	pub fn new(cfg: &pubgraph_config::Qdrant) -> Result<Self> {
		let client = qdrant_client::Qdrant::from_url(&cfg.url).build()?;

		Ok(Self {
			client,
			collection_prefix: cfg.collection_prefix.clone(),
			vector_dim: cfg.vector_dim,
		})
	}

	pub fn collection_name(&self, suffix: &str) -> String {
		format!("{}_{suffix}", self.collection_prefix)
	}

	pub fn category_collection(&self, category: Category) -> String {
		self.collection_name(category.collection_suffix())
	}

	pub fn sections_collection(&self) -> String {
		self.collection_name(SECTIONS_SUFFIX)
	}

	/// Creates the per-category collections plus the sections collection if
	/// missing. Search never creates collections implicitly.
	pub async fn ensure_collections(&self) -> Result<Vec<String>> {
		let mut created = Vec::new();
		let suffixes = CATEGORIES
			.iter()
			.map(|category| category.collection_suffix())
			.chain(std::iter::once(SECTIONS_SUFFIX));

		for suffix in suffixes {
			let collection = self.collection_name(suffix);

			if self.client.collection_exists(collection.clone()).await? {
				continue;
			}

			let builder = CreateCollectionBuilder::new(collection.clone()).vectors_config(
				VectorParamsBuilder::new(self.vector_dim as u64, Distance::Cosine),
			);

			self.client.create_collection(builder).await?;
			created.push(collection);
		}

		Ok(created)
	}

	/// Top-k nearest points by cosine similarity, best first.
	pub async fn nearest(
		&self,
		collection: &str,
		vector: Vec<f32>,
		k: u32,
	) -> Result<Vec<ScoredPoint>> {
		let search = QueryPointsBuilder::new(collection.to_string())
			.query(Query::new_nearest(vector))
			.with_payload(true)
			.limit(k as u64);
		let response = self.client.query(search).await?;

		Ok(response.result)
	}

	pub async fn upsert_points(&self, collection: &str, points: Vec<PointStruct>) -> Result<()> {
		let upsert = UpsertPointsBuilder::new(collection.to_string(), points).wait(true);

		self.client.upsert_points(upsert).await?;

		Ok(())
	}

	pub async fn delete_document_points(&self, collection: &str, document_id: &str) -> Result<()> {
		let filter = Filter::must([Condition::matches("document_id", document_id.to_string())]);
		let delete = DeletePointsBuilder::new(collection.to_string()).points(filter).wait(true);

		self.client.delete_points(delete).await?;

		Ok(())
	}
}

/// Qdrant reports a query against a missing collection as a plain error.
/// Callers use this to tell an absent index apart from other failures.
pub fn is_missing_collection_error(err: &qdrant_client::QdrantError) -> bool {
	let message = err.to_string().to_lowercase();

	(message.contains("collection") && message.contains("not found"))
		|| message.contains("doesn't exist")
		|| message.contains("does not exist")
}
