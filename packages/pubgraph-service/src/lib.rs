pub mod admin;
pub mod documents;
pub mod generate;
pub mod search;
pub mod sections;

mod error;

pub use admin::EnsureCollectionsReport;
pub use documents::{DocumentDetail, DocumentListItem, SummaryItem};
pub use error::{ServiceError, ServiceResult};
pub use generate::GenerateResponse;
pub use search::{SearchRequest, SearchResponse};
pub use sections::SectionSearchResponse;

use std::{future::Future, pin::Pin, sync::Arc};

use qdrant_client::qdrant::{ScoredPoint, point_id::PointIdOptions, value::Kind};
use uuid::Uuid;

use pubgraph_config::{Config, EmbeddingProviderConfig, GenerationProviderConfig};
use pubgraph_domain::Category;
use pubgraph_providers::{embedding, generation};
use pubgraph_storage::{
	db::Db,
	documents as document_store,
	qdrant::{QdrantStore, is_missing_collection_error},
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One raw similarity hit, before mention resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexHit {
	pub item_id: Uuid,
	pub name: String,
	pub score: f32,
}

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>>;
}

pub trait GenerationProvider
where
	Self: Send + Sync,
{
	/// One prompt in, the assistant's answer out.
	fn complete<'a>(
		&'a self,
		cfg: &'a GenerationProviderConfig,
		prompt: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<String>>;
}

pub trait SimilarityIndex
where
	Self: Send + Sync,
{
	/// Top-k hits from one collection, best first. A missing collection is
	/// `ServiceError::IndexUnavailable`, never an empty result.
	fn nearest<'a>(
		&'a self,
		collection: &'a str,
		vector: Vec<f32>,
		k: u32,
	) -> BoxFuture<'a, ServiceResult<Vec<IndexHit>>>;
}

pub trait MentionGraph
where
	Self: Send + Sync,
{
	/// Owning document names for an indexed item. Empty when the item row is
	/// gone, which search treats as an orphaned index entry.
	fn item_owners<'a>(
		&'a self,
		category: Category,
		item_id: Uuid,
	) -> BoxFuture<'a, ServiceResult<Vec<String>>>;

	/// Owning document name and section text for a section hit.
	fn section_owner<'a>(
		&'a self,
		section_id: Uuid,
	) -> BoxFuture<'a, ServiceResult<Option<(String, String)>>>;
}

#[derive(Clone)]
pub struct Collaborators {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub generation: Arc<dyn GenerationProvider>,
	pub index: Arc<dyn SimilarityIndex>,
	pub graph: Arc<dyn MentionGraph>,
}
impl Collaborators {
	pub fn new(
		embedding: Arc<dyn EmbeddingProvider>,
		generation: Arc<dyn GenerationProvider>,
		index: Arc<dyn SimilarityIndex>,
		graph: Arc<dyn MentionGraph>,
	) -> Self {
		Self { embedding, generation, index, graph }
	}

	pub fn production(db: &Db, qdrant: Arc<QdrantStore>) -> Self {
		Self {
			embedding: Arc::new(DefaultEmbedding),
			generation: Arc::new(DefaultGeneration),
			index: Arc::new(QdrantIndex { store: qdrant }),
			graph: Arc::new(PgMentionGraph { pool: db.pool.clone() }),
		}
	}
}

pub struct PubgraphService {
	pub cfg: Config,
	pub db: Db,
	pub qdrant: Arc<QdrantStore>,
	pub collaborators: Collaborators,
}
impl PubgraphService {
	pub fn new(cfg: Config, db: Db, qdrant: QdrantStore) -> Self {
		let qdrant = Arc::new(qdrant);
		let collaborators = Collaborators::production(&db, qdrant.clone());

		Self { cfg, db, qdrant, collaborators }
	}

	pub fn with_collaborators(
		cfg: Config,
		db: Db,
		qdrant: QdrantStore,
		collaborators: Collaborators,
	) -> Self {
		Self { cfg, db, qdrant: Arc::new(qdrant), collaborators }
	}

	pub(crate) fn category_collection(&self, category: Category) -> String {
		format!("{}_{}", self.cfg.storage.qdrant.collection_prefix, category.collection_suffix())
	}

	pub(crate) fn sections_collection(&self) -> String {
		format!("{}_sections", self.cfg.storage.qdrant.collection_prefix)
	}

	pub(crate) async fn embed_query(&self, query: &str) -> ServiceResult<Vec<f32>> {
		let embeddings = self
			.collaborators
			.embedding
			.embed(&self.cfg.providers.embedding, &[query.to_string()])
			.await?;
		let Some(vector) = embeddings.into_iter().next() else {
			return Err(ServiceError::Provider {
				message: "Embedding provider returned no vectors.".to_string(),
			});
		};

		if vector.len() != self.cfg.storage.qdrant.vector_dim as usize {
			return Err(ServiceError::Provider {
				message: "Embedding vector dimension mismatch.".to_string(),
			});
		}

		Ok(vector)
	}
}

struct DefaultEmbedding;

impl EmbeddingProvider for DefaultEmbedding {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(embedding::embed(cfg, texts))
	}
}

struct DefaultGeneration;

impl GenerationProvider for DefaultGeneration {
	fn complete<'a>(
		&'a self,
		cfg: &'a GenerationProviderConfig,
		prompt: &'a str,
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(generation::complete(cfg, prompt))
	}
}

struct QdrantIndex {
	store: Arc<QdrantStore>,
}

impl SimilarityIndex for QdrantIndex {
	fn nearest<'a>(
		&'a self,
		collection: &'a str,
		vector: Vec<f32>,
		k: u32,
	) -> BoxFuture<'a, ServiceResult<Vec<IndexHit>>> {
		Box::pin(async move {
			let points =
				self.store.nearest(collection, vector, k).await.map_err(|err| match err {
					pubgraph_storage::Error::Qdrant(inner)
						if is_missing_collection_error(&inner) =>
						ServiceError::IndexUnavailable { collection: collection.to_string() },
					other => ServiceError::from(other),
				})?;
			let mut hits = Vec::with_capacity(points.len());

			for point in points {
				// Points without a UUID id or a name payload are malformed
				// index entries; skip them like any other orphan.
				let Some(item_id) = point_uuid(&point) else {
					continue;
				};
				let name = point_name(&point).unwrap_or_default();

				hits.push(IndexHit { item_id, name, score: point.score });
			}

			Ok(hits)
		})
	}
}

struct PgMentionGraph {
	pool: sqlx::PgPool,
}

impl MentionGraph for PgMentionGraph {
	fn item_owners<'a>(
		&'a self,
		category: Category,
		item_id: Uuid,
	) -> BoxFuture<'a, ServiceResult<Vec<String>>> {
		Box::pin(async move {
			Ok(document_store::mention_owner_names(&self.pool, item_id, category.mention_kinds())
				.await?)
		})
	}

	fn section_owner<'a>(
		&'a self,
		section_id: Uuid,
	) -> BoxFuture<'a, ServiceResult<Option<(String, String)>>> {
		Box::pin(async move { Ok(document_store::section_owner(&self.pool, section_id).await?) })
	}
}

fn point_uuid(point: &ScoredPoint) -> Option<Uuid> {
	match point.id.as_ref()?.point_id_options.as_ref()? {
		PointIdOptions::Uuid(raw) => Uuid::parse_str(raw).ok(),
		PointIdOptions::Num(_) => None,
	}
}

fn point_name(point: &ScoredPoint) -> Option<String> {
	match point.payload.get("name")?.kind.as_ref()? {
		Kind::StringValue(name) => Some(name.clone()),
		_ => None,
	}
}
