use std::sync::Arc;

use pubgraph_service::PubgraphService;
use pubgraph_storage::{db::Db, qdrant::QdrantStore};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<PubgraphService>,
}
impl AppState {
	pub async fn new(config: pubgraph_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let qdrant = QdrantStore::new(&config.storage.qdrant)?;
		let service = PubgraphService::new(config, db, qdrant);

		Ok(Self { service: Arc::new(service) })
	}
}
