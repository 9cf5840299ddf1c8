pub mod worker;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
	version = pubgraph_cli::VERSION,
	rename_all = "kebab",
	styles = pubgraph_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: std::path::PathBuf,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = pubgraph_config::load(&args.config)?;
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
	tracing_subscriber::fmt().with_env_filter(filter).init();

	let db = pubgraph_storage::db::Db::connect(&config.storage.postgres).await?;
	db.ensure_schema().await?;
	let qdrant = pubgraph_storage::qdrant::QdrantStore::new(&config.storage.qdrant)?;

	let state = worker::WorkerState {
		db,
		qdrant,
		embedding: config.providers.embedding,
		ingestion: config.ingestion,
	};

	worker::run_worker(state).await
}
