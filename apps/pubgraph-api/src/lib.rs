pub mod routes;
pub mod state;

use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;
use color_eyre::eyre;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[derive(Debug, Parser)]
#[command(
	version = pubgraph_cli::VERSION,
	rename_all = "kebab",
	styles = pubgraph_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = pubgraph_config::load(&args.config)?;

	init_tracing(&config.service.log_level);

	let search_addr: SocketAddr = config.service.http_bind.parse()?;
	let admin_addr: SocketAddr = config.service.admin_bind.parse()?;

	// The admin surface creates vector collections; it never leaves the host.
	if !admin_addr.ip().is_loopback() {
		return Err(eyre::eyre!("admin_bind must be a loopback address."));
	}

	let state = AppState::new(config).await?;
	let search_listener = TcpListener::bind(search_addr).await?;
	let admin_listener = TcpListener::bind(admin_addr).await?;

	tracing::info!(%search_addr, %admin_addr, "Pubgraph API listening.");

	tokio::try_join!(
		axum::serve(search_listener, routes::router(state.clone())),
		axum::serve(admin_listener, routes::admin_router(state)),
	)?;

	Ok(())
}

fn init_tracing(log_level: &str) {
	let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();
}
