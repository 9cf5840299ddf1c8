use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = pubgraph_worker::Args::parse();
	pubgraph_worker::run(args).await
}
