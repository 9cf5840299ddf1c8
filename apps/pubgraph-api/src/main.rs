use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = pubgraph_api::Args::parse();
	pubgraph_api::run(args).await
}
