use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = folio_indexer::Args::parse();
	folio_indexer::run(args).await
}
