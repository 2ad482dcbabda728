use clap::Parser;
use tracing_subscriber::EnvFilter;

pub mod indexer;

#[derive(Debug, Parser)]
#[command(
	version = folio_cli::VERSION,
	rename_all = "kebab",
	styles = folio_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: std::path::PathBuf,
	/// Normalize the saved profile and write the chunk snapshot without
	/// embedding or touching the vector collection.
	#[arg(long)]
	pub normalize_only: bool,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = folio_config::load(&args.config)?;
	let filter = EnvFilter::new(config.service.log_level.clone());
	tracing_subscriber::fmt().with_env_filter(filter).init();

	indexer::run_indexer(config, args.normalize_only).await
}
