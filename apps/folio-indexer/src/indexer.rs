//! One indexing run: load the saved profile, normalize it, persist the chunk
//! snapshot, then embed and upsert the embeddable chunks.

use time::OffsetDateTime;

use folio_config::Config;
use folio_service::FolioService;
use folio_storage::{ProfileStore, QdrantStore};

pub async fn run_indexer(config: Config, normalize_only: bool) -> color_eyre::Result<()> {
	let profiles = ProfileStore::new(config.storage.data_dir.clone());
	let profile = profiles.load_latest()?;
	let normalized = folio_normalize::normalize_profile(&profile, OffsetDateTime::now_utc());

	profiles.save_normalized(&normalized)?;
	tracing::info!(count = normalized.count, "Normalized profile into chunks.");

	if normalize_only {
		return Ok(());
	}

	let qdrant = QdrantStore::new(&config.storage.qdrant)?;
	let service = FolioService::new(config, qdrant);
	let report = service.index_chunks(&normalized.chunks).await?;

	tracing::info!(
		total = report.total,
		embedded = report.embedded,
		skipped = report.skipped,
		"Indexing finished."
	);

	Ok(())
}
