use std::sync::Arc;

use folio_service::FolioService;
use folio_storage::{ProfileStore, QdrantStore};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<FolioService>,
	pub profiles: Arc<ProfileStore>,
}
impl AppState {
	pub fn new(config: folio_config::Config) -> color_eyre::Result<Self> {
		let profiles = ProfileStore::new(config.storage.data_dir.clone());
		let qdrant = QdrantStore::new(&config.storage.qdrant)?;
		let service = FolioService::new(config, qdrant);

		Ok(Self { service: Arc::new(service), profiles: Arc::new(profiles) })
	}

	pub fn with_service(service: FolioService, profiles: ProfileStore) -> Self {
		Self { service: Arc::new(service), profiles: Arc::new(profiles) }
	}
}
