pub mod ask;
pub mod generate;
pub mod index;
pub mod retrieve;

mod error;

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::Value;

pub use ask::FALLBACK_ANSWER;
pub use error::{Error, Result};
pub use generate::SYSTEM_PROMPT;
pub use index::{IndexReport, stable_point_id};

use folio_config::{Config, EmbeddingProviderConfig, GenerationProviderConfig};
use folio_domain::{EmbeddingRecord, ScoredChunk};
use folio_providers::{embedding, generation};
use folio_storage::QdrantStore;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub type StoreResult<T> = std::result::Result<T, folio_storage::Error>;

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
	fn complete<'a>(
		&'a self,
		cfg: &'a GenerationProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, color_eyre::Result<String>>;
}

/// The vector collection as the service sees it. `QdrantStore` is the
/// production implementation; tests swap in an in-memory one.
pub trait VectorStore
where
	Self: Send + Sync,
{
	fn ensure_collection<'a>(&'a self) -> BoxFuture<'a, StoreResult<()>>;
	fn upsert<'a>(&'a self, records: &'a [EmbeddingRecord]) -> BoxFuture<'a, StoreResult<()>>;
	fn search<'a>(
		&'a self,
		vector: Vec<f32>,
		limit: u64,
	) -> BoxFuture<'a, StoreResult<Vec<ScoredChunk>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub generation: Arc<dyn GenerationProvider>,
}

pub struct FolioService {
	pub cfg: Config,
	pub store: Arc<dyn VectorStore>,
	pub providers: Providers,
}

struct DefaultProviders;

impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(embedding::embed(cfg, texts))
	}
}

impl GenerationProvider for DefaultProviders {
	fn complete<'a>(
		&'a self,
		cfg: &'a GenerationProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(generation::complete(cfg, messages))
	}
}

impl VectorStore for QdrantStore {
	fn ensure_collection<'a>(&'a self) -> BoxFuture<'a, StoreResult<()>> {
		Box::pin(QdrantStore::ensure_collection(self))
	}

	fn upsert<'a>(&'a self, records: &'a [EmbeddingRecord]) -> BoxFuture<'a, StoreResult<()>> {
		Box::pin(self.upsert_chunks(records))
	}

	fn search<'a>(
		&'a self,
		vector: Vec<f32>,
		limit: u64,
	) -> BoxFuture<'a, StoreResult<Vec<ScoredChunk>>> {
		Box::pin(self.search_chunks(vector, limit))
	}
}

impl Providers {
	pub fn new(embedding: Arc<dyn EmbeddingProvider>, generation: Arc<dyn GenerationProvider>) -> Self {
		Self { embedding, generation }
	}
}

impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);
		Self { embedding: provider.clone(), generation: provider }
	}
}

impl FolioService {
	pub fn new(cfg: Config, store: QdrantStore) -> Self {
		Self { cfg, store: Arc::new(store), providers: Providers::default() }
	}

	pub fn with_components(cfg: Config, store: Arc<dyn VectorStore>, providers: Providers) -> Self {
		Self { cfg, store, providers }
	}
}
