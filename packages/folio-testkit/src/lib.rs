//! In-process doubles for the vector store and the remote providers, plus a
//! ready-made config. Everything here is deterministic so tests can assert
//! on exact ranking and call counts.

use std::{
	cmp::Ordering,
	collections::BTreeMap,
	sync::Mutex,
};

use color_eyre::eyre;
use serde_json::{Map, Value};

use folio_config::{
	Ask, Config, EmbeddingProviderConfig, GenerationProviderConfig, Index, Providers, Qdrant,
	Service, Storage,
};
use folio_domain::{EmbeddingRecord, ScoredChunk};
use folio_service::{BoxFuture, EmbeddingProvider, GenerationProvider, StoreResult, VectorStore};

pub const TEST_VECTOR_DIM: usize = 8;

/// A `VectorStore` holding points in a `BTreeMap`, scored by real cosine
/// similarity.
#[derive(Default)]
pub struct MemoryStore {
	points: Mutex<BTreeMap<u64, EmbeddingRecord>>,
}
impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.points.lock().expect("Memory store lock poisoned.").len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn point_ids(&self) -> Vec<u64> {
		self.points.lock().expect("Memory store lock poisoned.").keys().copied().collect()
	}
}
impl VectorStore for MemoryStore {
	fn ensure_collection<'a>(&'a self) -> BoxFuture<'a, StoreResult<()>> {
		Box::pin(async { Ok(()) })
	}

	fn upsert<'a>(&'a self, records: &'a [EmbeddingRecord]) -> BoxFuture<'a, StoreResult<()>> {
		Box::pin(async move {
			let mut points = self.points.lock().expect("Memory store lock poisoned.");

			for record in records {
				points.insert(record.id, record.clone());
			}

			Ok(())
		})
	}

	fn search<'a>(
		&'a self,
		vector: Vec<f32>,
		limit: u64,
	) -> BoxFuture<'a, StoreResult<Vec<ScoredChunk>>> {
		Box::pin(async move {
			let points = self.points.lock().expect("Memory store lock poisoned.");
			let mut hits: Vec<ScoredChunk> = points
				.values()
				.map(|record| ScoredChunk {
					score: cosine_similarity(&vector, &record.vector),
					payload: record.payload.clone(),
				})
				.collect();

			hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
			hits.truncate(limit as usize);

			Ok(hits)
		})
	}
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
	let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
	let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
	let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

	if norm_a == 0.0 || norm_b == 0.0 { 0.0 } else { dot / (norm_a * norm_b) }
}

/// Deterministic pseudo-embedding for a text. Equal texts always embed to
/// the same vector, so querying with an indexed text ranks it first.
pub fn vector_for(text: &str, dimensions: usize) -> Vec<f32> {
	let mut state = 0x9E37_79B9u32;

	for byte in text.bytes() {
		state = state.wrapping_mul(31).wrapping_add(u32::from(byte));
	}

	(0..dimensions)
		.map(|_| {
			state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);

			((state >> 16) & 0xFFFF) as f32 / 65_536.0 + 0.01
		})
		.collect()
}

/// Embedding provider that derives vectors from the text itself and records
/// every batch it is asked to embed.
pub struct ScriptedEmbedding {
	pub dimensions: usize,
	calls: Mutex<Vec<Vec<String>>>,
}
impl ScriptedEmbedding {
	pub fn new(dimensions: usize) -> Self {
		Self { dimensions, calls: Mutex::new(Vec::new()) }
	}

	pub fn calls(&self) -> Vec<Vec<String>> {
		self.calls.lock().expect("Embedding call log poisoned.").clone()
	}

	pub fn embedded_texts(&self) -> Vec<String> {
		self.calls().into_iter().flatten().collect()
	}

	pub fn vector_for(&self, text: &str) -> Vec<f32> {
		vector_for(text, self.dimensions)
	}
}
impl EmbeddingProvider for ScriptedEmbedding {
	fn embed<'a>(
		&'a self,
		_cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(async move {
			self.calls.lock().expect("Embedding call log poisoned.").push(texts.to_vec());

			Ok(texts.iter().map(|text| vector_for(text, self.dimensions)).collect())
		})
	}
}

/// Embedding provider that always fails, for error-path tests.
pub struct FailingEmbedding;
impl EmbeddingProvider for FailingEmbedding {
	fn embed<'a>(
		&'a self,
		_cfg: &'a EmbeddingProviderConfig,
		_texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(async { Err(eyre::eyre!("Embedding provider unavailable.")) })
	}
}

/// Generation provider returning a canned answer and recording every message
/// payload it receives.
pub struct RecordingGeneration {
	pub answer: String,
	calls: Mutex<Vec<Vec<Value>>>,
}
impl RecordingGeneration {
	pub fn new(answer: &str) -> Self {
		Self { answer: answer.to_string(), calls: Mutex::new(Vec::new()) }
	}

	pub fn calls(&self) -> Vec<Vec<Value>> {
		self.calls.lock().expect("Generation call log poisoned.").clone()
	}
}
impl GenerationProvider for RecordingGeneration {
	fn complete<'a>(
		&'a self,
		_cfg: &'a GenerationProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(async move {
			self.calls.lock().expect("Generation call log poisoned.").push(messages.to_vec());

			Ok(self.answer.clone())
		})
	}
}

/// A config wired for in-process tests; no real endpoint is ever contacted.
pub fn test_config(data_dir: &str) -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:0".to_string(),
			log_level: "info".to_string(),
		},
		storage: Storage {
			data_dir: data_dir.to_string(),
			qdrant: Qdrant {
				url: "http://127.0.0.1:6334".to_string(),
				collection: "portfolio_chunks_test".to_string(),
				vector_dim: TEST_VECTOR_DIM as u32,
			},
		},
		providers: Providers {
			embedding: EmbeddingProviderConfig {
				api_base: "http://embedding.test".to_string(),
				api_key: "test-key".to_string(),
				path: "/v1/embeddings".to_string(),
				model: "test-embed".to_string(),
				dimensions: TEST_VECTOR_DIM as u32,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
			generation: GenerationProviderConfig {
				api_base: "http://generation.test".to_string(),
				api_key: "test-key".to_string(),
				path: "/v1/chat/completions".to_string(),
				model: "test-chat".to_string(),
				temperature: 0.3,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
		},
		ask: Ask::default(),
		index: Index::default(),
	}
}
