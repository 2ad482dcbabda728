use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;

/// Section a chunk was derived from; serialized names double as id prefixes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChunkType {
	Meta,
	MetaAudit,
	Identity,
	Contact,
	Social,
	Bio,
	CareerPreference,
	Interest,
	Education,
	Achievement,
	Stat,
	Experience,
	Project,
	Skill,
}
impl ChunkType {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Meta => "meta",
			Self::MetaAudit => "metaAudit",
			Self::Identity => "identity",
			Self::Contact => "contact",
			Self::Social => "social",
			Self::Bio => "bio",
			Self::CareerPreference => "careerPreference",
			Self::Interest => "interest",
			Self::Education => "education",
			Self::Achievement => "achievement",
			Self::Stat => "stat",
			Self::Experience => "experience",
			Self::Project => "project",
			Self::Skill => "skill",
		}
	}
}

/// One self-contained unit of first-person text derived from a profile
/// section. Read-only once the normalizer has produced it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
	pub id: String,
	pub chunk_type: ChunkType,
	pub source: String,
	pub title: String,
	#[serde(default)]
	pub tags: Vec<String>,
	pub text: String,
	#[serde(default)]
	pub meta: Map<String, Value>,
	#[serde(default = "default_should_embed")]
	pub should_embed: bool,
}

fn default_should_embed() -> bool {
	true
}

/// The normalizer's persisted output: every chunk in traversal order plus
/// the generation timestamp and count.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedChunks {
	#[serde(with = "time::serde::rfc3339")]
	pub generated_at: OffsetDateTime,
	pub count: usize,
	pub chunks: Vec<Chunk>,
}

/// Chunk fields stored as the vector point payload. `shouldEmbed` is
/// dropped: everything in the collection was embedded by definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkPayload {
	pub chunk_id: String,
	pub chunk_type: ChunkType,
	pub source: String,
	pub title: String,
	pub tags: Vec<String>,
	pub text: String,
	pub meta: Map<String, Value>,
}
impl From<&Chunk> for ChunkPayload {
	fn from(chunk: &Chunk) -> Self {
		Self {
			chunk_id: chunk.id.clone(),
			chunk_type: chunk.chunk_type,
			source: chunk.source.clone(),
			title: chunk.title.clone(),
			tags: chunk.tags.clone(),
			text: chunk.text.clone(),
			meta: chunk.meta.clone(),
		}
	}
}

/// A point ready for upsert: stable numeric id, embedding vector, payload.
#[derive(Clone, Debug, PartialEq)]
pub struct EmbeddingRecord {
	pub id: u64,
	pub vector: Vec<f32>,
	pub payload: ChunkPayload,
}

/// A raw similarity hit from the vector collection.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredChunk {
	pub score: f32,
	pub payload: ChunkPayload,
}

/// Per-query projection of a hit handed to the generator; never persisted.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievedContext {
	pub score: f32,
	pub text: String,
	pub title: String,
	pub chunk_type: ChunkType,
}
impl From<ScoredChunk> for RetrievedContext {
	fn from(hit: ScoredChunk) -> Self {
		Self {
			score: hit.score,
			text: hit.payload.text,
			title: hit.payload.title,
			chunk_type: hit.payload.chunk_type,
		}
	}
}
