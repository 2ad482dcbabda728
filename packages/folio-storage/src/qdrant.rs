use std::collections::HashMap;

use qdrant_client::{
	Payload,
	qdrant::{
		CreateCollectionBuilder, Distance, PointStruct, Query, QueryPointsBuilder, ScoredPoint,
		UpsertPointsBuilder, Value, VectorParamsBuilder, value::Kind,
	},
};
use serde_json::Value as JsonValue;

use folio_domain::{ChunkPayload, EmbeddingRecord, ScoredChunk};

use crate::{Error, Result};

pub struct QdrantStore {
	pub client: qdrant_client::Qdrant,
	pub collection: String,
	pub vector_dim: u32,
}
impl QdrantStore {
	pub fn new(cfg: &folio_config::Qdrant) -> Result<Self> {
		let client = qdrant_client::Qdrant::from_url(&cfg.url).build()?;

		Ok(Self { client, collection: cfg.collection.clone(), vector_dim: cfg.vector_dim })
	}

	/// Creates the chunk collection if it does not exist yet. A concurrent
	/// indexing run can win the creation race; that conflict is not an error.
	pub async fn ensure_collection(&self) -> Result<()> {
		if self.client.collection_exists(&self.collection).await.map_err(classify)? {
			return Ok(());
		}

		let create = CreateCollectionBuilder::new(self.collection.clone())
			.vectors_config(VectorParamsBuilder::new(u64::from(self.vector_dim), Distance::Cosine));

		match self.client.create_collection(create).await {
			Ok(_) => Ok(()),
			Err(err) => match classify(err) {
				Error::Conflict(_) => Ok(()),
				err => Err(err),
			},
		}
	}

	pub async fn upsert_chunks(&self, records: &[EmbeddingRecord]) -> Result<()> {
		if records.is_empty() {
			return Ok(());
		}

		let mut points = Vec::with_capacity(records.len());

		for record in records {
			points.push(PointStruct::new(
				record.id,
				record.vector.clone(),
				payload_from(&record.payload),
			));
		}

		let upsert = UpsertPointsBuilder::new(self.collection.clone(), points).wait(true);

		self.client.upsert_points(upsert).await.map_err(classify)?;

		Ok(())
	}

	pub async fn search_chunks(&self, vector: Vec<f32>, limit: u64) -> Result<Vec<ScoredChunk>> {
		let search = QueryPointsBuilder::new(self.collection.clone())
			.query(Query::new_nearest(vector))
			.limit(limit)
			.with_payload(true);
		let response = self.client.query(search).await.map_err(classify)?;

		response.result.iter().map(payload_to_chunk).collect()
	}
}

fn payload_from(payload: &ChunkPayload) -> Payload {
	let mut map = HashMap::new();

	map.insert("chunkId".to_string(), Value::from(payload.chunk_id.clone()));
	map.insert("chunkType".to_string(), Value::from(payload.chunk_type.as_str().to_string()));
	map.insert("source".to_string(), Value::from(payload.source.clone()));
	map.insert("title".to_string(), Value::from(payload.title.clone()));
	map.insert("tags".to_string(), Value::from(JsonValue::from(payload.tags.clone())));
	map.insert("text".to_string(), Value::from(payload.text.clone()));
	map.insert("meta".to_string(), Value::from(JsonValue::Object(payload.meta.clone())));

	Payload::from(map)
}

fn payload_to_chunk(point: &ScoredPoint) -> Result<ScoredChunk> {
	let mut map = serde_json::Map::new();

	for (key, value) in &point.payload {
		map.insert(key.clone(), kind_to_json(value));
	}

	let payload: ChunkPayload = serde_json::from_value(JsonValue::Object(map))?;

	Ok(ScoredChunk { score: point.score, payload })
}

fn kind_to_json(value: &Value) -> JsonValue {
	match &value.kind {
		None | Some(Kind::NullValue(_)) => JsonValue::Null,
		Some(Kind::BoolValue(flag)) => JsonValue::Bool(*flag),
		Some(Kind::IntegerValue(number)) => JsonValue::from(*number),
		Some(Kind::DoubleValue(number)) => {
			serde_json::Number::from_f64(*number).map(JsonValue::Number).unwrap_or(JsonValue::Null)
		},
		Some(Kind::StringValue(text)) => JsonValue::String(text.clone()),
		Some(Kind::ListValue(list)) => {
			JsonValue::Array(list.values.iter().map(kind_to_json).collect())
		},
		Some(Kind::StructValue(nested)) => JsonValue::Object(
			nested.fields.iter().map(|(key, value)| (key.clone(), kind_to_json(value))).collect(),
		),
	}
}

/// Qdrant surfaces HTTP-ish failures as opaque messages; this is the single
/// place that maps them onto typed storage errors.
fn classify(err: qdrant_client::QdrantError) -> Error {
	let message = err.to_string().to_lowercase();

	if message.contains("already exists") || message.contains("409") {
		return Error::Conflict(err.to_string());
	}
	if message.contains("not found") || message.contains("404") {
		return Error::NotFound(err.to_string());
	}

	Error::from(err)
}
