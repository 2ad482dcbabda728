use std::sync::Arc;

use serde_json::Map;

use folio_domain::{Chunk, ChunkType};
use folio_service::{Error, FALLBACK_ANSWER, FolioService, Providers, stable_point_id};
use folio_testkit::{
	MemoryStore, RecordingGeneration, ScriptedEmbedding, TEST_VECTOR_DIM, test_config,
};

struct Harness {
	service: FolioService,
	store: Arc<MemoryStore>,
	embedding: Arc<ScriptedEmbedding>,
	generation: Arc<RecordingGeneration>,
}

fn harness() -> Harness {
	harness_with(test_config("./data-test"))
}

fn harness_with(cfg: folio_config::Config) -> Harness {
	let store = Arc::new(MemoryStore::new());
	let embedding = Arc::new(ScriptedEmbedding::new(TEST_VECTOR_DIM));
	let generation = Arc::new(RecordingGeneration::new("A canned answer."));
	let providers = Providers::new(embedding.clone(), generation.clone());
	let service = FolioService::with_components(cfg, store.clone(), providers);

	Harness { service, store, embedding, generation }
}

fn chunk(id: &str, text: &str, should_embed: bool) -> Chunk {
	Chunk {
		id: id.to_string(),
		chunk_type: ChunkType::Skill,
		source: "skills".to_string(),
		title: id.to_string(),
		tags: Vec::new(),
		text: text.to_string(),
		meta: Map::new(),
		should_embed,
	}
}

#[tokio::test]
async fn empty_store_answers_with_fallback_and_skips_generation() {
	let harness = harness();
	let answer = harness.service.ask("What did you build?").await.expect("ask failed");

	assert_eq!(answer, FALLBACK_ANSWER);
	assert!(harness.generation.calls().is_empty());
}

#[tokio::test]
async fn display_only_chunks_are_never_embedded() {
	let harness = harness();
	let chunks = vec![
		chunk("skill-languages", "I am proficient in Rust.", true),
		chunk("social-profiles", "I maintain profiles on several platforms.", false),
	];
	let report = harness.service.index_chunks(&chunks).await.expect("index failed");

	assert_eq!(report.total, 2);
	assert_eq!(report.embedded, 1);
	assert_eq!(report.skipped, 1);
	assert_eq!(harness.store.len(), 1);
	assert_eq!(
		harness.embedding.embedded_texts(),
		vec!["I am proficient in Rust.".to_string()]
	);
}

#[tokio::test]
async fn reindexing_the_same_chunks_keeps_one_point_per_chunk() {
	let harness = harness();
	let chunks = vec![
		chunk("skill-languages", "I am proficient in Rust.", true),
		chunk("project-chatapp-live", "I built ChatApp.", true),
	];

	harness.service.index_chunks(&chunks).await.expect("first index failed");

	let first_ids = harness.store.point_ids();

	harness.service.index_chunks(&chunks).await.expect("second index failed");

	assert_eq!(harness.store.len(), 2);
	assert_eq!(harness.store.point_ids(), first_ids);
	assert!(first_ids.contains(&stable_point_id("skill-languages")));
}

#[tokio::test]
async fn retrieval_ranks_the_matching_chunk_first() {
	let harness = harness();
	let chunks = vec![
		chunk("skill-languages", "I am proficient in Rust.", true),
		chunk("project-chatapp-live", "I built ChatApp, a messaging tool.", true),
	];

	harness.service.index_chunks(&chunks).await.expect("index failed");

	let contexts = harness
		.service
		.retrieve_context("I built ChatApp, a messaging tool.", 2)
		.await
		.expect("retrieve failed");

	assert_eq!(contexts.len(), 2);
	assert_eq!(contexts[0].text, "I built ChatApp, a messaging tool.");
	assert!(contexts[0].score >= contexts[1].score);
}

#[tokio::test]
async fn colliding_chunk_ids_fail_the_indexing_run() {
	let harness = harness();
	// "Aa" and "BB" hash to the same 32-bit value.
	let chunks = vec![chunk("Aa", "first", true), chunk("BB", "second", true)];
	let err = harness.service.index_chunks(&chunks).await.expect_err("expected collision");

	assert!(matches!(err, Error::IdCollision { .. }), "unexpected error: {err}");
	assert!(harness.store.is_empty());
}

#[tokio::test]
async fn embedding_runs_in_configured_batches() {
	let mut cfg = test_config("./data-test");

	cfg.index.embed_batch_size = 2;

	let harness = harness_with(cfg);
	let chunks: Vec<Chunk> = (0..5)
		.map(|index| chunk(&format!("skill-{index}"), &format!("I know skill {index}."), true))
		.collect();

	harness.service.index_chunks(&chunks).await.expect("index failed");

	let calls = harness.embedding.calls();

	assert_eq!(calls.iter().map(Vec::len).collect::<Vec<_>>(), vec![2, 2, 1]);
	assert_eq!(harness.store.len(), 5);
}

#[tokio::test]
async fn ask_grounds_the_generation_call_in_retrieved_context() {
	let harness = harness();
	let chunks = vec![chunk("project-chatapp-live", "I built ChatApp, a messaging tool.", true)];

	harness.service.index_chunks(&chunks).await.expect("index failed");

	let answer = harness.service.ask("What did you build?").await.expect("ask failed");

	assert_eq!(answer, "A canned answer.");

	let calls = harness.generation.calls();

	assert_eq!(calls.len(), 1);

	let user = calls[0][1]["content"].as_str().expect("user content missing");

	assert!(user.contains("I built ChatApp, a messaging tool."));
	assert!(user.contains("Question:\nWhat did you build?"));
}

#[tokio::test]
async fn normalized_profile_round_trips_through_the_pipeline() {
	let profile: folio_domain::Profile = serde_json::from_value(serde_json::json!({
		"personalInfo": { "name": "Asha", "title": "Backend Engineer" },
		"projects": [{
			"name": "ChatApp",
			"status": "live",
			"description": "ChatApp is a real-time messaging tool",
			"techStack": ["Rust"],
			"features": ["presence"],
		}],
	}))
	.expect("profile failed to parse");
	let normalized = folio_normalize::normalize_profile(
		&profile,
		time::macros::datetime!(2025-12-27 12:00 UTC),
	);
	let harness = harness();
	let report = harness.service.index_chunks(&normalized.chunks).await.expect("index failed");

	assert_eq!(report.total, normalized.count);
	assert!(report.embedded > 0);

	let answer = harness.service.ask("Tell me about ChatApp").await.expect("ask failed");

	assert_eq!(answer, "A canned answer.");
}
