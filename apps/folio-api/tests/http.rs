use std::{
	env, fs,
	path::PathBuf,
	sync::{
		Arc,
		atomic::{AtomicU64, Ordering},
	},
	time::{SystemTime, UNIX_EPOCH},
};

use axum::{
	body::{self, Body},
	http::{Request, StatusCode, header},
};
use serde_json::Value;
use tower::util::ServiceExt;

use folio_api::{routes, state::AppState};
use folio_service::{FALLBACK_ANSWER, FolioService, Providers};
use folio_storage::ProfileStore;
use folio_testkit::{
	MemoryStore, RecordingGeneration, ScriptedEmbedding, TEST_VECTOR_DIM, test_config,
};

struct TestApp {
	router: axum::Router,
	generation: Arc<RecordingGeneration>,
	data_dir: PathBuf,
}

fn temp_data_dir() -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("folio_api_test_{nanos}_{pid}_{ordinal}"));

	path
}

async fn test_app(preload: &[(&str, &str)]) -> TestApp {
	let data_dir = temp_data_dir();
	let cfg = test_config(data_dir.to_str().expect("temp dir must be valid UTF-8"));
	let store = Arc::new(MemoryStore::new());
	let embedding = Arc::new(ScriptedEmbedding::new(TEST_VECTOR_DIM));
	let generation = Arc::new(RecordingGeneration::new("A grounded answer."));
	let providers = Providers::new(embedding, generation.clone());
	let service = FolioService::with_components(cfg, store, providers);

	if !preload.is_empty() {
		let chunks: Vec<folio_domain::Chunk> = preload
			.iter()
			.map(|(id, text)| folio_domain::Chunk {
				id: id.to_string(),
				chunk_type: folio_domain::ChunkType::Project,
				source: "projects".to_string(),
				title: id.to_string(),
				tags: Vec::new(),
				text: text.to_string(),
				meta: serde_json::Map::new(),
				should_embed: true,
			})
			.collect();

		service.index_chunks(&chunks).await.expect("preload index failed");
	}

	let state = AppState::with_service(service, ProfileStore::new(&data_dir));

	TestApp { router: routes::router(state), generation, data_dir }
}

fn json_request(method: &str, uri: &str, payload: &Value) -> Request<Body> {
	Request::builder()
		.method(method)
		.uri(uri)
		.header(header::CONTENT_TYPE, "application/json")
		.body(Body::from(payload.to_string()))
		.expect("failed to build request")
}

fn bare_request(method: &str, uri: &str) -> Request<Body> {
	Request::builder().method(method).uri(uri).body(Body::empty()).expect("failed to build request")
}

async fn response_json(response: axum::response::Response) -> Value {
	let bytes = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("failed to read response body");

	serde_json::from_slice(&bytes).expect("response body is not JSON")
}

fn cleanup(data_dir: &PathBuf) {
	if data_dir.exists() {
		fs::remove_dir_all(data_dir).expect("cleanup failed");
	}
}

#[tokio::test]
async fn health_returns_ok() {
	let app = test_app(&[]).await;
	let response = app.router.oneshot(bare_request("GET", "/health")).await.expect("request failed");

	assert_eq!(response.status(), StatusCode::OK);
	cleanup(&app.data_dir);
}

#[tokio::test]
async fn blank_query_is_rejected() {
	let app = test_app(&[]).await;
	let response = app
		.router
		.oneshot(json_request("POST", "/api/ask", &serde_json::json!({ "query": "   " })))
		.await
		.expect("request failed");

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);

	let body = response_json(response).await;

	assert_eq!(body["error_code"], "invalid_request");
	assert!(app.generation.calls().is_empty());
	cleanup(&app.data_dir);
}

#[tokio::test]
async fn ask_without_indexed_chunks_returns_the_fallback() {
	let app = test_app(&[]).await;
	let response = app
		.router
		.oneshot(json_request("POST", "/api/ask", &serde_json::json!({ "query": "What did you build?" })))
		.await
		.expect("request failed");

	assert_eq!(response.status(), StatusCode::OK);

	let body = response_json(response).await;

	assert_eq!(body["answer"], FALLBACK_ANSWER);
	assert!(app.generation.calls().is_empty());
	cleanup(&app.data_dir);
}

#[tokio::test]
async fn ask_with_indexed_chunks_returns_a_generated_answer() {
	let app = test_app(&[("project-chatapp-live", "I built ChatApp, a messaging tool.")]).await;
	let response = app
		.router
		.oneshot(json_request("POST", "/api/ask", &serde_json::json!({ "query": "What did you build?" })))
		.await
		.expect("request failed");

	assert_eq!(response.status(), StatusCode::OK);

	let body = response_json(response).await;

	assert_eq!(body["answer"], "A grounded answer.");
	assert_eq!(app.generation.calls().len(), 1);
	cleanup(&app.data_dir);
}

#[tokio::test]
async fn profile_lifecycle_init_get_delete() {
	let app = test_app(&[]).await;
	let document = serde_json::json!({
		"personalInfo": { "name": "Asha", "title": "Backend Engineer" },
	});

	let response = app
		.router
		.clone()
		.oneshot(json_request("POST", "/api/profile/init", &document))
		.await
		.expect("request failed");

	assert_eq!(response.status(), StatusCode::CREATED);

	let body = response_json(response).await;

	assert!(body["savedAt"].is_string());

	let response = app
		.router
		.clone()
		.oneshot(bare_request("GET", "/api/profile"))
		.await
		.expect("request failed");

	assert_eq!(response.status(), StatusCode::OK);

	let body = response_json(response).await;

	assert_eq!(body["personalInfo"]["name"], "Asha");
	assert!(body["_savedAt"].is_string());

	let response = app
		.router
		.clone()
		.oneshot(bare_request("DELETE", "/api/profile"))
		.await
		.expect("request failed");

	assert_eq!(response.status(), StatusCode::OK);

	let body = response_json(response).await;

	assert_eq!(body["deleted"], true);

	let response = app
		.router
		.oneshot(bare_request("GET", "/api/profile"))
		.await
		.expect("request failed");

	assert_eq!(response.status(), StatusCode::NOT_FOUND);

	let body = response_json(response).await;

	assert_eq!(body["error_code"], "profile_not_found");
	cleanup(&app.data_dir);
}

#[tokio::test]
async fn malformed_profile_documents_are_rejected() {
	let app = test_app(&[]).await;
	let response = app
		.router
		.clone()
		.oneshot(json_request(
			"POST",
			"/api/profile/init",
			&serde_json::json!({ "personalInfo": "not an object" }),
		))
		.await
		.expect("request failed");

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);

	let body = response_json(response).await;

	assert_eq!(body["error_code"], "invalid_profile");

	let response = app
		.router
		.oneshot(bare_request("GET", "/api/profile"))
		.await
		.expect("request failed");

	assert_eq!(response.status(), StatusCode::NOT_FOUND);
	cleanup(&app.data_dir);
}
