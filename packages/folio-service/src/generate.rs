use serde_json::Value;

use folio_domain::RetrievedContext;

use crate::{FolioService, Result};

pub const SYSTEM_PROMPT: &str = "You are answering questions about a developer's portfolio in \
	their voice. Answer in the first person and use only the provided context. If the context \
	does not contain the answer, say so briefly instead of guessing.";

/// Builds the chat payload: a fixed system prompt plus one user message
/// carrying the numbered context snippets and the question.
pub fn build_messages(query: &str, contexts: &[RetrievedContext]) -> Vec<Value> {
	let context_text = contexts
		.iter()
		.enumerate()
		.map(|(index, context)| format!("({}) {}", index + 1, context.text))
		.collect::<Vec<_>>()
		.join("\n\n");

	vec![
		serde_json::json!({ "role": "system", "content": SYSTEM_PROMPT }),
		serde_json::json!({
			"role": "user",
			"content": format!("Context:\n{context_text}\n\nQuestion:\n{query}"),
		}),
	]
}

impl FolioService {
	pub async fn generate_answer(
		&self,
		query: &str,
		contexts: &[RetrievedContext],
	) -> Result<String> {
		let messages = build_messages(query, contexts);

		Ok(self.providers.generation.complete(&self.cfg.providers.generation, &messages).await?)
	}
}

#[cfg(test)]
mod tests {
	use folio_domain::ChunkType;

	use super::*;

	fn context(text: &str) -> RetrievedContext {
		RetrievedContext {
			score: 0.9,
			text: text.to_string(),
			title: "Asha — Overview".to_string(),
			chunk_type: ChunkType::Identity,
		}
	}

	#[test]
	fn messages_carry_numbered_context_and_question() {
		let contexts = vec![context("I am Asha."), context("I built ChatApp.")];
		let messages = build_messages("What did you build?", &contexts);

		assert_eq!(messages.len(), 2);
		assert_eq!(messages[0]["role"], "system");
		assert_eq!(messages[1]["role"], "user");

		let user = messages[1]["content"].as_str().expect("user content missing");

		assert!(user.contains("(1) I am Asha."));
		assert!(user.contains("(2) I built ChatApp."));
		assert!(user.contains("Question:\nWhat did you build?"));
	}

	#[test]
	fn empty_context_still_produces_both_messages() {
		let messages = build_messages("Who are you?", &[]);

		assert_eq!(messages.len(), 2);
		assert!(messages[1]["content"].as_str().expect("content").starts_with("Context:\n"));
	}
}
