use crate::{FolioService, Result};

/// Returned verbatim when retrieval finds nothing; the generation provider
/// is not called in that case.
pub const FALLBACK_ANSWER: &str = "That isn't part of my portfolio yet.";

impl FolioService {
	pub async fn ask(&self, query: &str) -> Result<String> {
		let contexts = self.retrieve_context(query, self.cfg.ask.top_k).await?;

		if contexts.is_empty() {
			tracing::info!("No context retrieved; answering with the fallback.");

			return Ok(FALLBACK_ANSWER.to_string());
		}

		self.generate_answer(query, &contexts).await
	}
}
