use folio_domain::RetrievedContext;

use crate::{Error, FolioService, Result};

impl FolioService {
	/// Embeds the query and returns the `top_k` nearest chunks by cosine
	/// similarity, best first.
	pub async fn retrieve_context(
		&self,
		query: &str,
		top_k: u32,
	) -> Result<Vec<RetrievedContext>> {
		let texts = [query.to_string()];
		let vectors =
			self.providers.embedding.embed(&self.cfg.providers.embedding, &texts).await?;
		let Some(vector) = vectors.into_iter().next() else {
			return Err(Error::Provider {
				message: "Embedding provider returned no vector for the query.".to_string(),
			});
		};

		if vector.len() != self.cfg.storage.qdrant.vector_dim as usize {
			return Err(Error::Provider {
				message: format!(
					"Embedding dimension {} does not match configured dimension {}.",
					vector.len(),
					self.cfg.storage.qdrant.vector_dim
				),
			});
		}

		let hits = self.store.search(vector, u64::from(top_k)).await?;

		Ok(hits.into_iter().map(RetrievedContext::from).collect())
	}
}
