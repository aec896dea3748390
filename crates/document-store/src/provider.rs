/// Capability seam for the text-embedding model backing a store.
use async_trait::async_trait;

/// A stateful embedding model: fit on a corpus, then infer queries against
/// the fitted state.
///
/// The store re-fits on every mutation, so implementations must tolerate
/// frequent full-corpus calls. `fit` returns one vector per input text, in
/// input order; `infer` answers against the most recent fit. Every vector a
/// provider produces has length `dimension()` for the provider's lifetime.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Fit the model to `corpus` and return its embeddings, in order.
    async fn fit(&self, corpus: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;

    /// Embed a query text against the most recently fitted state.
    async fn infer(&self, text: &str) -> anyhow::Result<Vec<f32>>;

    /// The fixed dimensionality of every vector this provider produces.
    fn dimension(&self) -> usize;
}
