use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::metric::SimilarityMetric;
use crate::provider::EmbeddingProvider;
use crate::types::{Document, EmbeddedDocument};
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

pub const DEFAULT_TOP_K: usize = 5;

/// In-process document store with corpus-consistent embeddings.
///
/// Every mutation re-fits the injected [`EmbeddingProvider`] over the whole
/// current corpus before returning, so all stored vectors are always products
/// of one model state and mutually comparable. Readers (`get`, `get_all`,
/// `retrieve`) observe either the state before a mutation or after it, never
/// a half-rebuilt sequence: the writer holds the write guard across the fit
/// and swaps the rebuilt sequence in as one step.
pub struct DocumentStore {
    provider: Arc<dyn EmbeddingProvider>,
    metric: Arc<dyn SimilarityMetric>,
    config: StoreConfig,
    documents: RwLock<Vec<EmbeddedDocument>>,
}

impl DocumentStore {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, metric: Arc<dyn SimilarityMetric>) -> Self {
        Self::with_config(provider, metric, StoreConfig::default())
    }

    pub fn with_config(
        provider: Arc<dyn EmbeddingProvider>,
        metric: Arc<dyn SimilarityMetric>,
        config: StoreConfig,
    ) -> Self {
        Self {
            provider,
            metric,
            config,
            documents: RwLock::new(Vec::new()),
        }
    }

    /// Append a document and re-fit the whole corpus.
    ///
    /// Embeddings of unchanged documents are recomputed too; after this call
    /// returns, every embedding reflects a fit over the current corpus. A
    /// document with empty content is accepted and then dropped by that same
    /// re-fit, so it never becomes visible.
    pub async fn add(&self, document: Document) -> Result<()> {
        let mut documents = self.documents.write().await;
        validate_id(&document.id)?;
        ensure_unique(&documents, &document.id)?;

        log::info!(
            "Adding document '{}' (corpus size {})",
            document.id,
            documents.len() + 1
        );

        let mut next: Vec<Document> = documents.iter().map(|d| d.document.clone()).collect();
        next.push(document);
        *documents = self.refit(next).await?;
        Ok(())
    }

    /// Append a batch of documents with exactly one re-fit.
    pub async fn add_many(&self, batch: Vec<Document>) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let mut documents = self.documents.write().await;
        let mut seen = HashSet::new();
        for document in &batch {
            validate_id(&document.id)?;
            ensure_unique(&documents, &document.id)?;
            if !seen.insert(document.id.as_str()) {
                return Err(StoreError::InvalidInput(format!(
                    "duplicate document id '{}' in batch",
                    document.id
                )));
            }
        }

        log::info!("Adding batch of {} documents", batch.len());

        let mut next: Vec<Document> = documents.iter().map(|d| d.document.clone()).collect();
        next.extend(batch);
        *documents = self.refit(next).await?;
        Ok(())
    }

    /// Look up a document by id.
    pub async fn get(&self, id: &str) -> Option<EmbeddedDocument> {
        self.documents
            .read()
            .await
            .iter()
            .find(|d| d.id() == id)
            .cloned()
    }

    /// Snapshot of the store in insertion order.
    pub async fn get_all(&self) -> Vec<EmbeddedDocument> {
        self.documents.read().await.clone()
    }

    /// Remove a document and re-fit. Deleting an unknown id is a no-op; the
    /// corpus is unchanged, so the re-fit is skipped as well.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let mut documents = self.documents.write().await;
        if !documents.iter().any(|d| d.id() == id) {
            log::debug!("Delete of unknown document '{id}' is a no-op");
            return Ok(());
        }

        log::info!("Deleting document '{id}'");

        let next: Vec<Document> = documents
            .iter()
            .filter(|d| d.id() != id)
            .map(|d| d.document.clone())
            .collect();
        *documents = self.refit(next).await?;
        Ok(())
    }

    /// Replace the document at `id`, keeping its position in the sequence,
    /// and re-fit. Unknown ids are reported, not silently ignored.
    pub async fn update(&self, id: &str, new_document: Document) -> Result<()> {
        let mut documents = self.documents.write().await;
        validate_id(&new_document.id)?;

        let Some(position) = documents.iter().position(|d| d.id() == id) else {
            return Err(StoreError::NotFound(id.to_string()));
        };
        if new_document.id != id && documents.iter().any(|d| d.id() == new_document.id) {
            return Err(StoreError::InvalidInput(format!(
                "duplicate document id '{}'",
                new_document.id
            )));
        }

        log::info!("Updating document '{id}'");

        let mut next: Vec<Document> = documents.iter().map(|d| d.document.clone()).collect();
        next[position] = new_document;
        *documents = self.refit(next).await?;
        Ok(())
    }

    /// Return the `min(top_k, len)` documents closest to `query`, ascending
    /// by distance, ties in insertion order. An empty store or `top_k == 0`
    /// yields an empty result without touching the provider.
    pub async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<EmbeddedDocument>> {
        if query.trim().is_empty() {
            return Err(StoreError::InvalidInput("empty query".to_string()));
        }

        let documents = self.documents.read().await;
        if top_k == 0 || documents.is_empty() {
            return Ok(Vec::new());
        }

        log::debug!("Retrieving top {top_k} of {} documents", documents.len());

        let query_vector =
            with_deadline(self.config.infer_timeout, self.provider.infer(query)).await?;
        ensure_dimension(&query_vector, self.provider.dimension())?;

        let embeddings: Vec<&[f32]> = documents.iter().map(|d| d.embedding.as_slice()).collect();
        let distances = self.metric.distances(&query_vector, &embeddings)?;

        // Stable sort keeps tied documents in insertion order.
        let mut ranked: Vec<(usize, f32)> = distances.into_iter().enumerate().collect();
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
        ranked.truncate(top_k);

        Ok(ranked
            .into_iter()
            .map(|(idx, _)| documents[idx].clone())
            .collect())
    }

    /// [`Self::retrieve`] with [`DEFAULT_TOP_K`].
    pub async fn retrieve_default(&self, query: &str) -> Result<Vec<EmbeddedDocument>> {
        self.retrieve(query, DEFAULT_TOP_K).await
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    /// Rebuild the embedded sequence for `documents`: drop empty-content
    /// entries, fit the surviving contents in order, pair survivors with
    /// their vectors. The caller swaps the result in under its write guard.
    /// Any error here leaves the previous state untouched.
    async fn refit(&self, documents: Vec<Document>) -> Result<Vec<EmbeddedDocument>> {
        let survivors: Vec<Document> = documents
            .into_iter()
            .filter(|d| !d.content.is_empty())
            .collect();
        if survivors.is_empty() {
            return Ok(Vec::new());
        }

        let corpus: Vec<String> = survivors.iter().map(|d| d.content.clone()).collect();
        let vectors = with_deadline(self.config.fit_timeout, self.provider.fit(&corpus)).await?;

        if vectors.len() != survivors.len() {
            return Err(StoreError::Provider(format!(
                "fit returned {} vectors for {} texts",
                vectors.len(),
                survivors.len()
            )));
        }
        let expected = self.provider.dimension();
        for vector in &vectors {
            ensure_dimension(vector, expected)?;
        }

        log::info!(
            "Re-fitted corpus of {} documents (dimension {expected})",
            survivors.len()
        );

        Ok(survivors
            .into_iter()
            .zip(vectors)
            .map(|(document, embedding)| EmbeddedDocument {
                document,
                embedding,
            })
            .collect())
    }
}

async fn with_deadline<T>(
    deadline: Option<Duration>,
    call: impl Future<Output = anyhow::Result<T>>,
) -> Result<T> {
    let outcome = match deadline {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .map_err(|_| StoreError::ProviderTimeout(limit))?,
        None => call.await,
    };
    outcome.map_err(|err| StoreError::Provider(format!("{err:#}")))
}

const fn ensure_dimension(vector: &[f32], expected: usize) -> Result<()> {
    if vector.len() != expected {
        return Err(StoreError::InvalidDimension {
            expected,
            actual: vector.len(),
        });
    }
    Ok(())
}

fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(StoreError::InvalidInput(
            "document id must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn ensure_unique(documents: &[EmbeddedDocument], id: &str) -> Result<()> {
    if documents.iter().any(|d| d.id() == id) {
        return Err(StoreError::InvalidInput(format!(
            "duplicate document id '{id}'"
        )));
    }
    Ok(())
}
