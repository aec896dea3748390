use async_trait::async_trait;
use corpus_document_store::EmbeddingProvider;
use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock};
use unicode_segmentation::UnicodeSegmentation;

pub const DEFAULT_DIMENSION: usize = 256;

/// Deterministic feature-hashing vectorizer with corpus-fitted IDF weights.
///
/// Each token lands in a bucket chosen by its FNV-1a hash, signed by the
/// hash's top bit, and weighted by the IDF learned at the last `fit`. Fitting
/// replaces the whole IDF table, so `infer` always answers against the most
/// recently fitted corpus and never mixes model states. No model files, no
/// network: the same inputs produce the same vectors on every run.
pub struct HashedTfIdf {
    dimension: usize,
    state: RwLock<FitState>,
}

#[derive(Default)]
struct FitState {
    idf: HashMap<u64, f32>,
}

impl HashedTfIdf {
    #[must_use]
    pub fn new() -> Self {
        Self::with_dimension(DEFAULT_DIMENSION)
    }

    #[must_use]
    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
            state: RwLock::new(FitState::default()),
        }
    }

    fn embed(&self, text: &str, idf: &HashMap<u64, f32>) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        for token in tokens(text) {
            let hash = fnv1a_64(token.as_bytes());
            let bucket = (hash % self.dimension as u64) as usize;
            let sign = if hash >> 63 == 1 { -1.0 } else { 1.0 };
            // Tokens outside the fitted vocabulary keep plain term frequency.
            let weight = idf.get(&hash).copied().unwrap_or(1.0);
            vector[bucket] += sign * weight;
        }
        normalize(&mut vector);
        vector
    }
}

impl Default for HashedTfIdf {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for HashedTfIdf {
    async fn fit(&self, corpus: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        let mut df: HashMap<u64, usize> = HashMap::new();
        for text in corpus {
            let mut seen = HashSet::new();
            for token in tokens(text) {
                let hash = fnv1a_64(token.as_bytes());
                if seen.insert(hash) {
                    *df.entry(hash).or_insert(0) += 1;
                }
            }
        }

        let n = corpus.len() as f32;
        let idf: HashMap<u64, f32> = df
            .into_iter()
            .map(|(hash, df)| (hash, 1.0 + (n / (1.0 + df as f32)).ln()))
            .collect();

        let vectors: Vec<Vec<f32>> = corpus.iter().map(|text| self.embed(text, &idf)).collect();

        log::debug!(
            "Fitted hashed tf-idf over {} texts (dimension {})",
            corpus.len(),
            self.dimension
        );

        *self
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner) = FitState { idf };
        Ok(vectors)
    }

    async fn infer(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        Ok(self.embed(text, &state.idf))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.unicode_words().map(str::to_lowercase)
}

fn fnv1a_64(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

fn normalize(vec: &mut [f32]) {
    let norm = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm == 0.0 {
        return;
    }
    for value in vec {
        *value /= norm;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn l2_norm(vec: &[f32]) -> f32 {
        vec.iter().map(|v| v * v).sum::<f32>().sqrt()
    }

    #[tokio::test]
    async fn fit_returns_one_normalized_vector_per_text() {
        let model = HashedTfIdf::new();
        let corpus = vec!["the cat sat".to_string(), "the dog ran".to_string()];
        let vectors = model.fit(&corpus).await.unwrap();

        assert_eq!(vectors.len(), 2);
        for vector in &vectors {
            assert_eq!(vector.len(), model.dimension());
            assert!((l2_norm(vector) - 1.0).abs() < 1e-5);
        }
    }

    #[tokio::test]
    async fn same_corpus_produces_identical_vectors() {
        let corpus = vec!["the quick brown fox".to_string(), "the cat sat".to_string()];
        let a = HashedTfIdf::new().fit(&corpus).await.unwrap();
        let b = HashedTfIdf::new().fit(&corpus).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn refit_replaces_the_idf_state() {
        let model = HashedTfIdf::new();

        // "the" is common in the first corpus, so its weight is depressed
        // relative to "cat"; in the second corpus the two weigh the same.
        model
            .fit(&["the cat".to_string(), "the dog".to_string()])
            .await
            .unwrap();
        let against_two_docs = model.infer("the cat").await.unwrap();

        model.fit(&["the cat".to_string()]).await.unwrap();
        let against_one_doc = model.infer("the cat").await.unwrap();

        assert_ne!(against_two_docs, against_one_doc);
    }

    #[tokio::test]
    async fn empty_corpus_fit_yields_no_vectors() {
        let model = HashedTfIdf::new();
        model.fit(&["the cat".to_string()]).await.unwrap();
        let vectors = model.fit(&[]).await.unwrap();
        assert!(vectors.is_empty());
    }

    #[tokio::test]
    async fn infer_is_usable_without_a_prior_fit() {
        let model = HashedTfIdf::new();
        let vector = model.infer("the cat").await.unwrap();
        assert_eq!(vector.len(), model.dimension());
        assert!((l2_norm(&vector) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn zero_dimension_is_clamped() {
        assert_eq!(HashedTfIdf::with_dimension(0).dimension(), 1);
    }
}
