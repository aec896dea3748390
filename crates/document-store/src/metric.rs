use crate::error::{Result, StoreError};
use ndarray::ArrayView1;

/// Distance between equal-length vectors; lower means more similar.
pub trait SimilarityMetric: Send + Sync {
    fn distance(&self, a: &[f32], b: &[f32]) -> Result<f32>;

    /// Distance from `query` to each of `vectors`, in order.
    fn distances(&self, query: &[f32], vectors: &[&[f32]]) -> Result<Vec<f32>> {
        vectors.iter().map(|v| self.distance(query, v)).collect()
    }
}

/// Cosine distance: `1 - cos(a, b)`, in `[0, 2]` for real vectors.
///
/// A zero-norm operand carries no direction, so it is treated as maximally
/// dissimilar (distance 1.0) rather than an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct CosineDistance;

impl SimilarityMetric for CosineDistance {
    fn distance(&self, a: &[f32], b: &[f32]) -> Result<f32> {
        if a.len() != b.len() {
            return Err(StoreError::InvalidDimension {
                expected: a.len(),
                actual: b.len(),
            });
        }

        let a = ArrayView1::from(a);
        let b = ArrayView1::from(b);

        let dot = a.dot(&b);
        let norm_a = a.dot(&a).sqrt();
        let norm_b = b.dot(&b).sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return Ok(1.0);
        }

        Ok(1.0 - dot / (norm_a * norm_b))
    }
}
