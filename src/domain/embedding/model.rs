//! Embedding model trait definition

use std::fmt::Debug;

/// Trait for text embedding models.
///
/// Implementations must be deterministic (the same text always yields the
/// same vector) and pure: no I/O and no shared mutable state, so `embed`
/// can run unsynchronized from any number of threads.
pub trait EmbeddingModel: Send + Sync + Debug {
    /// Get the model name
    fn model_name(&self) -> &'static str;

    /// Get the fixed output dimension
    fn dimension(&self) -> usize;

    /// Embed a single text into a vector of `dimension` components
    fn embed(&self, text: &str) -> Vec<f32>;

    /// Embed a batch of texts, preserving input order.
    ///
    /// The default implementation maps `embed` over the input; batched
    /// implementations may optimize but must keep per-item independence.
    fn embed_batch(&self, texts: &[String]) -> Vec<Vec<f32>> {
        texts.iter().map(|text| self.embed(text)).collect()
    }
}

/// Calculate cosine similarity between two vectors.
///
/// Returns `0.0` for mismatched lengths or a zero-norm side; never errors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity_identical() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];

        let similarity = cosine_similarity(&a, &b);

        assert!((similarity - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];

        let similarity = cosine_similarity(&a, &b);

        assert!(similarity.abs() < 0.0001);
    }

    #[test]
    fn test_cosine_similarity_opposite() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![-1.0, 0.0, 0.0];

        let similarity = cosine_similarity(&a, &b);

        assert!((similarity + 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_cosine_similarity_zero_vector() {
        let zero = vec![0.0, 0.0, 0.0];
        let a = vec![1.0, 2.0, 3.0];

        assert_eq!(cosine_similarity(&zero, &a), 0.0);
        assert_eq!(cosine_similarity(&a, &zero), 0.0);
    }

    #[test]
    fn test_cosine_similarity_different_lengths() {
        let a = vec![1.0, 2.0];
        let b = vec![1.0, 2.0, 3.0];

        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_cosine_similarity_empty() {
        let empty: Vec<f32> = vec![];

        assert_eq!(cosine_similarity(&empty, &empty), 0.0);
    }

    #[test]
    fn test_embed_batch_preserves_order() {
        let model = mock::MockEmbeddingModel::new(2)
            .with_vector("first", vec![1.0, 0.0])
            .with_vector("second", vec![0.0, 1.0]);

        let vectors = model.embed_batch(&["first".to_string(), "second".to_string()]);

        assert_eq!(vectors[0], vec![1.0, 0.0]);
        assert_eq!(vectors[1], vec![0.0, 1.0]);
    }
}
