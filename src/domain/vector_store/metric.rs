//! Similarity metrics

use serde::{Deserialize, Serialize};

/// Metric used to compare two embeddings
///
/// `similarity` is "higher is closer" and `distance` is "lower is closer" for
/// every metric, so ordering by one is the reverse of ordering by the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMetric {
    #[default]
    Cosine,
    Euclidean,
    DotProduct,
}

impl SimilarityMetric {
    pub fn similarity(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            Self::Cosine => cosine_similarity(a, b),
            Self::Euclidean => 1.0 / (1.0 + euclidean_distance(a, b)),
            Self::DotProduct => dot_product(a, b),
        }
    }

    pub fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        match self {
            Self::Cosine => 1.0 - cosine_similarity(a, b),
            Self::Euclidean => euclidean_distance(a, b),
            Self::DotProduct => -dot_product(a, b),
        }
    }

    /// Convert a store-reported distance back to a similarity score
    pub fn similarity_from_distance(&self, distance: f64) -> f32 {
        match self {
            Self::Cosine => (1.0 - distance) as f32,
            Self::Euclidean => (1.0 / (1.0 + distance)) as f32,
            Self::DotProduct => (-distance) as f32,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cosine => "cosine",
            Self::Euclidean => "euclidean",
            Self::DotProduct => "dot_product",
        }
    }
}

impl std::str::FromStr for SimilarityMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cosine" => Ok(Self::Cosine),
            "euclidean" | "l2" => Ok(Self::Euclidean),
            "dot_product" | "dotproduct" | "inner_product" => Ok(Self::DotProduct),
            other => Err(format!("Unknown similarity metric: {}", other)),
        }
    }
}

/// Calculate cosine similarity between two vectors
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

/// Euclidean (L2) distance; mismatched lengths are infinitely far apart
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return f32::INFINITY;
    }

    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity_identical() {
        let similarity = cosine_similarity(&[1.0, 0.0, 0.0], &[1.0, 0.0, 0.0]);
        assert!((similarity - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let similarity = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]);
        assert!(similarity.abs() < 0.0001);
    }

    #[test]
    fn test_cosine_similarity_different_lengths() {
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn test_euclidean_distance() {
        assert!((euclidean_distance(&[0.0, 0.0], &[3.0, 4.0]) - 5.0).abs() < 0.0001);
        assert!(euclidean_distance(&[0.0], &[0.0, 1.0]).is_infinite());
    }

    #[test]
    fn test_metric_ordering_is_consistent() {
        let query = [1.0, 0.0];
        let near = [0.9, 0.1];
        let far = [0.1, 0.9];

        for metric in [
            SimilarityMetric::Cosine,
            SimilarityMetric::Euclidean,
            SimilarityMetric::DotProduct,
        ] {
            assert!(metric.similarity(&query, &near) > metric.similarity(&query, &far));
            assert!(metric.distance(&query, &near) < metric.distance(&query, &far));
        }
    }

    #[test]
    fn test_similarity_from_distance_round_trips() {
        let a = [0.6, 0.8];
        let b = [0.8, 0.6];
        let metric = SimilarityMetric::Cosine;

        let from_distance = metric.similarity_from_distance(metric.distance(&a, &b) as f64);
        assert!((from_distance - metric.similarity(&a, &b)).abs() < 0.0001);
    }

    #[test]
    fn test_metric_from_str() {
        assert_eq!("cosine".parse::<SimilarityMetric>(), Ok(SimilarityMetric::Cosine));
        assert_eq!("L2".parse::<SimilarityMetric>(), Ok(SimilarityMetric::Euclidean));
        assert!("manhattan".parse::<SimilarityMetric>().is_err());
    }
}
