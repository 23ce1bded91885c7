pub type EmbeddingArray = ndarray::Array1<f32>;

/// Feature vector of one face as produced by the recognition model.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding(pub EmbeddingArray);

impl Embedding {
    pub fn new(array: EmbeddingArray) -> Self {
        Self(array)
    }

    pub fn norm(&self) -> f32 {
        self.0.dot(&self.0).sqrt()
    }

    pub fn normalized(&self) -> Self {
        let norm = self.norm();
        if norm == 0. {
            return self.clone();
        }
        Self(&self.0 / norm)
    }

    /// Euclidean distance between the unit length embeddings.
    pub fn distance(&self, other: &Embedding) -> f32 {
        let diff = self.normalized().0 - other.normalized().0;
        diff.dot(&diff).sqrt()
    }

    pub fn matches(&self, other: &Embedding, tolerance: f32) -> bool {
        self.distance(other) <= tolerance
    }
}

impl From<EmbeddingArray> for Embedding {
    fn from(value: EmbeddingArray) -> Self {
        Self(value)
    }
}

impl From<Vec<f32>> for Embedding {
    fn from(value: Vec<f32>) -> Self {
        Self(EmbeddingArray::from(value))
    }
}

impl std::ops::Deref for Embedding {
    type Target = EmbeddingArray;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod test {
    use super::Embedding;

    #[test]
    fn computes_norm() {
        assert_eq!(Embedding::from(vec![3., 4.]).norm(), 5.);
    }

    #[test]
    fn ignores_magnitude_when_comparing() {
        let a = Embedding::from(vec![1., 1., 0.]);
        let b = Embedding::from(vec![10., 10., 0.]);
        assert!(a.distance(&b) < 1e-6);
        assert!(a.matches(&b, 0.1));
    }

    #[test]
    fn separates_orthogonal_embeddings() {
        let a = Embedding::from(vec![1., 0.]);
        let b = Embedding::from(vec![0., 2.]);
        assert!((a.distance(&b) - 2f32.sqrt()).abs() < 1e-6);
        assert!(!a.matches(&b, 1.));
    }

    #[test]
    fn leaves_zero_embedding_untouched_on_normalize() {
        let zero = Embedding::from(vec![0.; 4]);
        assert_eq!(zero.normalized(), zero);
    }
}
