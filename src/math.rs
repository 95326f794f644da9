use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MathError {
    #[error("dimension mismatch: left = {left}, right = {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("index {index} out of bounds for dimension {dim}")]
    IndexOutOfBounds { index: usize, dim: usize },

    #[error("sparse indices must be strictly increasing")]
    UnsortedIndices,
}

/// An indexable, fixed-length, real-valued sequence.
///
/// This is everything the distance functions (and therefore the kernels)
/// need from a vector container.
pub trait RealVector {
    fn dim(&self) -> usize;

    /// Value at `index`. Callers stay below `dim()`.
    fn component(&self, index: usize) -> f64;
}

impl RealVector for [f64] {
    fn dim(&self) -> usize {
        self.len()
    }

    fn component(&self, index: usize) -> f64 {
        self[index]
    }
}

impl RealVector for Vec<f64> {
    fn dim(&self) -> usize {
        self.len()
    }

    fn component(&self, index: usize) -> f64 {
        self[index]
    }
}

impl<const N: usize> RealVector for [f64; N] {
    fn dim(&self) -> usize {
        N
    }

    fn component(&self, index: usize) -> f64 {
        self[index]
    }
}

impl<T: RealVector + ?Sized> RealVector for &T {
    fn dim(&self) -> usize {
        (**self).dim()
    }

    fn component(&self, index: usize) -> f64 {
        (**self).component(index)
    }
}

#[derive(Deserialize)]
struct SparseParts {
    dim: usize,
    indices: Vec<usize>,
    values: Vec<f64>,
}

/// Sparse vector with strictly increasing `indices` below `dim`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SparseParts")]
pub struct SparseVector {
    dim: usize,
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl SparseVector {
    pub fn new(dim: usize, indices: Vec<usize>, values: Vec<f64>) -> Result<Self, MathError> {
        if indices.len() != values.len() {
            return Err(MathError::DimensionMismatch {
                left: indices.len(),
                right: values.len(),
            });
        }
        if indices.windows(2).any(|w| w[0] >= w[1]) {
            return Err(MathError::UnsortedIndices);
        }
        if let Some(&index) = indices.last() {
            if index >= dim {
                return Err(MathError::IndexOutOfBounds { index, dim });
            }
        }

        Ok(Self {
            dim,
            indices,
            values,
        })
    }

    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl TryFrom<SparseParts> for SparseVector {
    type Error = MathError;

    fn try_from(parts: SparseParts) -> Result<Self, Self::Error> {
        Self::new(parts.dim, parts.indices, parts.values)
    }
}

impl RealVector for SparseVector {
    fn dim(&self) -> usize {
        self.dim
    }

    fn component(&self, index: usize) -> f64 {
        match self.indices.binary_search(&index) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }
}

/// Sum of squared per-coordinate differences.
pub struct SquaredEuclideanDistance;

impl SquaredEuclideanDistance {
    pub fn evaluate<A, B>(a: &A, b: &B) -> Result<f64, MathError>
    where
        A: RealVector + ?Sized,
        B: RealVector + ?Sized,
    {
        if a.dim() != b.dim() {
            return Err(MathError::DimensionMismatch {
                left: a.dim(),
                right: b.dim(),
            });
        }

        Ok((0..a.dim())
            .map(|i| {
                let d = a.component(i) - b.component(i);
                d * d
            })
            .sum())
    }
}

/// The L2 norm of `a - b`.
pub struct EuclideanDistance;

impl EuclideanDistance {
    pub fn evaluate<A, B>(a: &A, b: &B) -> Result<f64, MathError>
    where
        A: RealVector + ?Sized,
        B: RealVector + ?Sized,
    {
        Ok(SquaredEuclideanDistance::evaluate(a, b)?.sqrt())
    }
}
