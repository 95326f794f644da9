use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::kernel::Kernel;
use crate::math::{EuclideanDistance, MathError, RealVector};

/// Symmetric `n x n` matrix stored row-major. Only the upper triangle is
/// ever computed.
fn fill_symmetric<F>(n: usize, mut f: F) -> Result<Vec<f64>, MathError>
where
    F: FnMut(usize, usize) -> Result<f64, MathError>,
{
    let mut values = vec![0.0; n * n];
    for i in 0..n {
        for j in i..n {
            let v = f(i, j)?;
            values[i * n + j] = v;
            values[j * n + i] = v;
        }
    }
    Ok(values)
}

#[derive(Deserialize)]
struct SquareParts {
    n: usize,
    values: Vec<f64>,
}

impl SquareParts {
    fn checked(self) -> Result<(usize, Vec<f64>), MathError> {
        if self.n.checked_mul(self.n) != Some(self.values.len()) {
            return Err(MathError::DimensionMismatch {
                left: self.values.len(),
                right: self.n.saturating_mul(self.n),
            });
        }
        Ok((self.n, self.values))
    }
}

/// Cached Euclidean distances between every pair of a point set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SquareParts")]
pub struct PairwiseDistances {
    n: usize,
    values: Vec<f64>,
}

impl PairwiseDistances {
    pub fn compute<V: RealVector>(points: &[V]) -> Result<Self, MathError> {
        let n = points.len();
        debug!(points = n, "computing pairwise distances");
        let values = fill_symmetric(n, |i, j| {
            if i == j {
                return Ok(0.0);
            }
            EuclideanDistance::evaluate(&points[i], &points[j])
        })?;
        Ok(Self { n, values })
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Panics if `i` or `j` is out of range.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.n && j < self.n, "index ({i}, {j}) out of range for {}", self.n);
        self.values[i * self.n + j]
    }
}

impl TryFrom<SquareParts> for PairwiseDistances {
    type Error = MathError;

    fn try_from(parts: SquareParts) -> Result<Self, Self::Error> {
        let (n, values) = parts.checked()?;
        Ok(Self { n, values })
    }
}

/// Kernel (Gram) matrix of a point set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SquareParts")]
pub struct KernelMatrix {
    n: usize,
    values: Vec<f64>,
}

impl KernelMatrix {
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Panics if `i` or `j` is out of range.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.n && j < self.n, "index ({i}, {j}) out of range for {}", self.n);
        self.values[i * self.n + j]
    }

    /// Panics if `i` is out of range.
    pub fn row(&self, i: usize) -> &[f64] {
        assert!(i < self.n, "row {i} out of range for {}", self.n);
        &self.values[i * self.n..(i + 1) * self.n]
    }
}

impl TryFrom<SquareParts> for KernelMatrix {
    type Error = MathError;

    fn try_from(parts: SquareParts) -> Result<Self, Self::Error> {
        let (n, values) = parts.checked()?;
        Ok(Self { n, values })
    }
}

/// Evaluates `kernel` on every pair of `points`.
pub fn kernel_matrix<K, V>(kernel: &K, points: &[V]) -> Result<KernelMatrix, MathError>
where
    K: Kernel,
    V: RealVector,
{
    let n = points.len();
    let values = fill_symmetric(n, |i, j| kernel.evaluate(&points[i], &points[j]))?;
    Ok(KernelMatrix { n, values })
}

/// Same as [`kernel_matrix`], from distances the caller has already paid for.
///
/// Kernels that take squared distances get each cached distance squared.
pub fn kernel_matrix_from_distances<K: Kernel>(
    kernel: &K,
    distances: &PairwiseDistances,
) -> KernelMatrix {
    let n = distances.len();
    let values = distances
        .values
        .iter()
        .map(|&d| {
            if K::USES_SQUARED_DISTANCE {
                kernel.evaluate_distance(d * d)
            } else {
                kernel.evaluate_distance(d)
            }
        })
        .collect();
    KernelMatrix { n, values }
}
