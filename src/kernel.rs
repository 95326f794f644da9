use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::math::{MathError, RealVector, SquaredEuclideanDistance};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum KernelError {
    #[error("invalid bandwidth {bandwidth}: must be positive and finite")]
    InvalidBandwidth { bandwidth: f64 },

    #[error("math error: {0}")]
    Math(#[from] MathError),
}

/// A symmetric similarity function between two points.
///
/// `evaluate` works on the points themselves; `evaluate_distance` takes a
/// distance the caller already has, so pairwise distance caches can be
/// reused across kernels and bandwidths.
pub trait Kernel: Send + Sync {
    /// `K(x, x) == 1` for every `x`.
    const IS_NORMALIZED: bool;

    /// Whether `evaluate_distance` expects a squared distance.
    const USES_SQUARED_DISTANCE: bool;

    fn evaluate<A, B>(&self, a: &A, b: &B) -> Result<f64, MathError>
    where
        A: RealVector + ?Sized,
        B: RealVector + ?Sized;

    fn evaluate_distance(&self, t: f64) -> f64;
}

fn default_bandwidth() -> f64 {
    1.0
}

#[derive(Clone, Serialize, Deserialize)]
struct ExponentialParams {
    #[serde(default = "default_bandwidth")]
    bandwidth: f64,
}

/// The exponential kernel, `K(x, y) = exp(-||x - y|| / (2 mu^2))`.
///
/// `gamma = -1 / (2 mu^2)` is computed once at construction. The kernel has
/// no setters, so the two fields always agree; it serializes as its
/// bandwidth alone and recomputes `gamma` when read back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "ExponentialParams", into = "ExponentialParams")]
pub struct ExponentialKernel {
    bandwidth: f64,
    gamma: f64,
}

impl Default for ExponentialKernel {
    fn default() -> Self {
        Self {
            bandwidth: 1.0,
            gamma: -0.5,
        }
    }
}

impl ExponentialKernel {
    /// Builds the kernel without validating `bandwidth`.
    ///
    /// A zero bandwidth gives `gamma = -inf` and a negative or NaN one gives
    /// a nonsensical `gamma`; either propagates into `evaluate` as 0, inf or
    /// NaN. Use [`ExponentialKernel::try_new`] to reject them instead.
    pub fn new(bandwidth: f64) -> Self {
        if !(bandwidth > 0.0 && bandwidth.is_finite()) {
            warn!(bandwidth, "exponential kernel built with a degenerate bandwidth");
        }
        Self {
            bandwidth,
            gamma: -0.5 * bandwidth.powi(-2),
        }
    }

    pub fn try_new(bandwidth: f64) -> Result<Self, KernelError> {
        if !(bandwidth > 0.0 && bandwidth.is_finite()) {
            return Err(KernelError::InvalidBandwidth { bandwidth });
        }
        Ok(Self::new(bandwidth))
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// The precomputed `-1 / (2 mu^2)`.
    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

impl Kernel for ExponentialKernel {
    const IS_NORMALIZED: bool = true;
    const USES_SQUARED_DISTANCE: bool = false;

    fn evaluate<A, B>(&self, a: &A, b: &B) -> Result<f64, MathError>
    where
        A: RealVector + ?Sized,
        B: RealVector + ?Sized,
    {
        let distance = SquaredEuclideanDistance::evaluate(a, b)?.sqrt();
        Ok(self.evaluate_distance(distance))
    }

    fn evaluate_distance(&self, t: f64) -> f64 {
        (self.gamma * t).exp()
    }
}

impl From<ExponentialParams> for ExponentialKernel {
    fn from(params: ExponentialParams) -> Self {
        Self::new(params.bandwidth)
    }
}

impl From<ExponentialKernel> for ExponentialParams {
    fn from(kernel: ExponentialKernel) -> Self {
        Self {
            bandwidth: kernel.bandwidth,
        }
    }
}
