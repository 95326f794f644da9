//! Exponential kernel evaluation.
//!
//! [`ExponentialKernel`] scores two points as `exp(-||x - y|| / (2 mu^2))`
//! with the constant folded into a precomputed `gamma`. It implements the
//! [`Kernel`] capability shared by interchangeable kernel strategies, and
//! works on any [`RealVector`] (slices, arrays, `Vec<f64>`,
//! [`SparseVector`]).
//!
//! ```
//! use kernel_core::{ExponentialKernel, Kernel};
//!
//! let kernel = ExponentialKernel::new(2.0);
//! let k = kernel.evaluate(&[0.0, 0.0], &[2.0, 0.0]).unwrap();
//! assert!((k - (-0.25f64).exp()).abs() < 1e-12);
//! assert_eq!(kernel.evaluate_distance(2.0), k);
//! ```

pub mod config;
pub mod kernel;
pub mod math;
pub mod matrix;
pub mod session;
pub mod session_input;
pub mod telemetry;

pub use config::{ConfigError, KernelConfig};
pub use kernel::{ExponentialKernel, Kernel, KernelError};
pub use math::{EuclideanDistance, MathError, RealVector, SparseVector, SquaredEuclideanDistance};
pub use matrix::{kernel_matrix, kernel_matrix_from_distances, KernelMatrix, PairwiseDistances};
