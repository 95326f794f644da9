use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc::{Receiver, Sender};
use tracing::{debug, warn};

use crate::config::KernelConfig;
use crate::kernel::{ExponentialKernel, Kernel, KernelError};
use crate::math::{EuclideanDistance, MathError};
use crate::matrix::{kernel_matrix_from_distances, KernelMatrix, PairwiseDistances};
use crate::session_input::SessionInput;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("kernel error: {0}")]
    Kernel(#[from] KernelError),

    #[error("math error: {0}")]
    Math(#[from] MathError),

    #[error("channel closed while sending session entry")]
    ChannelError,
}

/// One result line produced by the session.
///
/// Output only. serde_json writes non-finite values (NaN from a zero
/// bandwidth at distance 0, for instance) as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionEntry {
    Kernel {
        at: DateTime<Utc>,
        bandwidth: f64,
        gamma: f64,
    },
    Point {
        at: DateTime<Utc>,
        index: usize,
        coord: Vec<f64>,
    },
    Evaluation {
        at: DateTime<Utc>,
        distance: f64,
        value: f64,
    },
    DistanceEvaluation {
        at: DateTime<Utc>,
        distance: f64,
        value: f64,
    },
    Matrix {
        at: DateTime<Utc>,
        matrix: KernelMatrix,
    },
    Error {
        at: DateTime<Utc>,
        message: String,
    },
}

/// Owns the current kernel and a set of points whose pairwise distances are
/// cached until the set changes. Changing the bandwidth keeps the cache.
#[derive(Debug, Clone)]
pub struct KernelSession {
    config: KernelConfig,
    kernel: ExponentialKernel,
    points: Vec<Vec<f64>>,
    distances: Option<PairwiseDistances>,
}

impl KernelSession {
    pub fn new(config: KernelConfig) -> Result<Self, KernelError> {
        let kernel = config.build()?;
        Ok(Self {
            config,
            kernel,
            points: Vec::new(),
            distances: None,
        })
    }

    pub fn kernel(&self) -> &ExponentialKernel {
        &self.kernel
    }

    pub fn points(&self) -> &[Vec<f64>] {
        &self.points
    }

    fn kernel_entry(&self) -> SessionEntry {
        SessionEntry::Kernel {
            at: Utc::now(),
            bandwidth: self.kernel.bandwidth(),
            gamma: self.kernel.gamma(),
        }
    }

    pub fn handle(&mut self, input: SessionInput) -> Result<SessionEntry, SessionError> {
        match input {
            SessionInput::Bandwidth(bandwidth) => {
                let config = self.config.with_bandwidth(bandwidth);
                self.kernel = config.build()?;
                self.config = config;
                Ok(self.kernel_entry())
            }
            SessionInput::Info => Ok(self.kernel_entry()),
            SessionInput::Point(coord) => {
                if let Some(first) = self.points.first() {
                    if first.len() != coord.len() {
                        return Err(MathError::DimensionMismatch {
                            left: first.len(),
                            right: coord.len(),
                        }
                        .into());
                    }
                }
                self.points.push(coord.clone());
                self.distances = None;
                Ok(SessionEntry::Point {
                    at: Utc::now(),
                    index: self.points.len() - 1,
                    coord,
                })
            }
            SessionInput::Evaluate { a, b } => {
                let distance = EuclideanDistance::evaluate(&a, &b)?;
                let value = self.kernel.evaluate_distance(distance);
                Ok(SessionEntry::Evaluation {
                    at: Utc::now(),
                    distance,
                    value,
                })
            }
            SessionInput::EvaluateDistance(distance) => Ok(SessionEntry::DistanceEvaluation {
                at: Utc::now(),
                distance,
                value: self.kernel.evaluate_distance(distance),
            }),
            SessionInput::Matrix => {
                let distances = match self.distances.take() {
                    Some(cached) => cached,
                    None => {
                        debug!(points = self.points.len(), "rebuilding distance cache");
                        PairwiseDistances::compute(&self.points)?
                    }
                };
                let matrix = kernel_matrix_from_distances(&self.kernel, &distances);
                self.distances = Some(distances);
                Ok(SessionEntry::Matrix {
                    at: Utc::now(),
                    matrix,
                })
            }
        }
    }

    /// Handles inputs until the sender side closes. Per-input failures are
    /// reported as [`SessionEntry::Error`]; only a closed output channel
    /// ends the loop early.
    pub async fn core_loop(
        &mut self,
        mut rx: Receiver<SessionInput>,
        tx: Sender<SessionEntry>,
    ) -> Result<(), SessionError> {
        while let Some(input) = rx.recv().await {
            let entry = match self.handle(input) {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("session input rejected: {e}");
                    SessionEntry::Error {
                        at: Utc::now(),
                        message: e.to_string(),
                    }
                }
            };

            tx.send(entry).await.map_err(|_| SessionError::ChannelError)?;
        }
        Ok(())
    }

    /// Whether the pairwise distance cache is populated.
    pub fn has_cached_distances(&self) -> bool {
        self.distances.is_some()
    }
}
