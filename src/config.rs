use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::kernel::{ExponentialKernel, KernelError};

/// Environment variable naming a JSON config file for the binary.
pub const CONFIG_ENV: &str = "KERNEL_CORE_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("kernel error: {0}")]
    Kernel(#[from] KernelError),
}

fn default_bandwidth() -> f64 {
    1.0
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KernelConfig {
    #[serde(default = "default_bandwidth")]
    pub bandwidth: f64,

    /// Reject degenerate bandwidths instead of building a kernel that
    /// returns 0, inf or NaN.
    #[serde(default)]
    pub strict: bool,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            bandwidth: default_bandwidth(),
            strict: false,
        }
    }
}

impl KernelConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Loads from `explicit`, else from `$KERNEL_CORE_CONFIG`, else defaults.
    pub fn discover(explicit: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = explicit.or_else(|| {
            std::env::var(CONFIG_ENV)
                .ok()
                .filter(|raw| !raw.trim().is_empty())
                .map(PathBuf::from)
        });
        match path {
            Some(path) => Self::from_path(path),
            None => Ok(Self::default()),
        }
    }

    pub fn with_bandwidth(&self, bandwidth: f64) -> Self {
        Self {
            bandwidth,
            ..self.clone()
        }
    }

    pub fn build(&self) -> Result<ExponentialKernel, KernelError> {
        if self.strict {
            ExponentialKernel::try_new(self.bandwidth)
        } else {
            Ok(ExponentialKernel::new(self.bandwidth))
        }
    }
}
