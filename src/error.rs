// ============================================================
// Error Taxonomy
// ============================================================
// Typed failures raised by the training pipeline. Everything
// else travels as anyhow::Error; callers that care about the
// category can use `err.downcast_ref::<TrainError>()`.

use std::{fmt, path::PathBuf};

/// Errors that abort a training run.
#[derive(Debug)]
pub enum TrainError {
    /// A configuration value is out of range. Raised before training starts.
    InvalidConfig(String),

    /// A dataset partition has no samples. Raised before training starts.
    EmptyPartition(&'static str),

    /// A loss or MAE value stopped being finite.
    NumericInstability {
        epoch: usize,
        phase: &'static str,
        value: f64,
    },

    /// The checkpoint could not be written or read back.
    Persistence {
        path:   PathBuf,
        source: anyhow::Error,
    },
}

impl fmt::Display for TrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::EmptyPartition(name) => {
                write!(f, "invalid config: the {name} partition is empty")
            }
            Self::NumericInstability { epoch, phase, value } => {
                write!(f, "numeric instability in epoch {epoch} ({phase}): got {value}")
            }
            Self::Persistence { path, source } => {
                write!(f, "checkpoint error at '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for TrainError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Persistence { source, .. } => Some(&**source),
            _ => None,
        }
    }
}

impl TrainError {
    /// True for the configuration family (invalid values, empty partitions).
    pub fn is_config(&self) -> bool {
        matches!(self, Self::InvalidConfig(_) | Self::EmptyPartition(_))
    }
}
