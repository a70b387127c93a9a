use thiserror::Error;

use harvest_model::ConfigError;

/// Failures of the executor itself.
///
/// Per-task failures never show up here; they are recorded as outcomes.
/// The slot variants are defensive: they indicate a broken claim/write
/// invariant and are unreachable under correct pool usage.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("invalid executor config: {0}")]
    Config(#[from] ConfigError),
    #[error("result slot {index} written twice")]
    SlotAlreadySet { index: usize },
    #[error("result slot {index} out of range (task count {len})")]
    SlotOutOfRange { index: usize, len: usize },
    #[error("batch finished with {missing} unrecorded outcome(s)")]
    IncompleteBatch { missing: usize },
}
