//! Errors of TorchScript policies.
use std::path::PathBuf;
use thiserror::Error;

/// Errors of TorchScript policies.
#[derive(Error, Debug)]
pub enum PolicyError {
    /// No checkpoint exists in the directory.
    #[error("No checkpoint found in {0:?}")]
    CheckpointNotFound(PathBuf),

    /// The output of the module is not `(c, h, action)`.
    #[error("Unexpected output of the policy module: {0}")]
    UnexpectedOutput(String),
}
