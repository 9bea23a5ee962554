use std::path::PathBuf;
use thiserror::Error;

/// Failure taxonomy for one video pass. No retries happen inside the
/// pipeline; callers decide whether an error is worth retrying.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid video {path}: {reason}")]
    InvalidVideo { path: PathBuf, reason: String },
    #[error("classifier error: {0}")]
    Classifier(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn invalid_video(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        PipelineError::InvalidVideo {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
