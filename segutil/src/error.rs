use std::path::PathBuf;

use thiserror::Error;

/// The error type for `segutil-burn` operations.
///
/// Every failure in this crate is a synchronous precondition violation
/// surfaced to the caller; nothing is retried or recovered internally.
#[derive(Error, Debug)]
pub enum SegUtilError {
    /// Error for when construction-time parameters are logically invalid.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// The reason why the configuration is invalid.
        reason: String,
    },

    /// Error for when an input tensor's channel dimension does not match
    /// the configured channel count.
    #[error("shape mismatch: expected last dimension {expected}, got {actual}")]
    ShapeMismatch {
        /// The configured channel count.
        expected: usize,
        /// The size of the input's last dimension.
        actual: usize,
    },

    /// Error for when inference-mode normalization is requested before any
    /// training-mode call has populated the running statistics.
    #[error("normalizer '{name}' has no running statistics; run a training pass first")]
    UninitializedStatistics {
        /// The identifier of the normalizer instance.
        name: String,
    },

    /// Error for when opening or decoding a mask image fails.
    #[error("failed to open mask image at '{path}'")]
    MaskOpenFailed {
        /// The mask file path that failed to open.
        path: PathBuf,
        /// The underlying image decoding error.
        #[source]
        source: image::ImageError,
    },

    /// Error for when an empty path list is passed to a batch loader.
    #[error("empty path list provided for mask batch")]
    EmptyPathList,

    /// Error for when installing the logging subscriber fails.
    #[error("logging setup failed: {reason}")]
    LogSetupFailed {
        /// The reason the subscriber could not be installed.
        reason: String,
    },
}

/// A specialized `Result` type for `segutil-burn` operations.
pub type SegUtilResult<T> = Result<T, SegUtilError>;
