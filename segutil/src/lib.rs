//! Utility components for image-segmentation training pipelines built on Burn.
//!
//! This crate bundles the small pieces a segmentation training loop needs
//! around the model itself: binary mask loading, image standardization,
//! intersection-over-union scoring, a batch-normalization operator with an
//! explicit training/inference split, parameter counting, and logging setup.

pub mod error;
pub mod logging;
pub mod mask;
pub mod metrics;
pub mod norm;
pub mod params;
pub mod preprocess;

pub use error::{SegUtilError, SegUtilResult};
pub use logging::init_logging;
pub use mask::{decode_mask, read_masks};
pub use metrics::compute_iou;
pub use norm::{BatchNorm, BatchNormConfig};
pub use params::{log_param_count, num_trainable_params};
pub use preprocess::standardize;
