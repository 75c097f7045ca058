//! Binary segmentation mask loading and decoding.
//!
//! Masks are read from gif/png files as grayscale images, resized to the
//! requested size with a cubic filter, and binarized to exact 0/1 values.
//! Batches are returned as `[N, H, W, 1]` float tensors.

use std::path::Path;

use burn::tensor::{backend::Backend, Tensor, TensorData};
use image::{imageops::FilterType, DynamicImage};

use crate::error::{SegUtilError, SegUtilResult};

/// Grayscale values strictly above this are decoded as foreground.
const FOREGROUND_THRESHOLD: u8 = 127;

/// Decodes a mask image into a flat row-major `H * W` vector of 0/1 values.
///
/// The image is converted to 8-bit grayscale (squeezing any extra channels),
/// resized to `(height, width)` with a cubic filter, and thresholded at the
/// middle of the value range.
pub fn decode_mask(img: &DynamicImage, size: (u32, u32)) -> Vec<f32> {
    let (height, width) = size;
    let gray = img.to_luma8();
    let resized = image::imageops::resize(&gray, width, height, FilterType::CatmullRom);
    resized
        .pixels()
        .map(|p| if p.0[0] > FOREGROUND_THRESHOLD { 1.0 } else { 0.0 })
        .collect()
}

/// Reads a batch of mask files into a `[N, H, W, 1]` tensor of 0/1 values.
///
/// # Errors
///
/// Returns [`SegUtilError::EmptyPathList`] when `paths` is empty and
/// [`SegUtilError::MaskOpenFailed`] when a file cannot be opened or decoded.
pub fn read_masks<B: Backend, P: AsRef<Path>>(
    paths: &[P],
    size: (u32, u32),
    device: &B::Device,
) -> SegUtilResult<Tensor<B, 4>> {
    if paths.is_empty() {
        return Err(SegUtilError::EmptyPathList);
    }

    let (height, width) = size;
    let mut data = Vec::with_capacity(paths.len() * (height * width) as usize);
    for path in paths {
        let img = image::open(path).map_err(|source| SegUtilError::MaskOpenFailed {
            path: path.as_ref().to_path_buf(),
            source,
        })?;
        data.extend(decode_mask(&img, size));
    }

    let shape = [paths.len(), height as usize, width as usize, 1];
    Ok(Tensor::from_data(TensorData::new(data, shape), device))
}
