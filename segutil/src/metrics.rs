//! Segmentation quality metrics.

use burn::tensor::{backend::Backend, ElementConversion, Tensor};

/// Calculates intersection-over-union between a predicted mask and a ground
/// truth mask, both `[N, C, H, W]` (or any 4D layout, reduced jointly).
///
/// Predictions are binarized at `threshold`, targets at 0.5. When both masks
/// are empty the score is defined as 1.0 (perfect agreement on "nothing").
pub fn compute_iou<B: Backend>(
    predictions: Tensor<B, 4>,
    targets: Tensor<B, 4>,
    threshold: f32,
) -> f32 {
    let preds_binary = predictions.greater_elem(threshold).float();
    let targets_binary = targets.greater_elem(0.5).float();

    let intersection = (preds_binary.clone() * targets_binary.clone())
        .sum()
        .into_scalar()
        .elem::<f32>();
    let union = (preds_binary.sum() + targets_binary.sum())
        .into_scalar()
        .elem::<f32>()
        - intersection;

    if union > 0.0 {
        intersection / union
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use burn::backend::NdArray;

    use super::*;

    type TestBackend = NdArray<f32>;

    #[test]
    fn identical_masks_score_one() {
        let device = Default::default();
        let mask = Tensor::<TestBackend, 4>::from_floats(
            [[[[1.0, 0.0], [1.0, 1.0]]]],
            &device,
        );

        let iou = compute_iou(mask.clone(), mask, 0.5);
        assert_eq!(iou, 1.0);
    }

    #[test]
    fn disjoint_masks_score_zero() {
        let device = Default::default();
        let pred = Tensor::<TestBackend, 4>::from_floats(
            [[[[1.0, 1.0], [0.0, 0.0]]]],
            &device,
        );
        let target = Tensor::<TestBackend, 4>::from_floats(
            [[[[0.0, 0.0], [1.0, 1.0]]]],
            &device,
        );

        let iou = compute_iou(pred, target, 0.5);
        assert_eq!(iou, 0.0);
    }

    #[test]
    fn partial_overlap_scores_intersection_over_union() {
        let device = Default::default();
        // Prediction covers two pixels, target covers four, two overlap:
        // IoU = 2 / (2 + 4 - 2) = 0.5.
        let pred = Tensor::<TestBackend, 4>::from_floats(
            [[[[1.0, 1.0, 0.0, 0.0]]]],
            &device,
        );
        let target = Tensor::<TestBackend, 4>::from_floats(
            [[[[1.0, 1.0, 1.0, 1.0]]]],
            &device,
        );

        let iou = compute_iou(pred, target, 0.5);
        assert!((iou - 0.5).abs() < 1e-6, "iou was {iou}");
    }

    #[test]
    fn empty_masks_score_one() {
        let device = Default::default();
        let empty = Tensor::<TestBackend, 4>::zeros([1, 1, 4, 4], &device);

        let iou = compute_iou(empty.clone(), empty, 0.5);
        assert_eq!(iou, 1.0);
    }

    #[test]
    fn soft_predictions_are_binarized_at_threshold() {
        let device = Default::default();
        let pred = Tensor::<TestBackend, 4>::from_floats(
            [[[[0.9, 0.4], [0.6, 0.1]]]],
            &device,
        );
        let target = Tensor::<TestBackend, 4>::from_floats(
            [[[[1.0, 0.0], [1.0, 0.0]]]],
            &device,
        );

        let iou = compute_iou(pred, target, 0.5);
        assert_eq!(iou, 1.0);
    }
}
