//! Image batch preprocessing.

use burn::tensor::{backend::Backend, Tensor};

/// Centers an image batch by subtracting the scalar mean of the whole batch.
///
/// The mean is taken over all axes jointly. Shape is preserved and the
/// input is not mutated.
pub fn standardize<B: Backend, const D: usize>(images: Tensor<B, D>) -> Tensor<B, D> {
    let mean = images.clone().mean();
    images.sub(mean.unsqueeze())
}

#[cfg(test)]
mod tests {
    use burn::backend::NdArray;
    use burn::tensor::Distribution;

    use super::*;

    type TestBackend = NdArray<f32>;

    #[test]
    fn standardize_centers_the_batch() {
        let device = Default::default();
        let images = Tensor::<TestBackend, 4>::random(
            [2, 4, 4, 1],
            Distribution::Uniform(0.0, 255.0),
            &device,
        );

        let centered = standardize(images.clone());
        assert_eq!(centered.dims(), images.dims());

        let mean = centered.mean().into_scalar();
        assert!(mean.abs() < 1e-3, "batch mean was {mean}");
    }

    #[test]
    fn standardize_shifts_by_the_scalar_mean() {
        let device = Default::default();
        let images = Tensor::<TestBackend, 2>::from_floats([[1.0, 2.0], [3.0, 6.0]], &device);

        let centered = standardize(images);
        let expected = [-2.0, -1.0, 0.0, 3.0];
        let values = centered.into_data().to_vec::<f32>().unwrap();
        assert_eq!(values, expected);
    }
}
