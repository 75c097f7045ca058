//! Model parameter counting.

use burn::{module::Module, tensor::backend::Backend};

/// Total number of trainable parameters in a Burn module tree.
pub fn num_trainable_params<B: Backend, M: Module<B>>(module: &M) -> usize {
    module.num_params()
}

/// Logs the trainable parameter count of a module under its model name.
pub fn log_param_count<B: Backend, M: Module<B>>(name: &str, module: &M) {
    tracing::info!(
        model = name,
        params = module.num_params(),
        "trainable parameter count"
    );
}

#[cfg(test)]
mod tests {
    use burn::backend::NdArray;
    use burn::nn::LinearConfig;

    use super::*;

    type TestBackend = NdArray<f32>;

    #[test]
    fn counts_weights_and_biases() {
        let device = Default::default();
        // 4 * 8 weights + 8 biases.
        let linear = LinearConfig::new(4, 8).init::<TestBackend>(&device);
        assert_eq!(num_trainable_params(&linear), 40);
    }

    #[test]
    fn counts_weights_without_bias() {
        let device = Default::default();
        let linear = LinearConfig::new(4, 8)
            .with_bias(false)
            .init::<TestBackend>(&device);
        assert_eq!(num_trainable_params(&linear), 32);
    }
}
