//! Batch normalization over the last tensor dimension.
//!
//! Unlike the framework-provided layers, this operator keeps its parameters
//! and running statistics as plain tensors owned by the instance, and splits
//! the two modes into separate methods: [`BatchNorm::train_forward`] mutates
//! the running statistics while [`BatchNorm::infer_forward`] is pure. The
//! mutation is therefore visible in the signature instead of hidden behind a
//! mode flag.

use burn::{
    config::Config,
    tensor::{backend::Backend, Distribution, Tensor},
};

use crate::error::{SegUtilError, SegUtilResult};

/// Configuration for [`BatchNorm`].
#[derive(Config, Debug)]
pub struct BatchNormConfig {
    /// Unique identifier for the instance, used in logs and error messages.
    pub name: String,
    /// Number of channels, i.e. the size of the last input dimension.
    pub num_channels: usize,
    /// Added inside the square root to avoid division by zero.
    #[config(default = 1e-5)]
    pub epsilon: f64,
    /// Smoothing factor of the running-statistics moving average.
    #[config(default = 0.9)]
    pub momentum: f64,
    /// Standard deviation of the scale initialization noise. Zero yields a
    /// scale of exactly one per channel.
    #[config(default = 0.02)]
    pub init_std: f64,
}

impl BatchNormConfig {
    /// Initializes a normalizer on the given device.
    ///
    /// The scale is sampled from `Normal(1.0, init_std)` and the shift starts
    /// at zero. Running statistics are created lazily on the first training
    /// pass.
    ///
    /// # Errors
    ///
    /// Returns [`SegUtilError::InvalidConfiguration`] if `momentum` is not
    /// strictly inside `(0, 1)`, `epsilon` is not positive, or
    /// `num_channels` is zero.
    pub fn init<B: Backend>(&self, device: &B::Device) -> SegUtilResult<BatchNorm<B>> {
        if !(self.momentum > 0.0 && self.momentum < 1.0) {
            return Err(SegUtilError::InvalidConfiguration {
                reason: format!("momentum must be in (0, 1), got {}", self.momentum),
            });
        }
        if self.epsilon <= 0.0 {
            return Err(SegUtilError::InvalidConfiguration {
                reason: format!("epsilon must be positive, got {}", self.epsilon),
            });
        }
        if self.num_channels == 0 {
            return Err(SegUtilError::InvalidConfiguration {
                reason: "num_channels must be at least 1".to_string(),
            });
        }

        let gamma = if self.init_std > 0.0 {
            Tensor::random(
                [self.num_channels],
                Distribution::Normal(1.0, self.init_std),
                device,
            )
        } else {
            Tensor::ones([self.num_channels], device)
        };
        let beta = Tensor::zeros([self.num_channels], device);

        Ok(BatchNorm {
            name: self.name.clone(),
            gamma,
            beta,
            running: None,
            num_channels: self.num_channels,
            epsilon: self.epsilon,
            momentum: self.momentum,
        })
    }
}

/// Exponentially smoothed per-channel statistics, shape `[C]` each.
#[derive(Debug, Clone)]
struct RunningStats<B: Backend> {
    mean: Tensor<B, 1>,
    var: Tensor<B, 1>,
}

/// Per-channel batch normalization with a learned affine transform.
///
/// Statistics are reduced over every dimension except the last. Training
/// passes normalize with the current batch statistics and fold them into a
/// running moving average; inference passes normalize with the stored
/// running statistics.
///
/// A single logical update stream is assumed: concurrent training calls on
/// one instance must be serialized by the caller.
#[derive(Debug, Clone)]
pub struct BatchNorm<B: Backend> {
    name: String,
    gamma: Tensor<B, 1>,
    beta: Tensor<B, 1>,
    running: Option<RunningStats<B>>,
    num_channels: usize,
    epsilon: f64,
    momentum: f64,
}

impl<B: Backend> BatchNorm<B> {
    /// Normalizes `x` with the statistics of the batch itself and updates
    /// the running statistics.
    ///
    /// The first call copies the batch statistics into the running slots;
    /// every later call blends them as
    /// `running = momentum * running + (1 - momentum) * batch`.
    /// No state is mutated if the input is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`SegUtilError::ShapeMismatch`] if the last dimension of `x`
    /// does not equal the configured channel count.
    pub fn train_forward<const D: usize>(
        &mut self,
        x: Tensor<B, D>,
    ) -> SegUtilResult<Tensor<B, D>> {
        let dims = x.dims();
        self.check_shape(&dims)?;

        let flat: Tensor<B, 2> = x.reshape([-1, self.num_channels as i32]);
        // Population variance: reduce over the joint sample axis, divide by N.
        let (batch_var, batch_mean) = flat.clone().var_mean_bias(0);
        let output = self
            .affine(flat, batch_mean.clone(), batch_var.clone())
            .reshape(dims);

        let batch_mean = batch_mean.squeeze::<1>(0);
        let batch_var = batch_var.squeeze::<1>(0);
        self.running = Some(match self.running.take() {
            None => RunningStats {
                mean: batch_mean,
                var: batch_var,
            },
            Some(prev) => RunningStats {
                mean: prev
                    .mean
                    .mul_scalar(self.momentum)
                    .add(batch_mean.mul_scalar(1.0 - self.momentum)),
                var: prev
                    .var
                    .mul_scalar(self.momentum)
                    .add(batch_var.mul_scalar(1.0 - self.momentum)),
            },
        });
        tracing::trace!(name = %self.name, "running statistics updated");

        Ok(output)
    }

    /// Normalizes `x` with the stored running statistics.
    ///
    /// # Errors
    ///
    /// Returns [`SegUtilError::ShapeMismatch`] on a channel-count mismatch,
    /// and [`SegUtilError::UninitializedStatistics`] if no training pass has
    /// populated the running statistics yet.
    pub fn infer_forward<const D: usize>(&self, x: Tensor<B, D>) -> SegUtilResult<Tensor<B, D>> {
        let dims = x.dims();
        self.check_shape(&dims)?;
        let running = self
            .running
            .as_ref()
            .ok_or_else(|| SegUtilError::UninitializedStatistics {
                name: self.name.clone(),
            })?;

        let flat: Tensor<B, 2> = x.reshape([-1, self.num_channels as i32]);
        let output = self.affine(
            flat,
            running.mean.clone().unsqueeze(),
            running.var.clone().unsqueeze(),
        );
        Ok(output.reshape(dims))
    }

    /// `(x - mean) / sqrt(var + epsilon) * gamma + beta`, all `[1, C]`
    /// against `[N, C]`.
    fn affine(&self, flat: Tensor<B, 2>, mean: Tensor<B, 2>, var: Tensor<B, 2>) -> Tensor<B, 2> {
        let normalized = flat.sub(mean).div(var.add_scalar(self.epsilon).sqrt());
        normalized
            .mul(self.gamma.clone().unsqueeze())
            .add(self.beta.clone().unsqueeze())
    }

    fn check_shape<const D: usize>(&self, dims: &[usize; D]) -> SegUtilResult<()> {
        let actual = dims[D - 1];
        if actual != self.num_channels {
            return Err(SegUtilError::ShapeMismatch {
                expected: self.num_channels,
                actual,
            });
        }
        Ok(())
    }

    /// The identifier this instance was constructed with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The configured channel count.
    pub const fn num_channels(&self) -> usize {
        self.num_channels
    }

    /// Number of learned parameters (scale and shift per channel).
    pub const fn num_params(&self) -> usize {
        2 * self.num_channels
    }

    /// Running per-channel mean, `None` before the first training pass.
    pub fn running_mean(&self) -> Option<Tensor<B, 1>> {
        self.running.as_ref().map(|r| r.mean.clone())
    }

    /// Running per-channel variance, `None` before the first training pass.
    pub fn running_var(&self) -> Option<Tensor<B, 1>> {
        self.running.as_ref().map(|r| r.var.clone())
    }
}
