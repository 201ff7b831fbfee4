// ============================================================
// Layer 5 — BurnRegressor
// ============================================================
// Adapts HousePriceMlp to the TrainableModel trait so the
// harness can drive it without touching tensors.
//
//   - train_batch runs on the autodiff backend (TrainBackend)
//   - eval_batch runs on model.valid(): the inner backend with
//     dropout disabled and no graph recording. The valid module is
//     built once and reused until a step or restore replaces it
//
// The Adam update:
//   m = β1*m + (1-β1)*g        (mean)
//   v = β2*v + (1-β2)*g²       (variance)
//   θ = θ - lr * m / (√v + ε)  (update)
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use std::{cell::RefCell, path::Path};

use anyhow::Result;
use burn::{
    backend::{Autodiff, NdArray},
    data::dataloader::batcher::Batcher,
    module::AutodiffModule,
    nn::loss::{MseLoss, Reduction},
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::data::batcher::{RegressionBatch, RegressionBatcher};
use crate::domain::{
    sample::Sample,
    traits::{BatchStats, Checkpointable, TrainableModel},
};
use crate::ml::model::{HousePriceMlp, HousePriceMlpConfig};

/// CPU backend with gradient tracking, used for training.
pub type TrainBackend = Autodiff<NdArray>;

/// Plain CPU backend, used for evaluation and prediction.
pub type InferBackend = NdArray;

pub struct BurnRegressor<B: AutodiffBackend, O> {
    model:         HousePriceMlp<B>,
    optim:         O,
    lr:            f64,
    device:        B::Device,
    train_batcher: RegressionBatcher<B>,
    valid_batcher: RegressionBatcher<B::InnerBackend>,
    valid_cache:   RefCell<Option<HousePriceMlp<B::InnerBackend>>>,
}

impl<B, O> BurnRegressor<B, O>
where
    B: AutodiffBackend,
    O: Optimizer<HousePriceMlp<B>, B>,
{
    pub fn new(model: HousePriceMlp<B>, optim: O, lr: f64, device: B::Device) -> Self {
        Self {
            model,
            optim,
            lr,
            train_batcher: RegressionBatcher::new(device.clone()),
            valid_batcher: RegressionBatcher::new(device.clone()),
            valid_cache:   RefCell::new(None),
            device,
        }
    }

    /// The current parameters on the inner backend, dropout off.
    pub fn valid_module(&self) -> HousePriceMlp<B::InnerBackend> {
        self.valid_cache
            .borrow_mut()
            .get_or_insert_with(|| self.model.valid())
            .clone()
    }
}

/// Fresh MLP with Adam (ε = 1e-8) at learning rate `lr`.
pub fn adam_regressor<B: AutodiffBackend>(
    config: &HousePriceMlpConfig,
    lr:     f64,
    device: B::Device,
) -> BurnRegressor<B, impl Optimizer<HousePriceMlp<B>, B>> {
    let model = config.init::<B>(&device);
    let optim = AdamConfig::new().with_epsilon(1e-8).init();
    tracing::info!(
        "Model ready: {} → 128 → 64 → 32 → 1 ({} parameters)",
        config.num_features,
        model.num_params()
    );
    BurnRegressor::new(model, optim, lr, device)
}

/// Mean squared error and mean absolute error of one batch.
fn batch_losses<B: Backend>(
    output: Tensor<B, 2>,
    targets: Tensor<B, 2>,
) -> (Tensor<B, 1>, Tensor<B, 1>) {
    let mse = MseLoss::new().forward(output.clone(), targets.clone(), Reduction::Mean);
    let mae = (output - targets).abs().mean();
    (mse, mae)
}

impl<B, O> TrainableModel for BurnRegressor<B, O>
where
    B: AutodiffBackend,
    O: Optimizer<HousePriceMlp<B>, B>,
{
    fn train_batch(&mut self, batch: &[Sample]) -> Result<BatchStats> {
        let batch = self.train_batcher.batch(batch.to_vec());
        let size  = batch.size();
        let RegressionBatch { features, targets } = batch;

        let output      = self.model.forward(features);
        let (loss, mae) = batch_losses(output, targets);

        let stats = BatchStats {
            loss: loss.clone().into_scalar().elem::<f64>(),
            mae:  mae.into_scalar().elem::<f64>(),
            size,
        };

        // Gradients are consumed by the step, nothing carries over.
        let grads  = loss.backward();
        let grads  = GradientsParams::from_grads(grads, &self.model);
        self.model = self.optim.step(self.lr, self.model.clone(), grads);
        self.valid_cache.get_mut().take();

        Ok(stats)
    }

    fn eval_batch(&self, batch: &[Sample]) -> Result<BatchStats> {
        let model = self.valid_module();
        let batch = self.valid_batcher.batch(batch.to_vec());
        let size  = batch.size();
        let RegressionBatch { features, targets } = batch;

        let (loss, mae) = batch_losses(model.forward(features), targets);
        Ok(BatchStats {
            loss: loss.into_scalar().elem::<f64>(),
            mae:  mae.into_scalar().elem::<f64>(),
            size,
        })
    }
}

impl<B, O> Checkpointable for BurnRegressor<B, O>
where
    B: AutodiffBackend,
    O: Optimizer<HousePriceMlp<B>, B>,
{
    fn save_checkpoint(&self, path: &Path) -> Result<()> {
        self.model.save_weights(path)
    }

    fn restore_checkpoint(&mut self, path: &Path) -> Result<()> {
        self.model = self.model.clone().load_weights(path, &self.device)?;
        self.valid_cache.get_mut().take();
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sample::{Partition, PartitionKind};
    use crate::infra::checkpoint::CheckpointManager;
    use crate::ml::trainer::{HarnessConfig, TrainingHarness};

    /// y = x0 - 0.5 * x1, already on a unit scale
    fn linear_samples(n: usize) -> Vec<Sample> {
        (0..n)
            .map(|i| {
                let x0 = (i % 7) as f32 / 7.0 - 0.5;
                let x1 = (i % 5) as f32 / 5.0 - 0.5;
                Sample::new(vec![x0, x1], x0 - 0.5 * x1)
            })
            .collect()
    }

    fn regressor() -> BurnRegressor<TrainBackend, impl Optimizer<HousePriceMlp<TrainBackend>, TrainBackend>> {
        TrainBackend::seed(7);
        adam_regressor::<TrainBackend>(&HousePriceMlpConfig::new(2), 1e-2, Default::default())
    }

    #[test]
    fn test_training_lowers_eval_loss() {
        let mut model = regressor();
        let batch     = linear_samples(32);

        let before = model.eval_batch(&batch).unwrap().loss;
        for _ in 0..150 {
            model.train_batch(&batch).unwrap();
        }
        let after = model.eval_batch(&batch).unwrap().loss;
        assert!(after < before, "loss went from {before} to {after}");
    }

    #[test]
    fn test_eval_is_read_only() {
        let model = regressor();
        let batch = linear_samples(10);
        let a     = model.eval_batch(&batch).unwrap();
        let b     = model.eval_batch(&batch).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.size, 10);
    }

    #[test]
    fn test_restore_undoes_later_steps() {
        let dir   = tempfile::tempdir().unwrap();
        let path  = dir.path().join("weights");
        let batch = linear_samples(16);

        let mut model = regressor();
        model.save_checkpoint(&path).unwrap();
        let saved = model.eval_batch(&batch).unwrap().loss;

        for _ in 0..20 {
            model.train_batch(&batch).unwrap();
        }
        // Evaluate the trained parameters so the restore has to replace them.
        let trained = model.eval_batch(&batch).unwrap().loss;
        assert_ne!(trained, saved);

        model.restore_checkpoint(&path).unwrap();
        assert_eq!(model.eval_batch(&batch).unwrap().loss, saved);
    }

    #[test]
    fn test_eval_sees_each_step() {
        let mut model = regressor();
        let batch     = linear_samples(16);

        let mut losses = vec![model.eval_batch(&batch).unwrap().loss];
        for _ in 0..3 {
            model.train_batch(&batch).unwrap();
            losses.push(model.eval_batch(&batch).unwrap().loss);
            // Repeated evaluation between steps reuses the same parameters.
            assert_eq!(model.eval_batch(&batch).unwrap().loss, *losses.last().unwrap());
        }
        for pair in losses.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
    }

    #[test]
    fn test_reloaded_best_model_reproduces_best_val_loss() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path()).unwrap();

        let train = Partition::new(PartitionKind::Train, linear_samples(60));
        let val   = Partition::new(PartitionKind::Validation, linear_samples(25));

        let harness = TrainingHarness::new(
            HarnessConfig { batch_size: 8, num_epochs: 6, patience: 3, seed: 1 },
            &ckpt,
        )
        .unwrap();
        let outcome = harness.run(regressor(), &train, &val).unwrap();

        let (val_loss, _) = harness.evaluate(&outcome.model, &val).unwrap();
        assert!(
            (val_loss - outcome.state.best_val_loss).abs() < 1e-6,
            "reloaded {val_loss} vs best {}",
            outcome.state.best_val_loss
        );
        assert_eq!(outcome.state.best_epoch, outcome.history.best_epoch());
    }
}
