// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Generate synthetic houses      (Layer 4 - data)
//   Step 2: Split train/validation/test    (Layer 4 - data)
//   Step 3: Fit scalers on train only      (Layer 4 - data)
//   Step 4: Save config and scalers        (Layer 6 - infra)
//   Step 5: Build the MLP regressor        (Layer 5 - ml)
//   Step 6: Run the training harness       (Layer 5 - ml)
//   Step 7: Write the training history     (Layer 6 - infra)
//   Step 8: Score the test set             (Layer 5 - ml)
//   Step 9: Predict the example houses     (Layer 5 - ml)
//
// Reference: Burn Book §5 (Training)

use anyhow::{Context, Result};
use burn::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::{
    splitter::partition_dataset,
    standardizer::FittedScalers,
    synthetic::SyntheticHousing,
};
use crate::domain::{
    house::{HouseFeatures, FEATURE_COUNT},
    traits::DatasetSource,
};
use crate::error::TrainError;
use crate::infra::{checkpoint::CheckpointManager, metrics::MetricsLogger};
use crate::ml::{
    evaluator::{evaluate_test, feature_importance, RegressionMetrics},
    inferencer::Inferencer,
    model::HousePriceMlpConfig,
    regressor::{adam_regressor, TrainBackend},
    trainer::{HarnessConfig, TrainingHarness, TrainingStatus},
};

// ─── Training Configuration ──────────────────────────────────────────────────
// All settings for a training run. Saved next to the checkpoint
// so a later `predict` knows how the weights were produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub checkpoint_dir: String,
    pub num_samples:    usize,
    pub data_seed:      u64,
    pub test_fraction:  f64,
    pub val_fraction:   f64,
    pub batch_size:     usize,
    pub epochs:         usize,
    pub patience:       usize,
    pub lr:             f64,
    /// Seeds weight init, dropout and the per-epoch shuffle
    pub seed:           u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            checkpoint_dir: "checkpoints".to_string(),
            num_samples:    2000,
            data_seed:      42,
            test_fraction:  0.2,
            val_fraction:   0.2,
            batch_size:     32,
            epochs:         100,
            patience:       10,
            lr:             1e-3,
            seed:           42,
        }
    }
}

impl TrainConfig {
    pub fn harness_config(&self) -> HarnessConfig {
        HarnessConfig {
            batch_size: self.batch_size,
            num_epochs: self.epochs,
            patience:   self.patience,
            seed:       self.seed,
        }
    }

    /// Reject anything that would make training meaningless.
    pub fn validate(&self) -> Result<(), TrainError> {
        self.harness_config().validate()?;
        if self.num_samples == 0 {
            return Err(TrainError::InvalidConfig("sample count must be positive".into()));
        }
        if !(self.lr.is_finite() && self.lr > 0.0) {
            return Err(TrainError::InvalidConfig(format!(
                "learning rate must be positive, got {}",
                self.lr
            )));
        }
        for (name, f) in [("test fraction", self.test_fraction), ("validation fraction", self.val_fraction)] {
            if !(f > 0.0 && f < 1.0) {
                return Err(TrainError::InvalidConfig(format!("{name} must be in (0, 1), got {f}")));
            }
        }
        Ok(())
    }
}

// ─── TrainReport ─────────────────────────────────────────────────────────────
/// Everything the CLI prints after a run.
#[derive(Debug, Clone)]
pub struct TrainReport {
    pub status:              TrainingStatus,
    pub epochs_run:          usize,
    pub best_epoch:          usize,
    pub best_val_loss:       f64,
    pub test:                RegressionMetrics,
    pub feature_importance:  Vec<(&'static str, f32)>,
    pub example_predictions: Vec<(HouseFeatures, f64)>,
    pub checkpoint_dir:      PathBuf,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainReport> {
        let cfg = &self.config;
        cfg.validate()?;

        // ── Step 1: Generate the dataset ──────────────────────────────────────
        let source  = SyntheticHousing::new(cfg.num_samples, cfg.data_seed);
        let samples = source.load_all()?;
        tracing::info!("Generated {} houses (data seed {})", samples.len(), cfg.data_seed);

        // ── Step 2: Train / validation / test split ───────────────────────────
        let parts = partition_dataset(samples, cfg.test_fraction, cfg.val_fraction, cfg.data_seed)?;
        tracing::info!(
            "Split: {} train, {} validation, {} test",
            parts.train.len(),
            parts.validation.len(),
            parts.test.len()
        );

        // ── Step 3: Standardise with training statistics only ─────────────────
        let scalers    = FittedScalers::fit(&parts.train)?;
        let train      = scalers.apply(&parts.train);
        let validation = scalers.apply(&parts.validation);
        let test       = scalers.apply(&parts.test);

        // ── Step 4: Save config and scalers for inference ─────────────────────
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir)?;
        ckpt_manager.save_config(cfg)?;
        ckpt_manager.save_scalers(&scalers)?;

        // ── Step 5: Build the model ───────────────────────────────────────────
        TrainBackend::seed(cfg.seed);
        let device    = <TrainBackend as Backend>::Device::default();
        let regressor = adam_regressor::<TrainBackend>(
            &HousePriceMlpConfig::new(FEATURE_COUNT),
            cfg.lr,
            device.clone(),
        );

        // ── Step 6: Train with early stopping ─────────────────────────────────
        let harness = TrainingHarness::new(cfg.harness_config(), &ckpt_manager)?;
        let outcome = harness
            .run(regressor, &train, &validation)
            .context("Training failed")?;

        // ── Step 7: Persist the learning curves ───────────────────────────────
        let logger = MetricsLogger::new(&cfg.checkpoint_dir)?;
        logger.write_history(&outcome.history)?;

        // ── Step 8: Score the best model on the test set ──────────────────────
        let model  = outcome.model.valid_module();
        let report = evaluate_test(&model, &test, &scalers.target, cfg.batch_size, &device)?;
        logger.write_predictions(&report.targets, &report.predictions)?;

        let importance = feature_importance(&model)?;
        for (name, weight) in &importance {
            tracing::debug!("importance {name}: {weight:.4}");
        }

        // ── Step 9: Demo predictions ──────────────────────────────────────────
        let inferencer = Inferencer::new(model, scalers, device)?;
        let examples   = HouseFeatures::examples();
        let prices     = inferencer.predict(&examples)?;

        let best_epoch = outcome
            .state
            .best_epoch
            .context("Training finished without a best epoch")?;

        Ok(TrainReport {
            status:              outcome.state.status,
            epochs_run:          outcome.state.epoch,
            best_epoch,
            best_val_loss:       outcome.state.best_val_loss,
            test:                report.metrics,
            feature_importance:  importance,
            example_predictions: examples.into_iter().zip(prices).collect(),
            checkpoint_dir:      ckpt_manager.dir().to_path_buf(),
        })
    }
}
