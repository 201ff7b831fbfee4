// ============================================================
// Layer 5 — Evaluator
// ============================================================
// Scores the restored best model on the held-out test split.
// Everything is reported in price units: predictions and targets
// are mapped back through the TargetScaler before scoring.
//
//   MSE  = mean((y − ŷ)²)
//   MAE  = mean(|y − ŷ|)
//   R²   = 1 − SS_res / SS_tot
//   MAPE = mean(|y − ŷ| / max(|y|, ε))
//
// Feature importance is the mean absolute first-layer weight of
// each input, a rough ranking of what the network attends to.

use anyhow::{bail, ensure, Result};
use burn::{
    data::dataloader::DataLoaderBuilder,
    prelude::*,
};
use serde::Serialize;

use crate::data::{batcher::RegressionBatcher, dataset::HousingDataset, standardizer::TargetScaler};
use crate::domain::{house::FEATURE_NAMES, sample::Partition};
use crate::ml::model::HousePriceMlp;

const MAPE_EPSILON: f64 = 1e-8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegressionMetrics {
    pub mse:  f64,
    pub mae:  f64,
    pub r2:   f64,
    pub mape: f64,
}

impl RegressionMetrics {
    pub fn rmse(&self) -> f64 {
        self.mse.sqrt()
    }
}

/// Test-set scores plus the paired values they came from.
#[derive(Debug, Clone)]
pub struct TestReport {
    pub metrics:     RegressionMetrics,
    pub targets:     Vec<f64>,
    pub predictions: Vec<f64>,
}

/// Score `predictions` against `targets`.
pub fn regression_metrics(targets: &[f64], predictions: &[f64]) -> Result<RegressionMetrics> {
    ensure!(
        targets.len() == predictions.len(),
        "got {} targets but {} predictions",
        targets.len(),
        predictions.len()
    );
    if targets.is_empty() {
        bail!("cannot score an empty test set");
    }
    let n    = targets.len() as f64;
    let mean = targets.iter().sum::<f64>() / n;

    let (mut ss_res, mut abs_err, mut pct_err, mut ss_tot) = (0.0, 0.0, 0.0, 0.0);
    for (&y, &p) in targets.iter().zip(predictions) {
        let err = y - p;
        ss_res  += err * err;
        abs_err += err.abs();
        pct_err += err.abs() / y.abs().max(MAPE_EPSILON);
        ss_tot  += (y - mean).powi(2);
    }

    // Constant targets: R² is 1 for a perfect fit, 0 otherwise
    let r2 = if ss_tot > 0.0 {
        1.0 - ss_res / ss_tot
    } else if ss_res == 0.0 {
        1.0
    } else {
        0.0
    };

    Ok(RegressionMetrics {
        mse:  ss_res / n,
        mae:  abs_err / n,
        r2,
        mape: pct_err / n,
    })
}

/// Run `model` over the (scaled) test partition and score it in price units.
pub fn evaluate_test<B: Backend>(
    model:      &HousePriceMlp<B>,
    test:       &Partition,
    target:     &TargetScaler,
    batch_size: usize,
    device:     &B::Device,
) -> Result<TestReport> {
    let loader = DataLoaderBuilder::new(RegressionBatcher::<B>::new(device.clone()))
        .batch_size(batch_size)
        .build(HousingDataset::from_partition(test));

    let mut targets     = Vec::with_capacity(test.len());
    let mut predictions = Vec::with_capacity(test.len());

    for batch in loader.iter() {
        let output = model.forward(batch.features);
        predictions.extend(output.into_data().iter::<f32>().map(|p| target.inverse(p as f64)));
        targets.extend(batch.targets.into_data().iter::<f32>().map(|t| target.inverse(t as f64)));
    }

    let metrics = regression_metrics(&targets, &predictions)?;
    tracing::info!(
        "Test set: MSE={:.2} RMSE={:.2} MAE={:.2} R²={:.4} MAPE={:.2}%",
        metrics.mse,
        metrics.rmse(),
        metrics.mae,
        metrics.r2,
        metrics.mape * 100.0
    );
    Ok(TestReport { metrics, targets, predictions })
}

/// (feature name, mean |first-layer weight|), most important first.
pub fn feature_importance<B: Backend>(model: &HousePriceMlp<B>) -> Result<Vec<(&'static str, f32)>> {
    let weights = model.input_weight_magnitudes()?;
    ensure!(
        weights.len() == FEATURE_NAMES.len(),
        "model has {} inputs but there are {} named features",
        weights.len(),
        FEATURE_NAMES.len()
    );
    let mut ranked: Vec<_> = FEATURE_NAMES.iter().copied().zip(weights).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    Ok(ranked)
}
