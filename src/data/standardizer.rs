// ============================================================
// Layer 4 — Standardizer
// ============================================================
// Per-feature z-score scaling:  x' = (x − mean) / scale
//
// Fitted on the TRAINING partition only, then applied
// unchanged to validation, test and prediction inputs so no
// statistics leak from held-out data.
//
// `scale` is the population standard deviation; a constant
// feature gets scale 1 so it maps to 0 instead of NaN.
//
// The price target is scaled the same way by TargetScaler and
// mapped back with `inverse` when reporting.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::domain::sample::{Partition, Sample};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standardizer {
    pub means:  Vec<f64>,
    pub scales: Vec<f64>,
}

impl Standardizer {
    /// Fit per-feature mean and population std on `samples`.
    pub fn fit(samples: &[Sample]) -> Result<Self> {
        let Some(first) = samples.first() else {
            bail!("cannot fit a standardizer on an empty partition");
        };
        let dim = first.dim();
        let n   = samples.len() as f64;

        let mut means = vec![0.0; dim];
        for s in samples {
            if s.dim() != dim {
                bail!("feature length mismatch: got {}, expected {dim}", s.dim());
            }
            for (m, &x) in means.iter_mut().zip(&s.features) {
                *m += x as f64;
            }
        }
        means.iter_mut().for_each(|m| *m /= n);

        let mut vars = vec![0.0; dim];
        for s in samples {
            for ((v, &x), m) in vars.iter_mut().zip(&s.features).zip(&means) {
                let d = x as f64 - m;
                *v += d * d;
            }
        }
        let scales = vars
            .into_iter()
            .map(|v| {
                let std = (v / n).sqrt();
                if std > f64::EPSILON { std } else { 1.0 }
            })
            .collect();

        Ok(Self { means, scales })
    }

    pub fn dim(&self) -> usize {
        self.means.len()
    }

    pub fn transform(&self, features: &[f32]) -> Vec<f32> {
        features
            .iter()
            .zip(self.means.iter().zip(&self.scales))
            .map(|(&x, (m, s))| ((x as f64 - m) / s) as f32)
            .collect()
    }

    /// Standardize features; targets pass through untouched.
    pub fn transform_partition(&self, partition: &Partition) -> Partition {
        partition.map_samples(|s| Sample::new(self.transform(&s.features), s.target))
    }
}

/// z-score scaling for the regression target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetScaler {
    pub mean:  f64,
    pub scale: f64,
}

impl TargetScaler {
    pub fn fit(samples: &[Sample]) -> Result<Self> {
        if samples.is_empty() {
            bail!("cannot fit a target scaler on an empty partition");
        }
        let n    = samples.len() as f64;
        let mean = samples.iter().map(|s| s.target as f64).sum::<f64>() / n;
        let var  = samples
            .iter()
            .map(|s| (s.target as f64 - mean).powi(2))
            .sum::<f64>() / n;
        let std  = var.sqrt();
        Ok(Self { mean, scale: if std > f64::EPSILON { std } else { 1.0 } })
    }

    pub fn transform(&self, y: f64) -> f64 {
        (y - self.mean) / self.scale
    }

    pub fn inverse(&self, y: f64) -> f64 {
        y * self.scale + self.mean
    }

    pub fn transform_partition(&self, partition: &Partition) -> Partition {
        partition.map_samples(|s| Sample::new(s.features.clone(), self.transform(s.target as f64) as f32))
    }
}

/// Both scalers, persisted together next to the checkpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedScalers {
    pub features: Standardizer,
    pub target:   TargetScaler,
}

impl FittedScalers {
    /// Fit both scalers on the training partition.
    pub fn fit(train: &Partition) -> Result<Self> {
        Ok(Self {
            features: Standardizer::fit(train.samples())?,
            target:   TargetScaler::fit(train.samples())?,
        })
    }

    /// Scale features and target of a whole partition.
    pub fn apply(&self, partition: &Partition) -> Partition {
        self.target.transform_partition(&self.features.transform_partition(partition))
    }
}
