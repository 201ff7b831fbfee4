// ============================================================
// Layer 3 — Training History
// ============================================================
// One EpochMetrics row per completed epoch, and the history
// that keeps them as four parallel sequences:
//
//   train_loss[i], val_loss[i], train_mae[i], val_mae[i]
//
// all describe epoch i + 1. The parallel layout is what a
// plotting tool wants; `epochs()` gives the row view back.

use serde::{Deserialize, Serialize};

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Average MSE over all training batches
    pub train_loss: f64,

    /// Average MSE over all validation batches
    pub val_loss: f64,

    /// Average mean-absolute-error over all training batches
    pub train_mae: f64,

    /// Average mean-absolute-error over all validation batches
    pub val_mae: f64,
}

impl EpochMetrics {
    pub fn new(
        epoch:      usize,
        train_loss: f64,
        val_loss:   f64,
        train_mae:  f64,
        val_mae:    f64,
    ) -> Self {
        Self { epoch, train_loss, val_loss, train_mae, val_mae }
    }

    /// Returns true if this epoch strictly improved over `best_val_loss`
    pub fn is_improvement(&self, best_val_loss: f64) -> bool {
        self.val_loss < best_val_loss
    }
}

/// Ordered per-epoch log, one entry per completed epoch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    pub train_loss: Vec<f64>,
    pub val_loss:   Vec<f64>,
    pub train_mae:  Vec<f64>,
    pub val_mae:    Vec<f64>,
}

impl TrainingHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, m: &EpochMetrics) {
        self.train_loss.push(m.train_loss);
        self.val_loss.push(m.val_loss);
        self.train_mae.push(m.train_mae);
        self.val_mae.push(m.val_mae);
    }

    pub fn len(&self) -> usize {
        self.val_loss.len()
    }

    pub fn is_empty(&self) -> bool {
        self.val_loss.is_empty()
    }

    /// Row view of the history, epochs numbered from 1.
    pub fn epochs(&self) -> impl Iterator<Item = EpochMetrics> + '_ {
        (0..self.len()).map(move |i| EpochMetrics::new(
            i + 1,
            self.train_loss[i],
            self.val_loss[i],
            self.train_mae[i],
            self.val_mae[i],
        ))
    }

    /// Epoch (1-based) with the lowest validation loss; the earliest wins ties.
    pub fn best_epoch(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, &loss) in self.val_loss.iter().enumerate() {
            match best {
                Some((_, b)) if loss >= b => {}
                _ => best = Some((i + 1, loss)),
            }
        }
        best.map(|(epoch, _)| epoch)
    }
}
