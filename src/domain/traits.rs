// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The training harness never sees a tensor. It drives anything
// that implements TrainableModel:
//
//   - BurnRegressor → the real MLP on burn's autodiff backend
//   - test fakes    → scripted losses for the early-stopping logic
//
// Backend and device choices stay behind the implementation.

use std::path::Path;

use anyhow::Result;

use crate::domain::sample::Sample;

// ─── DatasetSource ────────────────────────────────────────────────────────────
/// Any component that can produce the full set of labelled samples.
///
/// Implementations:
///   - SyntheticHousing → seeded synthetic housing data
pub trait DatasetSource {
    /// Load every available sample.
    fn load_all(&self) -> Result<Vec<Sample>>;
}

// ─── BatchStats ───────────────────────────────────────────────────────────────
/// What one forward pass over a batch reports back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchStats {
    /// Mean loss over the batch (the optimised objective)
    pub loss: f64,

    /// Mean absolute error over the batch
    pub mae: f64,

    /// Number of samples in the batch
    pub size: usize,
}

// ─── Checkpointable ───────────────────────────────────────────────────────────
/// Any component whose parameters can be written to and restored
/// from a single file.
pub trait Checkpointable {
    /// Write all trainable parameters to `path`, replacing any previous file.
    fn save_checkpoint(&self, path: &Path) -> Result<()>;

    /// Replace the current parameters with the ones stored at `path`.
    fn restore_checkpoint(&mut self, path: &Path) -> Result<()>;
}

// ─── TrainableModel ───────────────────────────────────────────────────────────
/// A differentiable model the training harness can optimise.
pub trait TrainableModel: Checkpointable {
    /// Forward pass, loss, backward pass and one optimiser step.
    /// Gradients must be cleared before this returns.
    fn train_batch(&mut self, batch: &[Sample]) -> Result<BatchStats>;

    /// Read-only forward pass; never changes parameters.
    fn eval_batch(&self, batch: &[Sample]) -> Result<BatchStats>;
}
