// ============================================================
// Layer 2 — Predict Use Case
// ============================================================
// Loads the best checkpoint written by `train` and prices one
// house at a time.

use anyhow::Result;
use std::path::Path;

use crate::domain::house::HouseFeatures;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::inferencer::Inferencer;

pub struct PredictUseCase {
    inferencer: Inferencer,
}

impl PredictUseCase {
    pub fn new(checkpoint_dir: impl AsRef<Path>) -> Result<Self> {
        let ckpt       = CheckpointManager::new(checkpoint_dir.as_ref())?;
        let inferencer = Inferencer::from_checkpoint(&ckpt)?;
        Ok(Self { inferencer })
    }

    pub fn predict(&self, house: &HouseFeatures) -> Result<f64> {
        self.inferencer.predict_one(house)
    }
}
