// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Owns the checkpoint directory and everything in it.
//
// What gets saved:
//   1. Model weights (best_model.*)  — ONE file, overwritten each
//      time validation loss strictly improves. The model decides
//      the on-disk format through the Checkpointable trait.
//   2. best_epoch.json               — epoch and val_loss the
//                                      weights file belongs to
//   3. train_config.json             — hyperparameters, so the
//                                      inferencer can rebuild the
//                                      same architecture
//   4. scalers.json                  — standardizer statistics
//                                      fitted on the train split
//
// File layout:
//   checkpoints/
//     best_model.mpk      ← weights of the best epoch so far
//     best_epoch.json     ← {"epoch": 7, "val_loss": 0.0412}
//     train_config.json
//     scalers.json

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::application::train_use_case::TrainConfig;
use crate::data::standardizer::FittedScalers;
use crate::domain::traits::Checkpointable;
use crate::error::TrainError;

const WEIGHTS_STEM:  &str = "best_model";
const BEST_FILE:     &str = "best_epoch.json";
const CONFIG_FILE:   &str = "train_config.json";
const SCALERS_FILE:  &str = "scalers.json";

/// Which epoch the weights on disk came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestCheckpoint {
    pub epoch:    usize,
    pub val_loss: f64,
}

/// Manages saving and loading of the best checkpoint and its side files.
#[derive(Debug, Clone)]
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a new CheckpointManager, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create checkpoint dir '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path handed to the model for its weights. Recorders may add an
    /// extension of their own.
    pub fn weights_path(&self) -> PathBuf {
        self.dir.join(WEIGHTS_STEM)
    }

    /// Overwrite the checkpoint with the model's current parameters.
    pub fn save_best<M: Checkpointable>(
        &self,
        model:    &M,
        epoch:    usize,
        val_loss: f64,
    ) -> Result<(), TrainError> {
        let path = self.weights_path();
        model
            .save_checkpoint(&path)
            .map_err(|source| TrainError::Persistence { path: path.clone(), source })?;

        self.write_json(BEST_FILE, &BestCheckpoint { epoch, val_loss })
            .map_err(|source| TrainError::Persistence { path: self.dir.join(BEST_FILE), source })?;

        tracing::debug!("Saved checkpoint: epoch {} (val_loss={:.6})", epoch, val_loss);
        Ok(())
    }

    /// Load the checkpointed parameters back into `model`.
    pub fn restore_best<M: Checkpointable>(&self, model: &mut M) -> Result<BestCheckpoint, TrainError> {
        let best = self
            .best()
            .map_err(|source| TrainError::Persistence { path: self.dir.join(BEST_FILE), source })?;

        let path = self.weights_path();
        model
            .restore_checkpoint(&path)
            .map_err(|source| TrainError::Persistence { path, source })?;

        tracing::info!("Restored checkpoint from epoch {}", best.epoch);
        Ok(best)
    }

    /// Read best_epoch.json. Fails if no checkpoint was written yet.
    pub fn best(&self) -> Result<BestCheckpoint> {
        self.read_json(BEST_FILE, "Have you run 'train' first?")
    }

    /// Save the training configuration to JSON.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        self.write_json(CONFIG_FILE, cfg)
    }

    pub fn load_config(&self) -> Result<TrainConfig> {
        self.read_json(CONFIG_FILE, "Make sure you have run 'train' before 'predict'.")
    }

    pub fn save_scalers(&self, scalers: &FittedScalers) -> Result<()> {
        self.write_json(SCALERS_FILE, scalers)
    }

    pub fn load_scalers(&self) -> Result<FittedScalers> {
        self.read_json(SCALERS_FILE, "Make sure you have run 'train' before 'predict'.")
    }

    fn write_json<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<()> {
        let path = self.dir.join(name);
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write '{}'", path.display()))?;
        tracing::debug!("Wrote '{}'", path.display());
        Ok(())
    }

    fn read_json<T: DeserializeOwned>(&self, name: &str, hint: &str) -> Result<T> {
        let path = self.dir.join(name);
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read '{}'. {hint}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Malformed '{}'", path.display()))
    }
}
