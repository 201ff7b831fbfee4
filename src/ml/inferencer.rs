// ============================================================
// Layer 5 — Inferencer
// ============================================================
use anyhow::{ensure, Result};
use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::data::{batcher::RegressionBatcher, standardizer::FittedScalers};
use crate::domain::{house::HouseFeatures, sample::Sample};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::{HousePriceMlp, HousePriceMlpConfig};
use crate::ml::regressor::InferBackend;

pub struct Inferencer {
    model:   HousePriceMlp<InferBackend>,
    scalers: FittedScalers,
    batcher: RegressionBatcher<InferBackend>,
}

impl Inferencer {
    pub fn new(
        model:   HousePriceMlp<InferBackend>,
        scalers: FittedScalers,
        device:  <InferBackend as Backend>::Device,
    ) -> Result<Self> {
        ensure!(
            model.num_features() == scalers.features.dim(),
            "model expects {} features but the scalers were fitted on {}",
            model.num_features(),
            scalers.features.dim()
        );
        Ok(Self { model, scalers, batcher: RegressionBatcher::new(device) })
    }

    /// Rebuild the network from the saved scalers and best weights.
    pub fn from_checkpoint(ckpt_manager: &CheckpointManager) -> Result<Self> {
        let device  = <InferBackend as Backend>::Device::default();
        let cfg     = ckpt_manager.load_config()?;
        let scalers = ckpt_manager.load_scalers()?;
        let best    = ckpt_manager.best()?;

        let model = HousePriceMlpConfig::new(scalers.features.dim())
            .init::<InferBackend>(&device)
            .load_weights(&ckpt_manager.weights_path(), &device)?;
        tracing::info!(
            "Model loaded from epoch {} (val_loss={:.6}, trained with lr={}, batch size {})",
            best.epoch,
            best.val_loss,
            cfg.lr,
            cfg.batch_size
        );
        Self::new(model, scalers, device)
    }

    /// Predicted prices, one per house, in input order.
    pub fn predict(&self, houses: &[HouseFeatures]) -> Result<Vec<f64>> {
        if houses.is_empty() {
            return Ok(Vec::new());
        }
        let mut items = Vec::with_capacity(houses.len());
        for house in houses {
            house.validate()?;
            items.push(Sample::new(self.scalers.features.transform(&house.to_vector()), 0.0));
        }

        let batch  = self.batcher.batch(items);
        let output = self.model.forward(batch.features);
        let prices = output
            .into_data()
            .iter::<f32>()
            .map(|y| self.scalers.target.inverse(y as f64))
            .collect();
        Ok(prices)
    }

    pub fn predict_one(&self, house: &HouseFeatures) -> Result<f64> {
        let prices = self.predict(std::slice::from_ref(house))?;
        tracing::debug!("Predicted {:.0} for {:?}", prices[0], house);
        Ok(prices[0])
    }
}
