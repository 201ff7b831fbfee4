use std::path::Path;

use anyhow::{anyhow, Context, Result};
use burn::{
    nn::{Dropout, DropoutConfig, Linear, LinearConfig},
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkFileRecorder, Recorder},
    tensor::activation::relu,
};

#[derive(Config, Debug)]
pub struct HousePriceMlpConfig {
    pub num_features: usize,
    #[config(default = 0.3)]
    pub dropout_first: f64,
    #[config(default = 0.2)]
    pub dropout_second: f64,
}

impl HousePriceMlpConfig {
    /// features → 128 → 64 → 32 → 1
    pub fn init<B: Backend>(&self, device: &B::Device) -> HousePriceMlp<B> {
        HousePriceMlp {
            input:    LinearConfig::new(self.num_features, 128).init(device),
            hidden1:  LinearConfig::new(128, 64).init(device),
            hidden2:  LinearConfig::new(64, 32).init(device),
            output:   LinearConfig::new(32, 1).init(device),
            dropout1: DropoutConfig::new(self.dropout_first).init(),
            dropout2: DropoutConfig::new(self.dropout_second).init(),
        }
    }
}

#[derive(Module, Debug)]
pub struct HousePriceMlp<B: Backend> {
    pub input:    Linear<B>,
    pub hidden1:  Linear<B>,
    pub hidden2:  Linear<B>,
    pub output:   Linear<B>,
    pub dropout1: Dropout,
    pub dropout2: Dropout,
}

impl<B: Backend> HousePriceMlp<B> {
    /// features: [batch, num_features] → prediction: [batch, 1]
    pub fn forward(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.dropout1.forward(relu(self.input.forward(features)));
        let x = self.dropout2.forward(relu(self.hidden1.forward(x)));
        let x = relu(self.hidden2.forward(x));
        self.output.forward(x)
    }

    pub fn num_features(&self) -> usize {
        self.input.weight.val().dims()[0]
    }

    /// Mean absolute first-layer weight per input feature.
    /// Linear weights are stored as [d_input, d_output].
    pub fn input_weight_magnitudes(&self) -> Result<Vec<f32>> {
        self.input
            .weight
            .val()
            .abs()
            .mean_dim(1)
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow!("Cannot read first-layer weights: {e:?}"))
    }

    /// Write all parameters at full precision; the recorder appends `.mpk`.
    pub fn save_weights(&self, path: &Path) -> Result<()> {
        Recorder::<B>::record(&recorder(), self.clone().into_record(), path.to_path_buf())
            .with_context(|| format!("Failed to save weights to '{}'", path.display()))
    }

    /// Return this module with the parameters stored at `path`.
    /// The architecture must match the one that was saved.
    pub fn load_weights(self, path: &Path, device: &B::Device) -> Result<Self> {
        let record = Recorder::<B>::load(&recorder(), path.to_path_buf(), device)
            .with_context(|| {
                format!("Cannot load weights '{}'. Have you trained the model first?", path.display())
            })?;
        Ok(self.load_record(record))
    }
}

// Full precision so a reloaded model reproduces its validation loss exactly.
fn recorder() -> NamedMpkFileRecorder<FullPrecisionSettings> {
    NamedMpkFileRecorder::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_forward_shape() {
        let device = Default::default();
        let model  = HousePriceMlpConfig::new(7).init::<TestBackend>(&device);
        let x      = Tensor::<TestBackend, 2>::zeros([5, 7], &device);
        assert_eq!(model.forward(x).dims(), [5, 1]);
        assert_eq!(model.num_features(), 7);
        assert_eq!(model.input_weight_magnitudes().unwrap().len(), 7);
    }

    #[test]
    fn test_weights_round_trip() {
        let dir    = tempfile::tempdir().unwrap();
        let path   = dir.path().join("weights");
        let device = Default::default();

        let a = HousePriceMlpConfig::new(3).init::<TestBackend>(&device);
        a.save_weights(&path).unwrap();

        let b = HousePriceMlpConfig::new(3)
            .init::<TestBackend>(&device)
            .load_weights(&path, &device)
            .unwrap();

        let x = Tensor::<TestBackend, 2>::ones([2, 3], &device);
        let ya: Vec<f32> = a.forward(x.clone()).into_data().iter::<f32>().collect();
        let yb: Vec<f32> = b.forward(x).into_data().iter::<f32>().collect();
        assert_eq!(ya, yb);
    }
}
