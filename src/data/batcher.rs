// ============================================================
// Layer 4 — Batch Planning and Tensor Batcher
// ============================================================
// Two halves:
//
//   1. Index planning (framework-free, used by the harness)
//        shuffled_batches   → train order, reshuffled every epoch
//        sequential_batches → fixed order for validation/test
//      Both cut with `chunks(batch_size)`, so the last batch may
//      be smaller than batch_size and no sample is ever dropped.
//
//   2. RegressionBatcher — implements Burn's Batcher trait to
//      stack a Vec<Sample> into tensors:
//        features: [batch, num_features]
//        targets:  [batch, 1]
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};
use rand::{seq::SliceRandom, Rng};

use crate::domain::sample::Sample;

// ─── Index planning ───────────────────────────────────────────────────────────

/// Shuffle `0..len` and cut it into batches of at most `batch_size`.
///
/// `batch_size` must be non-zero; the harness validates this up front.
pub fn shuffled_batches<R: Rng + ?Sized>(len: usize, batch_size: usize, rng: &mut R) -> Vec<Vec<usize>> {
    let mut order: Vec<usize> = (0..len).collect();
    order.shuffle(rng);
    order.chunks(batch_size).map(<[usize]>::to_vec).collect()
}

/// Cut `0..len` into consecutive batches of at most `batch_size`.
pub fn sequential_batches(len: usize, batch_size: usize) -> Vec<Vec<usize>> {
    let order: Vec<usize> = (0..len).collect();
    order.chunks(batch_size).map(<[usize]>::to_vec).collect()
}

// ─── RegressionBatch ──────────────────────────────────────────────────────────
/// A batch of samples ready for the model forward pass.
/// All tensors have batch_size as their first dimension.
#[derive(Debug, Clone)]
pub struct RegressionBatch<B: Backend> {
    /// Feature rows — shape: [batch_size, num_features]
    pub features: Tensor<B, 2>,

    /// Targets — shape: [batch_size, 1]
    pub targets: Tensor<B, 2>,
}

impl<B: Backend> RegressionBatch<B> {
    pub fn size(&self) -> usize {
        self.features.dims()[0]
    }
}

// ─── RegressionBatcher ────────────────────────────────────────────────────────
/// Holds the target device so tensors are created on the right CPU/GPU.
#[derive(Clone, Debug)]
pub struct RegressionBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> RegressionBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<Sample, RegressionBatch<B>> for RegressionBatcher<B> {
    /// Flatten all feature rows into one Vec<f32>, build a 1D tensor,
    /// then reshape to [batch_size, num_features].
    fn batch(&self, items: Vec<Sample>) -> RegressionBatch<B> {
        let batch_size   = items.len();
        let num_features = items.first().map_or(0, Sample::dim);

        let features_flat: Vec<f32> = items
            .iter()
            .flat_map(|s| s.features.iter().copied())
            .collect();

        let targets: Vec<f32> = items.iter().map(|s| s.target).collect();

        let features = Tensor::<B, 1>::from_floats(features_flat.as_slice(), &self.device)
            .reshape([batch_size, num_features]);

        let targets = Tensor::<B, 1>::from_floats(targets.as_slice(), &self.device)
            .reshape([batch_size, 1]);

        RegressionBatch { features, targets }
    }
}
