use burn::data::dataset::Dataset;

use crate::domain::sample::{Partition, Sample};

/// Burn-facing view of a partition, so burn's DataLoader can
/// call `.get(index)` and `.len()` on it.
pub struct HousingDataset {
    samples: Vec<Sample>,
}

impl HousingDataset {
    pub fn new(samples: Vec<Sample>) -> Self { Self { samples } }

    pub fn from_partition(partition: &Partition) -> Self {
        Self::new(partition.samples().to_vec())
    }
}

impl Dataset<Sample> for HousingDataset {
    fn get(&self, index: usize) -> Option<Sample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
