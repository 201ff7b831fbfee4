// ============================================================
// Layer 3 — Sample and Partition
// ============================================================
// A Sample is one row of the tabular dataset: a fixed-length
// feature vector and the scalar regression target.
//
// A Partition is a named, ordered run of samples. The dataset
// is cut into three disjoint partitions (train / validation /
// test) exactly once, before any statistics are fitted.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One labelled example. Immutable once generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Feature vector, always `FEATURE_COUNT` long for housing data
    pub features: Vec<f32>,

    /// Regression target (the house price, possibly scaled)
    pub target: f32,
}

impl Sample {
    pub fn new(features: Vec<f32>, target: f32) -> Self {
        Self { features, target }
    }

    pub fn dim(&self) -> usize {
        self.features.len()
    }
}

/// Which slice of the dataset a partition holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartitionKind {
    Train,
    Validation,
    Test,
}

impl PartitionKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Train      => "train",
            Self::Validation => "validation",
            Self::Test       => "test",
        }
    }
}

impl fmt::Display for PartitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named, ordered sequence of samples.
#[derive(Debug, Clone)]
pub struct Partition {
    kind:    PartitionKind,
    samples: Vec<Sample>,
}

impl Partition {
    pub fn new(kind: PartitionKind, samples: Vec<Sample>) -> Self {
        Self { kind, samples }
    }

    pub fn kind(&self) -> PartitionKind {
        self.kind
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn targets(&self) -> impl Iterator<Item = f32> + '_ {
        self.samples.iter().map(|s| s.target)
    }

    /// Gather the samples at `indices` into an owned batch.
    pub fn gather(&self, indices: &[usize]) -> Vec<Sample> {
        indices.iter().map(|&i| self.samples[i].clone()).collect()
    }

    /// Rebuild the partition with every sample passed through `f`.
    /// The kind and the order are kept.
    pub fn map_samples(&self, f: impl Fn(&Sample) -> Sample) -> Self {
        Self {
            kind:    self.kind,
            samples: self.samples.iter().map(f).collect(),
        }
    }
}

/// The three disjoint partitions of one dataset.
#[derive(Debug, Clone)]
pub struct Partitions {
    pub train:      Partition,
    pub validation: Partition,
    pub test:       Partition,
}
