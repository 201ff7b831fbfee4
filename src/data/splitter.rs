// ============================================================
// Layer 4 — Train/Validation/Test Splitter
// ============================================================
// Randomly shuffles samples and splits them into disjoint sets:
//   - Test set:       held out until the very end
//   - Validation set: drives early stopping and checkpointing
//   - Training set:   used to update model weights
//
// The test set is cut first (default 20% of everything), then
// the validation set from what remains (default 20% of that).
//
// The RNG is passed in, so a fixed seed gives a fixed split.
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom.

use anyhow::Result;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use crate::domain::sample::{Partition, PartitionKind, Partitions, Sample};
use crate::error::TrainError;

/// Randomly shuffle `samples` and split into (train, validation).
///
/// # Arguments
/// * `samples`        - All available samples (consumed by this function)
/// * `train_fraction` - Proportion for the first set, e.g. 0.8 = 80%
/// * `rng`            - Source of randomness for the shuffle
///
/// # Returns
/// A tuple (first, second); `first` holds round(len * train_fraction) items
pub fn split_train_val<T, R: Rng + ?Sized>(
    mut samples:    Vec<T>,
    train_fraction: f64,
    rng:            &mut R,
) -> (Vec<T>, Vec<T>) {
    samples.shuffle(rng);

    // e.g. 100 samples * 0.8 = 80 → first 80 are training
    let total    = samples.len();
    let split_at = ((total as f64) * train_fraction).round() as usize;

    // Clamp to valid range to avoid panics on tiny datasets
    let split_at = split_at.min(total);

    // After this: samples = [0..split_at], rest = [split_at..total]
    let rest = samples.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} / {} ({}% / {}%)",
        samples.len(),
        rest.len(),
        (samples.len() * 100) / total.max(1),
        (rest.len()    * 100) / total.max(1),
    );

    (samples, rest)
}

/// Cut the dataset into disjoint train / validation / test partitions.
///
/// Fails with a configuration error if a fraction is outside (0, 1)
/// or any partition would end up empty.
pub fn partition_dataset(
    samples:       Vec<Sample>,
    test_fraction: f64,
    val_fraction:  f64,
    seed:          u64,
) -> Result<Partitions> {
    for (name, f) in [("test fraction", test_fraction), ("validation fraction", val_fraction)] {
        if !(f > 0.0 && f < 1.0) {
            return Err(TrainError::InvalidConfig(format!("{name} must be in (0, 1), got {f}")).into());
        }
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let (rest, test)  = split_train_val(samples, 1.0 - test_fraction, &mut rng);
    let (train, val)  = split_train_val(rest,    1.0 - val_fraction,  &mut rng);

    let partitions = Partitions {
        train:      Partition::new(PartitionKind::Train,      train),
        validation: Partition::new(PartitionKind::Validation, val),
        test:       Partition::new(PartitionKind::Test,       test),
    };

    for p in [&partitions.train, &partitions.validation, &partitions.test] {
        if p.is_empty() {
            return Err(TrainError::EmptyPartition(p.kind().name()).into());
        }
    }

    Ok(partitions)
}
