// ============================================================
// Layer 5 — Training Harness
// ============================================================
// Mini-batch training with validation-driven early stopping.
//
// Per epoch:
//   1. train phase      — shuffled batches (seeded, reshuffled
//                          every epoch), one optimiser step each
//   2. validation phase — fixed-order batches, read-only
//   3. record the averaged metrics in the history
//   4. early-stopping decision:
//        val_loss <  best → save checkpoint, counter = 0
//        val_loss >= best → counter += 1, stop at `patience`
//
// After the loop the best checkpoint is loaded back into the
// model, so the caller always receives the best-validation
// parameters, never those of a later, worse epoch.
//
// The harness only sees the TrainableModel trait, so the
// stopping logic is tested below with scripted fake models.

use anyhow::Result;
use rand::{rngs::StdRng, SeedableRng};
use std::fmt;

use crate::data::batcher::{sequential_batches, shuffled_batches};
use crate::domain::{
    history::{EpochMetrics, TrainingHistory},
    sample::Partition,
    traits::{BatchStats, TrainableModel},
};
use crate::error::TrainError;
use crate::infra::checkpoint::CheckpointManager;

// ─── Configuration ────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarnessConfig {
    pub batch_size: usize,
    pub num_epochs: usize,
    pub patience:   usize,
    /// Seed for the per-epoch shuffle of the training partition
    pub seed:       u64,
}

impl HarnessConfig {
    pub fn validate(&self) -> Result<(), TrainError> {
        if self.batch_size == 0 {
            return Err(TrainError::InvalidConfig("batch size must be positive".into()));
        }
        if self.num_epochs == 0 {
            return Err(TrainError::InvalidConfig("number of epochs must be positive".into()));
        }
        if self.patience == 0 {
            return Err(TrainError::InvalidConfig("patience must be positive".into()));
        }
        Ok(())
    }
}

// ─── Training state ───────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingStatus {
    Running,
    /// Validation loss stagnated for `patience` epochs
    EarlyStopped,
    /// All `num_epochs` epochs ran
    Exhausted,
}

impl fmt::Display for TrainingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainingStatus::Running      => write!(f, "running"),
            TrainingStatus::EarlyStopped => write!(f, "early stopped"),
            TrainingStatus::Exhausted    => write!(f, "max epochs reached"),
        }
    }
}

/// What the harness must do after observing an epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpochDecision {
    /// New best: overwrite the checkpoint
    Improved,
    /// No improvement, patience not used up
    Stagnated,
    /// Patience used up: this was the last epoch
    Stop,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingState {
    /// Completed epochs (1-based once the first epoch ends)
    pub epoch:                      usize,
    pub best_val_loss:              f64,
    pub best_epoch:                 Option<usize>,
    pub epochs_without_improvement: usize,
    pub status:                     TrainingStatus,
}

impl Default for TrainingState {
    fn default() -> Self {
        Self {
            epoch:                      0,
            best_val_loss:              f64::INFINITY,
            best_epoch:                 None,
            epochs_without_improvement: 0,
            status:                     TrainingStatus::Running,
        }
    }
}

impl TrainingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.status == TrainingStatus::Running
    }

    /// Fold one finished epoch into the state.
    ///
    /// Only a strictly lower loss counts as an improvement, so on ties
    /// the earlier epoch stays the best one.
    pub fn observe(&mut self, metrics: &EpochMetrics, config: &HarnessConfig) -> EpochDecision {
        self.epoch += 1;

        let decision = if metrics.is_improvement(self.best_val_loss) {
            self.best_val_loss              = metrics.val_loss;
            self.best_epoch                 = Some(self.epoch);
            self.epochs_without_improvement = 0;
            EpochDecision::Improved
        } else {
            self.epochs_without_improvement += 1;
            if self.epochs_without_improvement >= config.patience {
                EpochDecision::Stop
            } else {
                EpochDecision::Stagnated
            }
        };

        if decision == EpochDecision::Stop {
            self.status = TrainingStatus::EarlyStopped;
        } else if self.epoch >= config.num_epochs {
            self.status = TrainingStatus::Exhausted;
        }
        decision
    }
}

/// What `run` hands back: the model holding the best checkpoint,
/// the terminal state and the per-epoch history.
pub struct TrainOutcome<M> {
    pub model:   M,
    pub state:   TrainingState,
    pub history: TrainingHistory,
}

// ─── Per-phase accumulator ────────────────────────────────────────────────────
#[derive(Debug, Default)]
struct PhaseTotals {
    loss_sum: f64,
    mae_sum:  f64,
    batches:  usize,
    samples:  usize,
}

impl PhaseTotals {
    fn add(&mut self, stats: BatchStats, epoch: usize, phase: &'static str) -> Result<(), TrainError> {
        for value in [stats.loss, stats.mae] {
            if !value.is_finite() {
                return Err(TrainError::NumericInstability { epoch, phase, value });
            }
        }
        self.loss_sum += stats.loss;
        self.mae_sum  += stats.mae;
        self.batches  += 1;
        self.samples  += stats.size;
        Ok(())
    }

    /// (mean loss, mean MAE) over batches. Never called with zero batches.
    fn means(&self) -> (f64, f64) {
        let n = self.batches as f64;
        (self.loss_sum / n, self.mae_sum / n)
    }
}

// ─── Harness ──────────────────────────────────────────────────────────────────
pub struct TrainingHarness<'a> {
    config:      HarnessConfig,
    checkpoints: &'a CheckpointManager,
}

impl<'a> TrainingHarness<'a> {
    pub fn new(config: HarnessConfig, checkpoints: &'a CheckpointManager) -> Result<Self, TrainError> {
        config.validate()?;
        Ok(Self { config, checkpoints })
    }

    /// Train `model` until patience runs out or all epochs are used,
    /// then return it with the best checkpoint loaded.
    pub fn run<M: TrainableModel>(
        &self,
        mut model:  M,
        train:      &Partition,
        validation: &Partition,
    ) -> Result<TrainOutcome<M>> {
        for partition in [train, validation] {
            if partition.is_empty() {
                return Err(TrainError::EmptyPartition(partition.kind().name()).into());
            }
        }
        tracing::info!(
            "Training on {} samples, validating on {} (batch size {}, up to {} epochs, patience {})",
            train.len(),
            validation.len(),
            self.config.batch_size,
            self.config.num_epochs,
            self.config.patience,
        );

        let mut rng     = StdRng::seed_from_u64(self.config.seed);
        let mut state   = TrainingState::new();
        let mut history = TrainingHistory::new();

        while state.is_running() {
            let epoch = state.epoch + 1;

            // ── Training phase ────────────────────────────────────────────────
            let mut totals = PhaseTotals::default();
            for indices in shuffled_batches(train.len(), self.config.batch_size, &mut rng) {
                let stats = model.train_batch(&train.gather(&indices))?;
                totals.add(stats, epoch, "train")?;
            }
            debug_assert_eq!(totals.samples, train.len());
            let (train_loss, train_mae) = totals.means();

            // ── Validation phase ──────────────────────────────────────────────
            let (val_loss, val_mae) = self.evaluate_epoch(&model, validation, epoch)?;

            let metrics = EpochMetrics::new(epoch, train_loss, val_loss, train_mae, val_mae);
            history.record(&metrics);
            tracing::info!(
                "Epoch {:>3}/{} | train_loss={:.4} | val_loss={:.4} | train_mae={:.4} | val_mae={:.4}",
                epoch, self.config.num_epochs, train_loss, val_loss, train_mae, val_mae,
            );

            // ── Early-stopping decision ───────────────────────────────────────
            match state.observe(&metrics, &self.config) {
                EpochDecision::Improved => {
                    self.checkpoints.save_best(&model, epoch, val_loss)?;
                }
                EpochDecision::Stagnated => {
                    tracing::debug!(
                        "No improvement for {}/{} epochs",
                        state.epochs_without_improvement,
                        self.config.patience
                    );
                }
                EpochDecision::Stop => {
                    tracing::warn!(
                        "Early stopping at epoch {}: no improvement for {} epochs",
                        epoch,
                        state.epochs_without_improvement
                    );
                }
            }
        }

        let best = self.checkpoints.restore_best(&mut model)?;
        if Some(best.epoch) != state.best_epoch {
            return Err(TrainError::Persistence {
                path:   self.checkpoints.dir().to_path_buf(),
                source: anyhow::anyhow!(
                    "checkpoint holds epoch {}, expected {:?}",
                    best.epoch,
                    state.best_epoch
                ),
            }
            .into());
        }

        tracing::info!(
            "Training {} after {} epochs; best epoch {} (val_loss={:.6})",
            state.status,
            state.epoch,
            best.epoch,
            state.best_val_loss
        );
        Ok(TrainOutcome { model, state, history })
    }

    /// Mean (loss, MAE) of `model` over `partition` in fixed-order batches.
    pub fn evaluate<M: TrainableModel>(&self, model: &M, partition: &Partition) -> Result<(f64, f64)> {
        if partition.is_empty() {
            return Err(TrainError::EmptyPartition(partition.kind().name()).into());
        }
        self.evaluate_epoch(model, partition, 0)
    }

    fn evaluate_epoch<M: TrainableModel>(
        &self,
        model:     &M,
        partition: &Partition,
        epoch:     usize,
    ) -> Result<(f64, f64)> {
        let mut totals = PhaseTotals::default();
        for indices in sequential_batches(partition.len(), self.config.batch_size) {
            let stats = model.eval_batch(&partition.gather(&indices))?;
            totals.add(stats, epoch, "validation")?;
        }
        debug_assert_eq!(totals.samples, partition.len());
        Ok(totals.means())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sample::{PartitionKind, Sample};
    use crate::domain::traits::Checkpointable;
    use std::{cell::Cell, fs, path::Path};

    // ── Fakes ─────────────────────────────────────────────────────────────────

    /// Replays a fixed validation-loss script. Its only "parameter" is
    /// the number of epochs trained, so a restored checkpoint tells
    /// which epoch it came from.
    struct ScriptedModel {
        val_losses: Vec<f64>,
        params:     usize,
    }

    impl ScriptedModel {
        fn new(val_losses: &[f64]) -> Self {
            Self { val_losses: val_losses.to_vec(), params: 0 }
        }
    }

    impl Checkpointable for ScriptedModel {
        fn save_checkpoint(&self, path: &Path) -> Result<()> {
            fs::write(path, self.params.to_string())?;
            Ok(())
        }

        fn restore_checkpoint(&mut self, path: &Path) -> Result<()> {
            self.params = fs::read_to_string(path)?.parse()?;
            Ok(())
        }
    }

    impl TrainableModel for ScriptedModel {
        // Called once per epoch: the fixture uses a single train batch.
        fn train_batch(&mut self, batch: &[Sample]) -> Result<BatchStats> {
            self.params += 1;
            Ok(BatchStats { loss: 1.0, mae: 1.0, size: batch.len() })
        }

        fn eval_batch(&self, batch: &[Sample]) -> Result<BatchStats> {
            let loss = *self
                .val_losses
                .get(self.params - 1)
                .ok_or_else(|| anyhow::anyhow!("epoch {} is past the script", self.params))?;
            Ok(BatchStats { loss, mae: loss, size: batch.len() })
        }
    }

    /// y = w * x0 fitted by plain gradient descent on MSE.
    struct LinearModel {
        w:          f64,
        lr:         f64,
        trajectory: Vec<f64>,
        seen:       usize,
        evaluated:  Cell<usize>,
    }

    impl LinearModel {
        fn new() -> Self {
            Self { w: 0.0, lr: 0.05, trajectory: Vec::new(), seen: 0, evaluated: Cell::new(0) }
        }

        fn stats(&self, batch: &[Sample]) -> BatchStats {
            let n = batch.len() as f64;
            let (mut se, mut ae) = (0.0, 0.0);
            for s in batch {
                let err = self.w * s.features[0] as f64 - s.target as f64;
                se += err * err;
                ae += err.abs();
            }
            BatchStats { loss: se / n, mae: ae / n, size: batch.len() }
        }
    }

    impl Checkpointable for LinearModel {
        fn save_checkpoint(&self, path: &Path) -> Result<()> {
            fs::write(path, serde_json::to_string(&self.w)?)?;
            Ok(())
        }

        fn restore_checkpoint(&mut self, path: &Path) -> Result<()> {
            self.w = serde_json::from_str(&fs::read_to_string(path)?)?;
            Ok(())
        }
    }

    impl TrainableModel for LinearModel {
        fn train_batch(&mut self, batch: &[Sample]) -> Result<BatchStats> {
            let stats = self.stats(batch);
            let grad  = batch
                .iter()
                .map(|s| {
                    let x = s.features[0] as f64;
                    2.0 * (self.w * x - s.target as f64) * x
                })
                .sum::<f64>()
                / batch.len() as f64;
            self.w -= self.lr * grad;
            self.trajectory.push(self.w);
            self.seen += batch.len();
            Ok(stats)
        }

        fn eval_batch(&self, batch: &[Sample]) -> Result<BatchStats> {
            self.evaluated.set(self.evaluated.get() + batch.len());
            Ok(self.stats(batch))
        }
    }

    /// Trains to an infinite loss on the first batch it sees.
    struct DivergingModel;

    impl Checkpointable for DivergingModel {
        fn save_checkpoint(&self, path: &Path) -> Result<()> {
            fs::write(path, "diverged")?;
            Ok(())
        }

        fn restore_checkpoint(&mut self, _path: &Path) -> Result<()> {
            Ok(())
        }
    }

    impl TrainableModel for DivergingModel {
        fn train_batch(&mut self, batch: &[Sample]) -> Result<BatchStats> {
            Ok(BatchStats { loss: f64::INFINITY, mae: f64::INFINITY, size: batch.len() })
        }

        fn eval_batch(&self, batch: &[Sample]) -> Result<BatchStats> {
            Ok(BatchStats { loss: 1.0, mae: 1.0, size: batch.len() })
        }
    }

    /// Saves normally but cannot read its own weights back.
    struct UnreadableModel(ScriptedModel);

    impl Checkpointable for UnreadableModel {
        fn save_checkpoint(&self, path: &Path) -> Result<()> {
            self.0.save_checkpoint(path)
        }

        fn restore_checkpoint(&mut self, path: &Path) -> Result<()> {
            anyhow::bail!("weights at {} are corrupt", path.display())
        }
    }

    impl TrainableModel for UnreadableModel {
        fn train_batch(&mut self, batch: &[Sample]) -> Result<BatchStats> {
            self.0.train_batch(batch)
        }

        fn eval_batch(&self, batch: &[Sample]) -> Result<BatchStats> {
            self.0.eval_batch(batch)
        }
    }

    // ── Fixtures ──────────────────────────────────────────────────────────────

    fn partition(kind: PartitionKind, n: usize, slope: f32) -> Partition {
        let samples = (0..n)
            .map(|i| {
                let x = i as f32 / n as f32;
                Sample::new(vec![x], slope * x)
            })
            .collect();
        Partition::new(kind, samples)
    }

    fn config(batch_size: usize, num_epochs: usize, patience: usize) -> HarnessConfig {
        HarnessConfig { batch_size, num_epochs, patience, seed: 42 }
    }

    /// Runs a ScriptedModel with one train batch per epoch.
    fn run_script(
        script:     &[f64],
        num_epochs: usize,
        patience:   usize,
    ) -> (Result<TrainOutcome<ScriptedModel>>, tempfile::TempDir) {
        let dir     = tempfile::tempdir().unwrap();
        let ckpt    = CheckpointManager::new(dir.path()).unwrap();
        let harness = TrainingHarness::new(config(4, num_epochs, patience), &ckpt).unwrap();
        let train   = partition(PartitionKind::Train, 4, 1.0);
        let val     = partition(PartitionKind::Validation, 3, 1.0);
        let result  = harness.run(ScriptedModel::new(script), &train, &val);
        (result, dir)
    }

    // ── Early stopping ────────────────────────────────────────────────────────

    #[test]
    fn test_stops_after_patience_and_restores_best_epoch() {
        let (result, _dir) = run_script(&[10.0, 8.0, 9.0, 9.0, 9.0, 7.0], 10, 3);
        let outcome = result.unwrap();

        assert_eq!(outcome.state.status, TrainingStatus::EarlyStopped);
        assert_eq!(outcome.state.epoch, 5);
        assert_eq!(outcome.state.best_epoch, Some(2));
        assert_eq!(outcome.state.best_val_loss, 8.0);
        assert_eq!(outcome.state.epochs_without_improvement, 3);
        // epoch 6 (val_loss 7) never ran
        assert_eq!(outcome.history.val_loss, vec![10.0, 8.0, 9.0, 9.0, 9.0]);
        assert_eq!(outcome.model.params, 2);
    }

    #[test]
    fn test_exhausted_restores_earlier_best() {
        let (result, dir) = run_script(&[3.0, 5.0, 6.0], 3, 5);
        let outcome = result.unwrap();

        assert_eq!(outcome.state.status, TrainingStatus::Exhausted);
        assert_eq!(outcome.history.len(), 3);
        assert_eq!(outcome.model.params, 1);

        let ckpt = CheckpointManager::new(dir.path()).unwrap();
        assert_eq!(ckpt.best().unwrap().epoch, 1);
    }

    #[test]
    fn test_exhausted_on_improving_last_epoch() {
        let (result, _dir) = run_script(&[5.0, 4.0, 3.0], 3, 1);
        let outcome = result.unwrap();
        assert_eq!(outcome.state.status, TrainingStatus::Exhausted);
        assert_eq!(outcome.model.params, 3);
    }

    #[test]
    fn test_tie_keeps_earliest_epoch() {
        let (result, _dir) = run_script(&[4.0, 2.0, 2.0, 3.0], 4, 10);
        let outcome = result.unwrap();
        assert_eq!(outcome.state.best_epoch, Some(2));
        assert_eq!(outcome.model.params, 2);
        assert_eq!(outcome.history.best_epoch(), Some(2));
    }

    #[test]
    fn test_counter_resets_on_improvement() {
        let cfg       = config(1, 10, 3);
        let mut state = TrainingState::new();
        let mut seen  = Vec::new();
        let epoch = |loss| EpochMetrics::new(0, 1.0, loss, 1.0, 1.0);
        for loss in [5.0, 6.0, 4.0, 7.0, 8.0] {
            state.observe(&epoch(loss), &cfg);
            seen.push(state.epochs_without_improvement);
        }
        assert_eq!(seen, vec![0, 1, 0, 1, 2]);
        assert!(state.is_running());

        assert_eq!(state.observe(&epoch(9.0), &cfg), EpochDecision::Stop);
        assert_eq!(state.status, TrainingStatus::EarlyStopped);
        assert_eq!(state.epoch, state.best_epoch.unwrap() + cfg.patience);
    }

    // ── Data handling ─────────────────────────────────────────────────────────

    #[test]
    fn test_partial_last_batch_is_trained() {
        let dir     = tempfile::tempdir().unwrap();
        let ckpt    = CheckpointManager::new(dir.path()).unwrap();
        let harness = TrainingHarness::new(config(4, 3, 3), &ckpt).unwrap();

        let train   = partition(PartitionKind::Train, 10, 2.0);
        let val     = partition(PartitionKind::Validation, 5, 2.0);
        let outcome = harness.run(LinearModel::new(), &train, &val).unwrap();

        assert_eq!(outcome.history.len(), 3);
        // 3 epochs × 10 samples, batches of 4 + 4 + 2
        assert_eq!(outcome.model.seen, 30);
        assert_eq!(outcome.model.trajectory.len(), 9);
    }

    #[test]
    fn test_validation_targets_do_not_affect_training() {
        let train = partition(PartitionKind::Train, 12, 3.0);

        let trajectory = |val_slope: f32| {
            let dir     = tempfile::tempdir().unwrap();
            let ckpt    = CheckpointManager::new(dir.path()).unwrap();
            // patience == num_epochs, so every run lasts all epochs
            let harness = TrainingHarness::new(config(5, 4, 4), &ckpt).unwrap();
            let val     = partition(PartitionKind::Validation, 6, val_slope);
            harness.run(LinearModel::new(), &train, &val).unwrap().model.trajectory
        };

        assert_eq!(trajectory(3.0), trajectory(-20.0));
    }

    #[test]
    fn test_reloaded_model_matches_best_val_loss() {
        let dir     = tempfile::tempdir().unwrap();
        let ckpt    = CheckpointManager::new(dir.path()).unwrap();
        let harness = TrainingHarness::new(config(3, 8, 2), &ckpt).unwrap();

        let train = partition(PartitionKind::Train, 9, 1.5);
        // validation slope differs, so the best epoch is not the last one
        let val   = partition(PartitionKind::Validation, 4, 0.5);

        let outcome      = harness.run(LinearModel::new(), &train, &val).unwrap();
        let (loss, _mae) = harness.evaluate(&outcome.model, &val).unwrap();
        assert!((loss - outcome.state.best_val_loss).abs() < 1e-12);
    }

    // ── Errors ────────────────────────────────────────────────────────────────

    #[test]
    fn test_rejects_zero_settings() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path()).unwrap();
        for cfg in [config(0, 5, 2), config(4, 0, 2), config(4, 5, 0)] {
            let err = TrainingHarness::new(cfg, &ckpt).err().unwrap();
            assert!(matches!(err, TrainError::InvalidConfig(_)), "{cfg:?}");
        }
    }

    #[test]
    fn test_empty_validation_fails_before_training() {
        let dir     = tempfile::tempdir().unwrap();
        let ckpt    = CheckpointManager::new(dir.path()).unwrap();
        let harness = TrainingHarness::new(config(4, 5, 2), &ckpt).unwrap();

        let train = partition(PartitionKind::Train, 8, 1.0);
        let val   = Partition::new(PartitionKind::Validation, Vec::new());
        let err   = harness.run(LinearModel::new(), &train, &val).err().unwrap();

        assert!(matches!(
            err.downcast_ref::<TrainError>(),
            Some(TrainError::EmptyPartition("validation"))
        ));
        assert!(ckpt.best().is_err());
    }

    #[test]
    fn test_nan_loss_fails_without_checkpointing_that_epoch() {
        let (result, dir) = run_script(&[1.0, f64::NAN], 5, 3);
        let err = result.err().unwrap();

        match err.downcast_ref::<TrainError>() {
            Some(TrainError::NumericInstability { epoch, phase, .. }) => {
                assert_eq!(*epoch, 2);
                assert_eq!(*phase, "validation");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        let ckpt = CheckpointManager::new(dir.path()).unwrap();
        assert_eq!(ckpt.best().unwrap().epoch, 1);
    }

    #[test]
    fn test_infinite_train_loss_fails_before_any_checkpoint() {
        let dir     = tempfile::tempdir().unwrap();
        let ckpt    = CheckpointManager::new(dir.path()).unwrap();
        let harness = TrainingHarness::new(config(2, 3, 2), &ckpt).unwrap();

        let train = partition(PartitionKind::Train, 4, 1.0);
        let val   = partition(PartitionKind::Validation, 3, 1.0);
        let err   = harness.run(DivergingModel, &train, &val).err().unwrap();

        match err.downcast_ref::<TrainError>() {
            Some(TrainError::NumericInstability { epoch, phase, value }) => {
                assert_eq!(*epoch, 1);
                assert_eq!(*phase, "train");
                assert!(value.is_infinite());
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(ckpt.best().is_err());
        assert!(!ckpt.weights_path().exists());
    }

    #[test]
    fn test_failed_restore_is_a_persistence_error() {
        let dir     = tempfile::tempdir().unwrap();
        let ckpt    = CheckpointManager::new(dir.path()).unwrap();
        let harness = TrainingHarness::new(config(4, 3, 2), &ckpt).unwrap();

        let train = partition(PartitionKind::Train, 4, 1.0);
        let val   = partition(PartitionKind::Validation, 3, 1.0);
        let model = UnreadableModel(ScriptedModel::new(&[3.0, 2.0, 1.0]));
        let err   = harness.run(model, &train, &val).err().unwrap();

        assert!(
            matches!(err.downcast_ref::<TrainError>(), Some(TrainError::Persistence { .. })),
            "unexpected error: {err:?}"
        );
        // The checkpoint itself was written before the restore failed.
        assert_eq!(ckpt.best().unwrap().epoch, 3);
    }

    #[test]
    fn test_every_validation_sample_is_scored_each_epoch() {
        let dir     = tempfile::tempdir().unwrap();
        let ckpt    = CheckpointManager::new(dir.path()).unwrap();
        let harness = TrainingHarness::new(config(3, 2, 5), &ckpt).unwrap();

        let train   = partition(PartitionKind::Train, 6, 2.0);
        let val     = partition(PartitionKind::Validation, 7, 2.0);
        let outcome = harness.run(LinearModel::new(), &train, &val).unwrap();

        // 2 epochs × 7 samples, batches of 3 + 3 + 1
        assert_eq!(outcome.history.len(), 2);
        assert_eq!(outcome.model.evaluated.get(), 14);

        outcome.model.evaluated.set(0);
        harness.evaluate(&outcome.model, &val).unwrap();
        assert_eq!(outcome.model.evaluated.get(), 7);
    }
}
