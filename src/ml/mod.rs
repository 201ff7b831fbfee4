// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All tensor code lives here, apart from the Batcher in
// data::batcher. The harness in trainer.rs is the exception: it
// is generic over TrainableModel and never touches burn.
//
//   model.rs      — HousePriceMlp: features → 128 → 64 → 32 → 1
//                   with ReLU and dropout, plus weight I/O
//
//   regressor.rs  — BurnRegressor: wraps the module and Adam and
//                   implements TrainableModel on the CPU backend
//
//   trainer.rs    — TrainingHarness: epochs, validation, early
//                   stopping and best-checkpoint restore
//
//   evaluator.rs  — test-set metrics in price units and
//                   first-layer feature importance
//
//   inferencer.rs — rebuilds the model from a checkpoint and
//                   predicts prices for new houses
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)

/// MLP regressor architecture
pub mod model;

/// TrainableModel implementation backed by burn
pub mod regressor;

/// Training harness with early stopping
pub mod trainer;

/// Test-set scoring and feature importance
pub mod evaluator;

/// Inference engine — loads checkpoint and predicts prices
pub mod inferencer;
