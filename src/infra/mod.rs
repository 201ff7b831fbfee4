// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting file concerns used by several other layers:
//
//   checkpoint.rs — The single best-model checkpoint plus the
//                   JSON side files needed to rebuild a model
//                   for prediction (train config, scalers,
//                   best-epoch record).
//
//   metrics.rs    — Writes the epoch history (CSV + JSON) and
//                   test-set predictions for external plotting.
//
// Reference: Rust Book §9 (Error Handling with anyhow)

/// Best-model checkpoint and its side files
pub mod checkpoint;

/// Training history and prediction reports on disk
pub mod metrics;
