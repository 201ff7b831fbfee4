// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from raw samples to tensor batches.
//
// The pipeline flows in this order:
//
//   SyntheticHousing  → seeded samples (features + price)
//       │
//       ▼
//   splitter          → disjoint train / validation / test
//       │
//       ▼
//   FittedScalers     → z-scores fitted on train, applied to all
//       │
//       ▼
//   batcher           → index plans + Burn's Batcher trait
//       │
//       ▼
//   HousingDataset    → Burn's Dataset trait for the DataLoader
//
// Each module is responsible for exactly one step.

/// Seeded synthetic housing dataset
pub mod synthetic;

/// Shuffles and splits data into train/validation/test sets
pub mod splitter;

/// Feature and target standardisation fitted on train only
pub mod standardizer;

/// Implements Burn's Dataset trait for housing samples
pub mod dataset;

/// Batch index planning and Burn's Batcher trait
pub mod batcher;
