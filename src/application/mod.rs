// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer wires the other layers together for one goal
// (training or pricing a house). No tensor code and no
// printing here; the CLI presents whatever comes back.

// The training workflow
pub mod train_use_case;

// The price prediction workflow
pub mod predict_use_case;
