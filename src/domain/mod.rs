// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs and traits that define the core concepts
// of the system: samples, partitions, houses, training history
// and the model abstraction the training harness works against.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits

// A labelled sample and the named partitions built from samples
pub mod sample;

// The named house features and their vector encoding
pub mod house;

// Per-epoch metrics and the training history log
pub mod history;

// Core abstractions (traits) that other layers implement
pub mod traits;
