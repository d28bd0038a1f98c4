// ============================================================================
// SCAN MODULE - Lógica pura de validación (sin DOM ni red)
// ============================================================================

pub mod state_machine;

pub use state_machine::*;
