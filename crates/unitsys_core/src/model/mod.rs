//! Unit value and context model.
//!
//! # Responsibility
//! - Define descriptors, calculation contexts and per-call outcomes.
//! - Keep every invariant checkable without engine state.
//!
//! # Invariants
//! - Units are created only from validated `UnitConfig` values.
//! - Contexts are read-only inputs owned by the caller.

pub mod context;
pub mod outcome;
pub mod random;
pub mod unit;
