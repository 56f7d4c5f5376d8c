//! Reversible calculation commands and linear history.
//!
//! # Responsibility
//! - Wrap one calculation, or a batch, as an undoable action.
//! - Keep a linear undo/redo stack over executed commands.
//!
//! # Invariants
//! - A command's `(previous_result, result)` pair is its only undo entry;
//!   undo is single-level per command.
//! - `can_execute()` is the caller's check; `execute` does not repeat it.
//! - Failed executes never enter the history.

pub mod batch;
pub mod calculate;
pub mod history;

use crate::model::context::UnitContext;
use crate::model::outcome::CalculationError;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

pub use batch::{BatchCalculationCommand, BATCH_FALLBACK_VALUE};
pub use calculate::CalculateCommand;
pub use history::{CommandHistory, UndoStep};

/// Stable identity of one command.
pub type CommandId = Uuid;

/// Reversible action around one or more calculations.
pub trait UnitCommand: Send {
    fn id(&self) -> CommandId;
    /// Unix epoch milliseconds at construction.
    fn timestamp_ms(&self) -> u64;
    fn description(&self) -> String;
    fn can_execute(&self) -> bool;
    fn execute(&mut self, context: &UnitContext) -> Result<f64, CalculationError>;
    fn supports_undo(&self) -> bool {
        true
    }
    /// Restores `result := previous_result`. Returns `false` when there is
    /// nothing to undo.
    fn undo(&mut self) -> bool;
    fn result(&self) -> Option<f64>;
    fn previous_result(&self) -> Option<f64>;
}

pub(crate) fn now_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

/// Undo slot shared by the command implementations.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct ResultPair {
    pub result: Option<f64>,
    pub previous_result: Option<f64>,
    undo_available: bool,
}

impl ResultPair {
    pub fn record(&mut self, value: f64) {
        self.previous_result = self.result;
        self.result = Some(value);
        self.undo_available = true;
    }

    pub fn undo(&mut self) -> bool {
        if !self.undo_available {
            return false;
        }
        self.result = self.previous_result.take();
        self.undo_available = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::ResultPair;

    #[test]
    fn result_pair_is_single_level() {
        let mut pair = ResultPair::default();
        pair.record(1.0);
        pair.record(2.0);
        assert_eq!(pair.previous_result, Some(1.0));

        assert!(pair.undo());
        assert_eq!(pair.result, Some(1.0));
        assert_eq!(pair.previous_result, None);
        assert!(!pair.undo());
        assert_eq!(pair.result, Some(1.0));
    }
}
