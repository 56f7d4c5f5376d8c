//! Linear undo/redo history.

use crate::command::{CommandId, UnitCommand};
use crate::model::context::UnitContext;
use crate::model::outcome::CalculationError;
use log::debug;

struct HistoryEntry {
    command: Box<dyn UnitCommand>,
    context: UnitContext,
}

/// Result of one undo step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UndoStep {
    pub command_id: CommandId,
    /// Command result after the undo.
    pub result: Option<f64>,
}

/// Ordered command stack with a cursor.
///
/// Entries below the cursor are applied; entries at or above it are redo
/// candidates. Executing a new command drops every redo candidate.
pub struct CommandHistory {
    entries: Vec<HistoryEntry>,
    cursor: usize,
    capacity: usize,
}

impl CommandHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            capacity: capacity.max(1),
        }
    }

    /// Executes `command` and records it.
    ///
    /// # Errors
    /// - Returns the command's error unchanged; the stack is not touched.
    pub fn execute(
        &mut self,
        mut command: Box<dyn UnitCommand>,
        context: &UnitContext,
    ) -> Result<f64, CalculationError> {
        let value = command.execute(context)?;
        self.entries.truncate(self.cursor);
        self.entries.push(HistoryEntry {
            command,
            context: context.clone(),
        });
        if self.entries.len() > self.capacity {
            let overflow = self.entries.len() - self.capacity;
            self.entries.drain(..overflow);
        }
        self.cursor = self.entries.len();
        Ok(value)
    }

    /// Undoes the command below the cursor.
    pub fn undo(&mut self) -> Option<UndoStep> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        let entry = &mut self.entries[self.cursor];
        if !entry.command.undo() {
            debug!(
                "event=history_undo module=command status=noop command_id={}",
                entry.command.id()
            );
        }
        Some(UndoStep {
            command_id: entry.command.id(),
            result: entry.command.result(),
        })
    }

    /// Re-executes the command at the cursor with its original context.
    pub fn redo(&mut self) -> Option<Result<f64, CalculationError>> {
        let entry = self.entries.get_mut(self.cursor)?;
        let outcome = entry.command.execute(&entry.context);
        if outcome.is_ok() {
            self.cursor += 1;
        }
        Some(outcome)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Command ids from oldest to newest.
    pub fn command_ids(&self) -> Vec<CommandId> {
        self.entries.iter().map(|entry| entry.command.id()).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }
}
