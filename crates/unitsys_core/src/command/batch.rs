//! Batch command aggregating several sub-commands.

use crate::command::{now_epoch_ms, CommandId, ResultPair, UnitCommand};
use crate::model::context::UnitContext;
use crate::model::outcome::CalculationError;
use log::warn;
use uuid::Uuid;

/// Contribution of a sub-command that cannot execute or fails.
pub const BATCH_FALLBACK_VALUE: f64 = 0.0;

/// Ordered sub-commands whose result is the mean of their results.
///
/// Failed or non-executable sub-commands contribute
/// [`BATCH_FALLBACK_VALUE`] and still count towards the mean.
pub struct BatchCalculationCommand {
    id: CommandId,
    timestamp_ms: u64,
    commands: Vec<Box<dyn UnitCommand>>,
    results: Vec<f64>,
    previous_results: Vec<f64>,
    pair: ResultPair,
}

impl BatchCalculationCommand {
    pub fn new(commands: Vec<Box<dyn UnitCommand>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp_ms: now_epoch_ms(),
            commands,
            results: Vec::new(),
            previous_results: Vec::new(),
            pair: ResultPair::default(),
        }
    }

    pub fn push(&mut self, command: Box<dyn UnitCommand>) {
        self.commands.push(command);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Per-sub-command results of the last execute, fallbacks included.
    pub fn results(&self) -> &[f64] {
        &self.results
    }
}

impl UnitCommand for BatchCalculationCommand {
    fn id(&self) -> CommandId {
        self.id
    }

    fn timestamp_ms(&self) -> u64 {
        self.timestamp_ms
    }

    fn description(&self) -> String {
        format!("batch of {} calculations", self.commands.len())
    }

    fn can_execute(&self) -> bool {
        true
    }

    fn execute(&mut self, context: &UnitContext) -> Result<f64, CalculationError> {
        let mut collected = Vec::with_capacity(self.commands.len());
        for command in &mut self.commands {
            if !command.can_execute() {
                warn!(
                    "event=batch_item_skipped module=command status=error batch_id={} command_id={} error_code=command_rejected",
                    self.id,
                    command.id()
                );
                collected.push(BATCH_FALLBACK_VALUE);
                continue;
            }
            match command.execute(context) {
                Ok(value) => collected.push(value),
                Err(err) => {
                    warn!(
                        "event=batch_item_failed module=command status=error batch_id={} command_id={} error_code={} error={}",
                        self.id,
                        command.id(),
                        err.code(),
                        err
                    );
                    collected.push(BATCH_FALLBACK_VALUE);
                }
            }
        }

        let mean = if collected.is_empty() {
            BATCH_FALLBACK_VALUE
        } else {
            collected.iter().sum::<f64>() / collected.len() as f64
        };
        self.previous_results = std::mem::replace(&mut self.results, collected);
        self.pair.record(mean);
        Ok(mean)
    }

    fn undo(&mut self) -> bool {
        if !self.pair.undo() {
            return false;
        }
        self.results = std::mem::take(&mut self.previous_results);
        for command in self.commands.iter_mut().rev() {
            if command.supports_undo() {
                command.undo();
            }
        }
        true
    }

    fn result(&self) -> Option<f64> {
        self.pair.result
    }

    fn previous_result(&self) -> Option<f64> {
        self.pair.previous_result
    }
}

#[cfg(test)]
mod tests {
    use super::BatchCalculationCommand;
    use crate::command::UnitCommand;
    use crate::model::context::UnitContext;

    #[test]
    fn empty_batch_resolves_to_fallback() {
        let mut batch = BatchCalculationCommand::new(vec![]);
        assert!(batch.is_empty());
        assert_eq!(batch.execute(&UnitContext::default()).unwrap(), 0.0);
        assert_eq!(batch.result(), Some(0.0));
        assert!(batch.description().starts_with("batch of 0"));
    }
}
