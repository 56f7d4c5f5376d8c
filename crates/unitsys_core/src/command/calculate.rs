//! Single-unit calculation command.

use crate::command::{now_epoch_ms, CommandId, ResultPair, UnitCommand};
use crate::model::context::UnitContext;
use crate::model::outcome::CalculationError;
use crate::model::unit::Unit;
use crate::strategy::{CalculationStrategy, StrategyInput};
use std::sync::Arc;
use uuid::Uuid;

/// Runs one strategy over a snapshot of one unit.
pub struct CalculateCommand {
    id: CommandId,
    timestamp_ms: u64,
    unit: Unit,
    strategy: Arc<dyn CalculationStrategy>,
    pair: ResultPair,
}

impl CalculateCommand {
    /// Creates a command over a unit snapshot; later unit edits do not leak in.
    pub fn new(unit: Unit, strategy: Arc<dyn CalculationStrategy>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp_ms: now_epoch_ms(),
            unit,
            strategy,
            pair: ResultPair::default(),
        }
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn strategy_key(&self) -> &str {
        self.strategy.unit_type()
    }
}

impl UnitCommand for CalculateCommand {
    fn id(&self) -> CommandId {
        self.id
    }

    fn timestamp_ms(&self) -> u64 {
        self.timestamp_ms
    }

    fn description(&self) -> String {
        format!(
            "calculate {} unit `{}` with `{}`",
            self.unit.unit_type,
            self.unit.id,
            self.strategy.unit_type()
        )
    }

    fn can_execute(&self) -> bool {
        self.strategy.can_handle(&StrategyInput::Unit(&self.unit))
    }

    fn execute(&mut self, context: &UnitContext) -> Result<f64, CalculationError> {
        let value = self
            .strategy
            .calculate(&StrategyInput::Unit(&self.unit), context)?;
        self.pair.record(value);
        Ok(value)
    }

    fn undo(&mut self) -> bool {
        self.pair.undo()
    }

    fn result(&self) -> Option<f64> {
        self.pair.result
    }

    fn previous_result(&self) -> Option<f64> {
        self.pair.previous_result
    }
}
