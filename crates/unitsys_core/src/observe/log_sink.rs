//! Observer forwarding unit events to the `log` facade.

use crate::model::context::UnitContext;
use crate::model::outcome::{CalculationError, CalculationResult};
use crate::model::unit::{BaseValue, Unit};
use crate::observe::{ObserverResult, UnitObserver};
use log::{debug, info, warn};

/// Emits one key=value line per unit event.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl LogObserver {
    pub fn new() -> Self {
        Self
    }
}

impl UnitObserver for LogObserver {
    fn name(&self) -> &str {
        "log"
    }

    fn on_unit_created(&self, unit: &Unit) -> ObserverResult {
        info!(
            "event=unit_created module=unit status=ok unit_id={} unit_type={} dimension={} reference={}",
            unit.id, unit.unit_type, unit.dimension, unit.reference_unit
        );
        Ok(())
    }

    fn on_unit_destroyed(&self, unit: &Unit) -> ObserverResult {
        info!(
            "event=unit_destroyed module=unit status=ok unit_id={} unit_type={}",
            unit.id, unit.unit_type
        );
        Ok(())
    }

    fn on_unit_value_changed(
        &self,
        unit: &Unit,
        old_value: &BaseValue,
        new_value: &BaseValue,
    ) -> ObserverResult {
        info!(
            "event=unit_value_changed module=unit status=ok unit_id={} old_kind={} new_kind={}",
            unit.id,
            old_value.kind_str(),
            new_value.kind_str()
        );
        Ok(())
    }

    fn on_unit_calculation_started(&self, unit: &Unit, _context: &UnitContext) -> ObserverResult {
        debug!(
            "event=calculation_started module=unit status=start unit_id={} unit_type={}",
            unit.id, unit.unit_type
        );
        Ok(())
    }

    fn on_unit_calculation_completed(
        &self,
        unit: &Unit,
        result: &CalculationResult,
    ) -> ObserverResult {
        debug!(
            "event=calculation_completed module=unit status=ok unit_id={} strategy={} duration_ms={:.3}",
            unit.id, result.strategy_used, result.duration_ms
        );
        Ok(())
    }

    fn on_unit_calculation_failed(
        &self,
        unit: &Unit,
        error: &CalculationError,
        result: &CalculationResult,
    ) -> ObserverResult {
        warn!(
            "event=calculation_failed module=unit status=error unit_id={} error_code={} fallback={} duration_ms={:.3}",
            unit.id,
            error.code(),
            result.value,
            result.duration_ms
        );
        Ok(())
    }
}
