//! Per-type timing aggregation and slow-calculation tracking.

use crate::model::outcome::{CalculationError, CalculationResult};
use crate::model::unit::{Unit, UnitId, UnitType};
use crate::observe::{ObserverResult, UnitObserver};
use log::debug;
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Frame budget at 60 fps.
pub const DEFAULT_SLOW_THRESHOLD_MS: f64 = 16.0;
pub const DEFAULT_MAX_SLOW_RECORDS: usize = 64;

/// Aggregated timings for one unit type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct UnitTypeStats {
    pub count: u64,
    pub failures: u64,
    pub total_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

impl UnitTypeStats {
    pub fn average_ms(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total_ms / self.count as f64
        }
    }

    fn record(&mut self, duration_ms: f64, failed: bool) {
        if self.count == 0 {
            self.min_ms = duration_ms;
            self.max_ms = duration_ms;
        } else {
            self.min_ms = self.min_ms.min(duration_ms);
            self.max_ms = self.max_ms.max(duration_ms);
        }
        self.count += 1;
        self.total_ms += duration_ms;
        if failed {
            self.failures += 1;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlowCalculation {
    pub unit_id: UnitId,
    pub unit_type: UnitType,
    pub duration_ms: f64,
}

#[derive(Debug, Default)]
struct PerformanceState {
    by_type: BTreeMap<UnitType, UnitTypeStats>,
    slow: VecDeque<SlowCalculation>,
    slow_count: u64,
}

/// Observer that times calculations.
///
/// Durations strictly above `threshold_ms` are slow. The recent slow list
/// keeps at most `max_slow_records` entries; `slow_count` keeps counting.
#[derive(Debug)]
pub struct PerformanceObserver {
    threshold_ms: f64,
    max_slow_records: usize,
    state: Mutex<PerformanceState>,
}

impl PerformanceObserver {
    pub fn new() -> Self {
        Self::with_threshold(DEFAULT_SLOW_THRESHOLD_MS, DEFAULT_MAX_SLOW_RECORDS)
    }

    pub fn with_threshold(threshold_ms: f64, max_slow_records: usize) -> Self {
        Self {
            threshold_ms,
            max_slow_records,
            state: Mutex::new(PerformanceState::default()),
        }
    }

    pub fn threshold_ms(&self) -> f64 {
        self.threshold_ms
    }

    pub fn stats_for(&self, unit_type: UnitType) -> UnitTypeStats {
        self.lock().by_type.get(&unit_type).copied().unwrap_or_default()
    }

    pub fn all_stats(&self) -> BTreeMap<UnitType, UnitTypeStats> {
        self.lock().by_type.clone()
    }

    /// Recent slow calculations, oldest first.
    pub fn slow_calculations(&self) -> Vec<SlowCalculation> {
        self.lock().slow.iter().cloned().collect()
    }

    pub fn slow_count(&self) -> u64 {
        self.lock().slow_count
    }

    pub fn reset(&self) {
        *self.lock() = PerformanceState::default();
    }

    fn lock(&self) -> MutexGuard<'_, PerformanceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, result: &CalculationResult, failed: bool) {
        let mut state = self.lock();
        state
            .by_type
            .entry(result.unit_type)
            .or_default()
            .record(result.duration_ms, failed);

        if result.duration_ms > self.threshold_ms {
            state.slow_count += 1;
            if self.max_slow_records > 0 {
                if state.slow.len() == self.max_slow_records {
                    state.slow.pop_front();
                }
                state.slow.push_back(SlowCalculation {
                    unit_id: result.unit_id.clone(),
                    unit_type: result.unit_type,
                    duration_ms: result.duration_ms,
                });
            }
            debug!(
                "event=slow_calculation module=observe status=warn unit_id={} unit_type={} duration_ms={:.3} threshold_ms={}",
                result.unit_id, result.unit_type, result.duration_ms, self.threshold_ms
            );
        }
    }
}

impl Default for PerformanceObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitObserver for PerformanceObserver {
    fn name(&self) -> &str {
        "performance"
    }

    fn on_unit_calculation_completed(
        &self,
        _unit: &Unit,
        result: &CalculationResult,
    ) -> ObserverResult {
        self.record(result, false);
        Ok(())
    }

    fn on_unit_calculation_failed(
        &self,
        _unit: &Unit,
        _error: &CalculationError,
        result: &CalculationResult,
    ) -> ObserverResult {
        self.record(result, true);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::PerformanceObserver;
    use crate::model::outcome::{CalculationError, CalculationResult};
    use crate::model::unit::{Dimension, ReferenceUnit, SizeConfig, Unit, UnitConfig, UnitType};
    use crate::observe::UnitObserver;

    fn result(duration_ms: f64) -> CalculationResult {
        CalculationResult {
            value: 1.0,
            unit_id: "a".to_string(),
            unit_type: UnitType::Size,
            duration_ms,
            strategy_used: "size".to_string(),
            error: None,
        }
    }

    fn unit() -> Unit {
        Unit::from_config(UnitConfig::Size(SizeConfig::new(
            "a",
            Dimension::Width,
            ReferenceUnit::Pixel,
            1.0,
        )))
        .unwrap()
    }

    #[test]
    fn aggregates_min_max_average_and_failures() {
        let observer = PerformanceObserver::new();
        let unit = unit();
        observer.on_unit_calculation_completed(&unit, &result(2.0)).unwrap();
        observer.on_unit_calculation_completed(&unit, &result(6.0)).unwrap();
        observer
            .on_unit_calculation_failed(&unit, &CalculationError::NonFinite(f64::NAN), &result(4.0))
            .unwrap();

        let stats = observer.stats_for(UnitType::Size);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.failures, 1);
        assert_eq!(stats.min_ms, 2.0);
        assert_eq!(stats.max_ms, 6.0);
        assert_eq!(stats.average_ms(), 4.0);
        assert_eq!(observer.stats_for(UnitType::Scale).count, 0);
    }

    #[test]
    fn threshold_is_exclusive_and_list_is_bounded() {
        let observer = PerformanceObserver::with_threshold(16.0, 2);
        let unit = unit();
        for duration in [16.0, 17.0, 18.0, 19.0] {
            observer.on_unit_calculation_completed(&unit, &result(duration)).unwrap();
        }
        assert_eq!(observer.slow_count(), 3);
        let slow: Vec<f64> = observer
            .slow_calculations()
            .iter()
            .map(|record| record.duration_ms)
            .collect();
        assert_eq!(slow, vec![18.0, 19.0]);

        observer.reset();
        assert_eq!(observer.slow_count(), 0);
    }
}
