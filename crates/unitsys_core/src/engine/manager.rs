//! Session facade over units and every extension table.
//!
//! # Responsibility
//! - Create, mutate and destroy units while emitting lifecycle events.
//! - Run the calculation pipeline and resolve every failure to a fallback.
//! - Expose undo/redo, snapshots, status and aggregate metrics.
//!
//! # Invariants
//! - `calculate*` never returns `Err` for runtime problems; the result
//!   carries the fallback value and the error instead.
//! - The validator chain runs before strategy selection unless the call is
//!   trusted.
//! - `shutdown` is idempotent and leaves the manager usable with empty tables.

use crate::calc::{derive_height, ensure_finite, locked_aspect_ratio};
use crate::command::{now_epoch_ms, CalculateCommand, CommandHistory, UndoStep, UnitCommand};
use crate::config::{EngineConfig, EngineConfigError};
use crate::engine::clock::{Clock, SystemClock};
use crate::engine::registry::UnitRegistry;
use crate::engine::{EngineError, EngineResult};
use crate::model::context::UnitContext;
use crate::model::outcome::{CalculationError, CalculationResult, ValidationOutcome};
use crate::model::random::{RandomSource, StdRandomSource};
use crate::model::unit::{check_combination, BaseValue, Unit, UnitConfig, UnitId};
use crate::observe::{ObserverId, ObserverRegistry, PerformanceObserver, UnitObserver};
use crate::strategy::{CalculationStrategy, StrategyInput, StrategyRegistry};
use crate::validate::{UnitValidator, ValidatorChain};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// `strategy_used` for heights derived from a locked aspect ratio.
pub const ASPECT_RATIO_STRATEGY: &str = "aspect_ratio";
/// `strategy_used` when the pipeline stopped before a strategy was chosen.
pub const NO_STRATEGY: &str = "none";

/// Per-call pipeline switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalculationOptions {
    /// Skip the validator chain.
    pub trusted: bool,
    /// Execute through the command history so the call can be undone.
    pub record_command: bool,
}

impl CalculationOptions {
    pub fn trusted() -> Self {
        Self {
            trusted: true,
            record_command: false,
        }
    }

    pub fn recorded() -> Self {
        Self {
            trusted: false,
            record_command: true,
        }
    }
}

/// Width and height resolved together.
#[derive(Debug, Clone, PartialEq)]
pub struct AspectPairResult {
    pub width: CalculationResult,
    pub height: CalculationResult,
    /// `true` when the height came from the ratio and no strategy ran for it.
    pub height_derived: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SystemStatus {
    pub unit_count: usize,
    pub active_unit_count: usize,
    pub strategy_count: usize,
    pub validator_count: usize,
    pub observer_count: usize,
    pub validation_error_count: usize,
    pub history_len: usize,
    pub is_shut_down: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    pub total_calculations: u64,
    pub failed_calculations: u64,
    pub average_time_ms: f64,
    /// Rough size of the unit table in bytes.
    pub memory_estimate_bytes: usize,
    /// `failed / total`, or 0 before the first calculation.
    pub error_rate: f64,
    pub slow_calculations: u64,
}

/// Captured unit state for [`UnitManager::restore_unit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSnapshot {
    unit: Unit,
    captured_at_ms: u64,
}

impl UnitSnapshot {
    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn unit_id(&self) -> &str {
        &self.unit.id
    }

    pub fn captured_at_ms(&self) -> u64 {
        self.captured_at_ms
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct EngineStats {
    total: u64,
    failed: u64,
    total_ms: f64,
}

/// Orchestrates one session of units.
pub struct UnitManager {
    config: EngineConfig,
    registry: UnitRegistry,
    strategies: StrategyRegistry,
    validators: ValidatorChain,
    observers: ObserverRegistry,
    history: CommandHistory,
    performance: Arc<PerformanceObserver>,
    clock: Box<dyn Clock>,
    random: Box<dyn RandomSource>,
    stats: EngineStats,
    validation_errors: HashMap<UnitId, usize>,
    shut_down: bool,
}

impl UnitManager {
    /// Manager with default config, system clock and entropy-seeded random.
    pub fn new() -> Self {
        let config = EngineConfig::default();
        Self::build(
            config,
            Box::new(SystemClock::new()),
            Box::new(StdRandomSource::from_entropy()),
        )
    }

    /// # Errors
    /// - Any [`EngineConfig::validate`] failure.
    pub fn with_config(config: EngineConfig) -> Result<Self, EngineConfigError> {
        let random: Box<dyn RandomSource> = match config.random_seed {
            Some(seed) => Box::new(StdRandomSource::seeded(seed)),
            None => Box::new(StdRandomSource::from_entropy()),
        };
        Self::with_collaborators(config, Box::new(SystemClock::new()), random)
    }

    /// Manager with injected time and randomness.
    ///
    /// # Errors
    /// - Any [`EngineConfig::validate`] failure.
    pub fn with_collaborators(
        config: EngineConfig,
        clock: Box<dyn Clock>,
        random: Box<dyn RandomSource>,
    ) -> Result<Self, EngineConfigError> {
        config.validate()?;
        Ok(Self::build(config, clock, random))
    }

    fn build(config: EngineConfig, clock: Box<dyn Clock>, random: Box<dyn RandomSource>) -> Self {
        let performance = Arc::new(PerformanceObserver::with_threshold(
            config.slow_threshold_ms,
            config.max_slow_records,
        ));
        let mut manager = Self {
            registry: UnitRegistry::new(),
            strategies: StrategyRegistry::new(),
            validators: ValidatorChain::new(),
            observers: ObserverRegistry::new(),
            history: CommandHistory::new(config.history_capacity),
            performance,
            clock,
            random,
            stats: EngineStats::default(),
            validation_errors: HashMap::new(),
            shut_down: false,
            config,
        };
        manager.install_defaults();
        manager
    }

    fn install_defaults(&mut self) {
        self.strategies.install_defaults();
        self.validators = ValidatorChain::with_defaults(self.config.value_min, self.config.value_max);
        self.observers.register(self.performance.clone());
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Creates a unit, activates it and emits `unit_created`.
    ///
    /// # Errors
    /// - `Config` for malformed descriptors.
    /// - `DuplicateUnit` when the id is taken.
    pub fn create_unit(&mut self, config: UnitConfig) -> EngineResult<Unit> {
        let id = config.id().to_string();
        self.registry.create(config)?;
        let unit = match self.registry.get_mut(&id) {
            Some(unit) => {
                unit.set_active(true);
                unit.clone()
            }
            None => return Err(EngineError::UnitNotFound(id)),
        };
        self.observers
            .notify("unit_created", |observer| observer.on_unit_created(&unit));
        debug!(
            "event=unit_create module=engine status=ok unit_id={} unit_type={}",
            unit.id, unit.unit_type
        );
        Ok(unit)
    }

    pub fn get_unit(&self, id: &str) -> Option<&Unit> {
        self.registry.get(id)
    }

    /// Removes a unit and emits `unit_destroyed`.
    pub fn remove_unit(&mut self, id: &str) -> EngineResult<Unit> {
        let unit = self
            .registry
            .remove(id)
            .ok_or_else(|| EngineError::UnitNotFound(id.to_string()))?;
        self.validation_errors.remove(id);
        self.observers
            .notify("unit_destroyed", |observer| observer.on_unit_destroyed(&unit));
        Ok(unit)
    }

    /// Units in id order.
    pub fn list_units(&self) -> Vec<&Unit> {
        self.registry.list()
    }

    pub fn unit_count(&self) -> usize {
        self.registry.len()
    }

    /// Replaces the base value and emits `unit_value_changed`.
    ///
    /// # Errors
    /// - `UnitNotFound`, or `Config` when the value does not fit the unit type.
    pub fn set_base_value(&mut self, id: &str, value: BaseValue) -> EngineResult<()> {
        let unit = self
            .registry
            .get_mut(id)
            .ok_or_else(|| EngineError::UnitNotFound(id.to_string()))?;
        check_combination(unit.unit_type, unit.dimension, unit.reference_unit, &value)?;
        let old_value = std::mem::replace(&mut unit.base_value, value);
        let unit = unit.clone();
        self.observers.notify("unit_value_changed", |observer| {
            observer.on_unit_value_changed(&unit, &old_value, &unit.base_value)
        });
        Ok(())
    }

    pub fn set_unit_active(&mut self, id: &str, active: bool) -> EngineResult<()> {
        let unit = self
            .registry
            .get_mut(id)
            .ok_or_else(|| EngineError::UnitNotFound(id.to_string()))?;
        unit.set_active(active);
        Ok(())
    }

    /// Sets `current` of a random base value.
    ///
    /// # Errors
    /// - `NotRandom` when the base value is not a random range.
    /// - `Range` when `value` is outside `[min, max]`; nothing changes.
    pub fn set_random_current(&mut self, id: &str, value: f64) -> EngineResult<()> {
        let unit = self
            .registry
            .get_mut(id)
            .ok_or_else(|| EngineError::UnitNotFound(id.to_string()))?;
        let BaseValue::Random(random) = &mut unit.base_value else {
            return Err(EngineError::NotRandom(id.to_string()));
        };
        let old_value = BaseValue::Random(*random);
        random.set_current(value)?;
        let unit = unit.clone();
        self.observers.notify("unit_value_changed", |observer| {
            observer.on_unit_value_changed(&unit, &old_value, &unit.base_value)
        });
        Ok(())
    }

    /// Calculates a registered unit with default options.
    pub fn calculate(&mut self, id: &str, context: &UnitContext) -> EngineResult<CalculationResult> {
        let options = CalculationOptions {
            trusted: false,
            record_command: self.config.record_commands,
        };
        self.calculate_with(id, context, options)
    }

    /// Calculates a registered unit.
    ///
    /// # Errors
    /// - `UnitNotFound` only; runtime failures come back as fallback results.
    pub fn calculate_with(
        &mut self,
        id: &str,
        context: &UnitContext,
        options: CalculationOptions,
    ) -> EngineResult<CalculationResult> {
        let mut unit = self
            .registry
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::UnitNotFound(id.to_string()))?;
        let result = self.run_pipeline(&mut unit, context, options);
        if let Some(stored) = self.registry.get_mut(id) {
            stored.base_value = unit.base_value;
        }
        Ok(result)
    }

    /// Calculates a unit that is not registered with this manager.
    pub fn calculate_direct(&mut self, unit: &mut Unit, context: &UnitContext) -> CalculationResult {
        self.run_pipeline(unit, context, CalculationOptions::default())
    }

    /// Resolves a width/height pair; a locked pair derives height from width.
    ///
    /// The derived height never runs a strategy; its `strategy_used` is
    /// [`ASPECT_RATIO_STRATEGY`]. The height unit still passes through the
    /// validator chain. A fallback width disables derivation.
    pub fn calculate_aspect_pair(
        &mut self,
        width_id: &str,
        height_id: &str,
        context: &UnitContext,
    ) -> EngineResult<AspectPairResult> {
        let width_unit = self
            .registry
            .get(width_id)
            .cloned()
            .ok_or_else(|| EngineError::UnitNotFound(width_id.to_string()))?;
        let height_unit = self
            .registry
            .get(height_id)
            .cloned()
            .ok_or_else(|| EngineError::UnitNotFound(height_id.to_string()))?;

        let width = self.calculate(width_id, context)?;
        let ratio = locked_aspect_ratio(&width_unit, &height_unit, context);
        match ratio {
            Some(ratio) if !width.is_fallback() => {
                let started = self.clock.now_ms();
                self.observers.notify("calculation_started", |observer| {
                    observer.on_unit_calculation_started(&height_unit, context)
                });
                let (strategy_used, derived) = match self.check_valid(&height_unit, context) {
                    Ok(()) => (
                        ASPECT_RATIO_STRATEGY.to_string(),
                        ensure_finite(
                            height_unit.options.bounds.clamp(derive_height(width.value, ratio)),
                        ),
                    ),
                    Err(err) => (NO_STRATEGY.to_string(), Err(err)),
                };
                let height = self.finish(&height_unit, started, strategy_used, derived);
                Ok(AspectPairResult {
                    width,
                    height,
                    height_derived: true,
                })
            }
            _ => {
                let height = self.calculate(height_id, context)?;
                Ok(AspectPairResult {
                    width,
                    height,
                    height_derived: false,
                })
            }
        }
    }

    /// Recalculates every active unit in id order.
    pub fn recalculate_active(&mut self, context: &UnitContext) -> Vec<CalculationResult> {
        let ids: Vec<UnitId> = self
            .registry
            .list_active()
            .into_iter()
            .map(|unit| unit.id.clone())
            .collect();
        ids.iter()
            .filter_map(|id| self.calculate(id, context).ok())
            .collect()
    }

    /// Runs the validator chain without calculating.
    pub fn validate_unit(&self, id: &str, context: &UnitContext) -> EngineResult<ValidationOutcome> {
        let unit = self
            .registry
            .get(id)
            .ok_or_else(|| EngineError::UnitNotFound(id.to_string()))?;
        Ok(self.validators.run(unit, context))
    }

    fn run_pipeline(
        &mut self,
        unit: &mut Unit,
        context: &UnitContext,
        options: CalculationOptions,
    ) -> CalculationResult {
        if self.config.redraw_random_on_calculate {
            if let BaseValue::Random(random) = &mut unit.base_value {
                random.get_random_value(self.random.as_mut());
            }
        }
        let unit: &Unit = unit;

        let started = self.clock.now_ms();
        self.observers.notify("calculation_started", |observer| {
            observer.on_unit_calculation_started(unit, context)
        });
        let (strategy_used, outcome) = self.resolve(unit, context, options);
        self.finish(unit, started, strategy_used, outcome)
    }

    fn resolve(
        &mut self,
        unit: &Unit,
        context: &UnitContext,
        options: CalculationOptions,
    ) -> (String, Result<f64, CalculationError>) {
        if !options.trusted {
            if let Err(err) = self.check_valid(unit, context) {
                return (NO_STRATEGY.to_string(), Err(err));
            }
        }

        let input = StrategyInput::Unit(unit);
        let strategy = match self.strategies.select(&input) {
            Ok(strategy) => strategy,
            Err(err) => return (NO_STRATEGY.to_string(), Err(err)),
        };
        let strategy_used = strategy.unit_type().to_string();
        let value = if options.record_command {
            let command = CalculateCommand::new(unit.clone(), strategy);
            self.history.execute(Box::new(command), context)
        } else {
            strategy.calculate(&input, context)
        };
        (strategy_used, value.and_then(ensure_finite))
    }

    /// Runs the validator chain and counts the errors of a failed verdict.
    fn check_valid(&mut self, unit: &Unit, context: &UnitContext) -> Result<(), CalculationError> {
        let outcome = self.validators.run(unit, context);
        if outcome.is_valid {
            return Ok(());
        }
        *self.validation_errors.entry(unit.id.clone()).or_insert(0) += outcome.errors.len();
        Err(CalculationError::ValidationFailed(outcome.errors))
    }

    fn finish(
        &mut self,
        unit: &Unit,
        started: f64,
        strategy_used: String,
        outcome: Result<f64, CalculationError>,
    ) -> CalculationResult {
        let duration_ms = (self.clock.now_ms() - started).max(0.0);
        self.stats.total += 1;
        self.stats.total_ms += duration_ms;

        match outcome {
            Ok(value) => {
                let result = CalculationResult {
                    value,
                    unit_id: unit.id.clone(),
                    unit_type: unit.unit_type,
                    duration_ms,
                    strategy_used,
                    error: None,
                };
                self.observers.notify("calculation_completed", |observer| {
                    observer.on_unit_calculation_completed(unit, &result)
                });
                result
            }
            Err(error) => {
                self.stats.failed += 1;
                let fallback = unit.unit_type.fallback_value();
                warn!(
                    "event=calculation_fallback module=engine status=error unit_id={} error_code={} fallback={}",
                    unit.id,
                    error.code(),
                    fallback
                );
                let result = CalculationResult {
                    value: fallback,
                    unit_id: unit.id.clone(),
                    unit_type: unit.unit_type,
                    duration_ms,
                    strategy_used,
                    error: Some(error.clone()),
                };
                self.observers.notify("calculation_failed", |observer| {
                    observer.on_unit_calculation_failed(unit, &error, &result)
                });
                result
            }
        }
    }

    /// Registers a strategy; an existing key is replaced.
    ///
    /// # Errors
    /// - `InvalidStrategy` for keys outside `[a-z0-9_-]+`.
    pub fn register_strategy(
        &mut self,
        strategy: Arc<dyn CalculationStrategy>,
    ) -> EngineResult<()> {
        self.strategies.register(strategy)?;
        Ok(())
    }

    pub fn remove_strategy(&mut self, key: &str) -> bool {
        self.strategies.remove(key).is_some()
    }

    pub fn strategy_keys(&self) -> Vec<String> {
        self.strategies.keys()
    }

    /// Appends a validator to the end of the chain.
    pub fn add_validator(&mut self, validator: Arc<dyn UnitValidator>) {
        self.validators.push(validator);
    }

    pub fn insert_validator(&mut self, index: usize, validator: Arc<dyn UnitValidator>) {
        self.validators.insert(index, validator);
    }

    pub fn remove_validator(&mut self, name: &str) -> bool {
        self.validators.remove(name)
    }

    pub fn validator_names(&self) -> Vec<String> {
        self.validators.names()
    }

    pub fn add_observer(&mut self, observer: Arc<dyn UnitObserver>) -> ObserverId {
        self.observers.register(observer)
    }

    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        self.observers.remove(id)
    }

    /// Built-in timing observer; always registered at construction.
    pub fn performance(&self) -> &PerformanceObserver {
        &self.performance
    }

    /// Snapshot command for `id` using the highest-priority matching strategy.
    pub fn create_calculate_command(&self, id: &str) -> EngineResult<CalculateCommand> {
        let unit = self
            .registry
            .get(id)
            .ok_or_else(|| EngineError::UnitNotFound(id.to_string()))?;
        let strategy = self
            .strategies
            .select(&StrategyInput::Unit(unit))
            .map_err(|_| EngineError::NoStrategy(id.to_string()))?;
        Ok(CalculateCommand::new(unit.clone(), strategy))
    }

    /// Executes a command through the history.
    ///
    /// A command whose `can_execute` is false is rejected without running.
    pub fn execute_command(
        &mut self,
        command: Box<dyn UnitCommand>,
        context: &UnitContext,
    ) -> Result<f64, CalculationError> {
        if !command.can_execute() {
            return Err(CalculationError::CommandRejected(command.description()));
        }
        self.history.execute(command, context)
    }

    pub fn undo(&mut self) -> Option<UndoStep> {
        self.history.undo()
    }

    pub fn redo(&mut self) -> Option<Result<f64, CalculationError>> {
        self.history.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn snapshot_unit(&self, id: &str) -> EngineResult<UnitSnapshot> {
        let unit = self
            .registry
            .get(id)
            .ok_or_else(|| EngineError::UnitNotFound(id.to_string()))?;
        Ok(UnitSnapshot {
            unit: unit.clone(),
            captured_at_ms: now_epoch_ms(),
        })
    }

    /// Writes a snapshot back over the registered unit with the same id.
    ///
    /// Emits `unit_value_changed` when the base value differs.
    pub fn restore_unit(&mut self, snapshot: &UnitSnapshot) -> EngineResult<()> {
        let id = snapshot.unit_id();
        let unit = self
            .registry
            .get_mut(id)
            .ok_or_else(|| EngineError::UnitNotFound(id.to_string()))?;
        let old_value = std::mem::replace(unit, snapshot.unit.clone()).base_value;
        if old_value != snapshot.unit.base_value {
            let restored = &snapshot.unit;
            self.observers.notify("unit_value_changed", |observer| {
                observer.on_unit_value_changed(restored, &old_value, &restored.base_value)
            });
        }
        Ok(())
    }

    pub fn status(&self) -> SystemStatus {
        SystemStatus {
            unit_count: self.registry.len(),
            active_unit_count: self.registry.list_active().len(),
            strategy_count: self.strategies.len(),
            validator_count: self.validators.len(),
            observer_count: self.observers.len(),
            validation_error_count: self.validation_errors.values().sum(),
            history_len: self.history.len(),
            is_shut_down: self.shut_down,
        }
    }

    pub fn performance_metrics(&self) -> PerformanceMetrics {
        let EngineStats {
            total,
            failed,
            total_ms,
        } = self.stats;
        let (average_time_ms, error_rate) = if total == 0 {
            (0.0, 0.0)
        } else {
            (total_ms / total as f64, failed as f64 / total as f64)
        };
        PerformanceMetrics {
            total_calculations: total,
            failed_calculations: failed,
            average_time_ms,
            memory_estimate_bytes: self.registry.len() * std::mem::size_of::<Unit>(),
            error_rate,
            slow_calculations: self.performance.slow_count(),
        }
    }

    /// Validation errors recorded for one unit since creation or reset.
    pub fn validation_error_count(&self, id: &str) -> usize {
        self.validation_errors.get(id).copied().unwrap_or(0)
    }

    /// Drops every unit and table, then reinstalls the defaults.
    ///
    /// Units are discarded without `unit_destroyed` events.
    pub fn reset(&mut self) {
        self.registry.clear();
        self.strategies.clear();
        self.validators.clear();
        self.observers.clear();
        self.history.clear();
        self.performance.reset();
        self.stats = EngineStats::default();
        self.validation_errors.clear();
        self.shut_down = false;
        self.install_defaults();
        info!("event=engine_reset module=engine status=ok");
    }

    /// Destroys every unit and clears every table.
    ///
    /// Returns `false` when the manager was already shut down.
    pub fn shutdown(&mut self) -> bool {
        if self.shut_down {
            return false;
        }
        let units = self.registry.drain();
        for unit in &units {
            self.observers
                .notify("unit_destroyed", |observer| observer.on_unit_destroyed(unit));
        }
        self.strategies.clear();
        self.validators.clear();
        self.observers.clear();
        self.history.clear();
        self.performance.reset();
        self.stats = EngineStats::default();
        self.validation_errors.clear();
        self.shut_down = true;
        info!(
            "event=engine_shutdown module=engine status=ok destroyed_units={}",
            units.len()
        );
        true
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }
}

impl Default for UnitManager {
    fn default() -> Self {
        Self::new()
    }
}
