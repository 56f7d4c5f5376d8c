use std::sync::{Arc, Mutex};
use unitsys_core::{
    BaseValue, CalculationError, CalculationResult, Dimension, EngineConfig, ManualClock,
    ObserverError, ObserverResult, ReferenceUnit, SizeConfig, StdRandomSource, Unit, UnitConfig,
    UnitContext, UnitManager, UnitObserver, UnitType,
};

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl Recorder {
    fn push(&self, event: String) -> ObserverResult {
        self.events
            .lock()
            .map_err(|_| ObserverError::new("poisoned"))?
            .push(event);
        Ok(())
    }

    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl UnitObserver for Recorder {
    fn name(&self) -> &str {
        "recorder"
    }

    fn on_unit_created(&self, unit: &Unit) -> ObserverResult {
        self.push(format!("created:{}", unit.id))
    }

    fn on_unit_destroyed(&self, unit: &Unit) -> ObserverResult {
        self.push(format!("destroyed:{}", unit.id))
    }

    fn on_unit_value_changed(
        &self,
        unit: &Unit,
        old_value: &BaseValue,
        new_value: &BaseValue,
    ) -> ObserverResult {
        self.push(format!("changed:{}:{}->{}", unit.id, old_value, new_value))
    }

    fn on_unit_calculation_started(&self, unit: &Unit, _context: &UnitContext) -> ObserverResult {
        self.push(format!("started:{}", unit.id))
    }

    fn on_unit_calculation_completed(
        &self,
        unit: &Unit,
        result: &CalculationResult,
    ) -> ObserverResult {
        self.push(format!("completed:{}:{}", unit.id, result.value))
    }

    fn on_unit_calculation_failed(
        &self,
        unit: &Unit,
        error: &CalculationError,
        result: &CalculationResult,
    ) -> ObserverResult {
        self.push(format!("failed:{}:{}:{}", unit.id, error.code(), result.value))
    }
}

struct Panicking;

impl UnitObserver for Panicking {
    fn name(&self) -> &str {
        "panicking"
    }

    fn on_unit_created(&self, _unit: &Unit) -> ObserverResult {
        panic!("observer exploded");
    }

    fn on_unit_calculation_completed(
        &self,
        _unit: &Unit,
        _result: &CalculationResult,
    ) -> ObserverResult {
        panic!("observer exploded again");
    }
}

struct Refusing;

impl UnitObserver for Refusing {
    fn name(&self) -> &str {
        "refusing"
    }

    fn on_unit_calculation_started(&self, _unit: &Unit, _context: &UnitContext) -> ObserverResult {
        Err(ObserverError::new("sink offline"))
    }
}

fn manager_with_clock(clock: ManualClock) -> UnitManager {
    UnitManager::with_collaborators(
        EngineConfig::default(),
        Box::new(clock),
        Box::new(StdRandomSource::seeded(9)),
    )
    .unwrap()
}

fn pixel(id: &str, value: f64) -> UnitConfig {
    UnitConfig::Size(SizeConfig::new(
        id,
        Dimension::Width,
        ReferenceUnit::Pixel,
        value,
    ))
}

#[test]
fn failing_observers_do_not_block_later_ones() {
    let mut manager = manager_with_clock(ManualClock::new());
    let recorder = Arc::new(Recorder::default());
    manager.add_observer(Arc::new(Panicking));
    manager.add_observer(Arc::new(Refusing));
    manager.add_observer(recorder.clone());

    manager.create_unit(pixel("a", 5.0)).unwrap();
    let result = manager.calculate("a", &UnitContext::default()).unwrap();
    assert_eq!(result.value, 5.0);
    assert!(!result.is_fallback());

    assert_eq!(
        recorder.events(),
        vec!["created:a", "started:a", "completed:a:5"]
    );
}

#[test]
fn value_changes_and_removal_are_reported() {
    let mut manager = manager_with_clock(ManualClock::new());
    let recorder = Arc::new(Recorder::default());
    manager.add_observer(recorder.clone());

    manager.create_unit(pixel("a", 5.0)).unwrap();
    manager.set_base_value("a", BaseValue::Number(8.0)).unwrap();
    manager.remove_unit("a").unwrap();

    assert_eq!(
        recorder.events(),
        vec!["created:a", "changed:a:5->8", "destroyed:a"]
    );
}

#[test]
fn validation_failure_emits_failed_with_fallback() {
    let mut manager = manager_with_clock(ManualClock::new());
    let recorder = Arc::new(Recorder::default());
    manager.add_observer(recorder.clone());

    manager.create_unit(pixel("huge", 9_000_000.0)).unwrap();
    let result = manager.calculate("huge", &UnitContext::default()).unwrap();
    assert_eq!(result.value, 0.0);
    assert!(matches!(
        result.error,
        Some(CalculationError::ValidationFailed(_))
    ));
    assert_eq!(
        recorder.events().last().map(String::as_str),
        Some("failed:huge:validation_failed:0")
    );
    assert_eq!(manager.status().validation_error_count, 1);
}

#[test]
fn removed_observer_stops_receiving_events() {
    let mut manager = manager_with_clock(ManualClock::new());
    let recorder = Arc::new(Recorder::default());
    let id = manager.add_observer(recorder.clone());
    assert!(manager.remove_observer(id));

    manager.create_unit(pixel("a", 1.0)).unwrap();
    assert!(recorder.events().is_empty());
}

#[test]
fn performance_observer_tracks_timings_and_slow_calls() {
    let clock = ManualClock::new();
    let mut manager = manager_with_clock(clock.clone());
    manager.create_unit(pixel("a", 1.0)).unwrap();
    let context = UnitContext::default();

    clock.set_step(4.0);
    manager.calculate("a", &context).unwrap();
    clock.set_step(20.0);
    manager.calculate("a", &context).unwrap();
    clock.set_step(0.0);

    let stats = manager.performance().stats_for(UnitType::Size);
    assert_eq!(stats.count, 2);
    assert_eq!(stats.min_ms, 4.0);
    assert_eq!(stats.max_ms, 20.0);
    assert_eq!(stats.average_ms(), 12.0);

    let slow = manager.performance().slow_calculations();
    assert_eq!(slow.len(), 1);
    assert_eq!(slow[0].unit_id, "a");
    assert_eq!(slow[0].duration_ms, 20.0);

    let metrics = manager.performance_metrics();
    assert_eq!(metrics.total_calculations, 2);
    assert_eq!(metrics.slow_calculations, 1);
    assert_eq!(metrics.average_time_ms, 12.0);
}
