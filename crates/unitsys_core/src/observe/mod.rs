//! Lifecycle and calculation event fan-out.
//!
//! # Responsibility
//! - Deliver unit events to registered observers in registration order.
//! - Isolate every delivery so one sink cannot break the engine or a peer.
//!
//! # Invariants
//! - A returned `Err` or a panic inside a callback is logged, counted and
//!   swallowed; later observers still receive the event.
//! - Observer ids are never reused within one registry.

pub mod log_sink;
pub mod performance;

use crate::model::context::UnitContext;
use crate::model::outcome::{CalculationError, CalculationResult};
use crate::model::unit::{BaseValue, Unit};
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

pub use log_sink::LogObserver;
pub use performance::{PerformanceObserver, SlowCalculation, UnitTypeStats};

/// Failure reported by an observer sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObserverError {
    pub message: String,
}

impl ObserverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for ObserverError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "observer failed: {}", self.message)
    }
}

impl Error for ObserverError {}

pub type ObserverResult = Result<(), ObserverError>;

/// Event sink. Every callback defaults to a no-op.
pub trait UnitObserver: Send + Sync {
    fn name(&self) -> &str;

    fn on_unit_created(&self, _unit: &Unit) -> ObserverResult {
        Ok(())
    }

    fn on_unit_destroyed(&self, _unit: &Unit) -> ObserverResult {
        Ok(())
    }

    fn on_unit_value_changed(
        &self,
        _unit: &Unit,
        _old_value: &BaseValue,
        _new_value: &BaseValue,
    ) -> ObserverResult {
        Ok(())
    }

    fn on_unit_calculation_started(&self, _unit: &Unit, _context: &UnitContext) -> ObserverResult {
        Ok(())
    }

    fn on_unit_calculation_completed(
        &self,
        _unit: &Unit,
        _result: &CalculationResult,
    ) -> ObserverResult {
        Ok(())
    }

    fn on_unit_calculation_failed(
        &self,
        _unit: &Unit,
        _error: &CalculationError,
        _result: &CalculationResult,
    ) -> ObserverResult {
        Ok(())
    }
}

/// Handle returned by [`ObserverRegistry::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

impl ObserverId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Ordered observer list with isolated delivery.
#[derive(Default)]
pub struct ObserverRegistry {
    observers: Vec<(ObserverId, Arc<dyn UnitObserver>)>,
    next_id: u64,
    delivery_failures: u64,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, observer: Arc<dyn UnitObserver>) -> ObserverId {
        self.next_id += 1;
        let id = ObserverId(self.next_id);
        self.observers.push((id, observer));
        id
    }

    pub fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(entry_id, _)| *entry_id != id);
        self.observers.len() != before
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.observers
            .iter()
            .map(|(_, observer)| observer.name().to_string())
            .collect()
    }

    /// Number of callbacks that returned `Err` or panicked.
    pub fn delivery_failures(&self) -> u64 {
        self.delivery_failures
    }

    /// Drops every observer and zeroes the failure counter.
    pub fn clear(&mut self) {
        self.observers.clear();
        self.delivery_failures = 0;
    }

    /// Delivers one event to every observer.
    ///
    /// `event` only labels diagnostics; `deliver` performs the callback.
    pub fn notify<F>(&mut self, event: &str, deliver: F)
    where
        F: Fn(&dyn UnitObserver) -> ObserverResult,
    {
        for (_, observer) in &self.observers {
            let outcome = catch_unwind(AssertUnwindSafe(|| deliver(observer.as_ref())));
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    self.delivery_failures += 1;
                    warn!(
                        "event=observer_failed module=observe status=error observer={} unit_event={} error={}",
                        observer.name(),
                        event,
                        err
                    );
                }
                Err(payload) => {
                    self.delivery_failures += 1;
                    warn!(
                        "event=observer_panicked module=observe status=error observer={} unit_event={} payload={}",
                        observer.name(),
                        event,
                        panic_message(payload.as_ref())
                    );
                }
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{ObserverError, ObserverRegistry, ObserverResult, UnitObserver};
    use crate::model::unit::{Dimension, ReferenceUnit, SizeConfig, Unit, UnitConfig};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Counting(AtomicUsize);

    impl UnitObserver for Counting {
        fn name(&self) -> &str {
            "counting"
        }

        fn on_unit_created(&self, _unit: &Unit) -> ObserverResult {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Failing;

    impl UnitObserver for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn on_unit_created(&self, _unit: &Unit) -> ObserverResult {
            Err(ObserverError::new("sink offline"))
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
    fn err_is_counted_and_later_observers_still_run() {
        let counting = Arc::new(Counting(AtomicUsize::new(0)));
        let mut registry = ObserverRegistry::new();
        registry.register(Arc::new(Failing));
        registry.register(counting.clone());

        let unit = unit();
        registry.notify("unit_created", |observer| observer.on_unit_created(&unit));

        assert_eq!(counting.0.load(Ordering::SeqCst), 1);
        assert_eq!(registry.delivery_failures(), 1);
    }

    #[test]
    fn clear_zeroes_delivery_failures() {
        let mut registry = ObserverRegistry::new();
        registry.register(Arc::new(Failing));
        let unit = unit();
        registry.notify("unit_created", |observer| observer.on_unit_created(&unit));
        assert_eq!(registry.delivery_failures(), 1);

        registry.clear();
        assert!(registry.is_empty());
        assert_eq!(registry.delivery_failures(), 0);
    }

    #[test]
    fn remove_by_id_keeps_order_of_others() {
        let mut registry = ObserverRegistry::new();
        let first = registry.register(Arc::new(Failing));
        registry.register(Arc::new(Counting(AtomicUsize::new(0))));

        assert!(registry.remove(first));
        assert!(!registry.remove(first));
        assert_eq!(registry.names(), vec!["counting".to_string()]);
    }
}
