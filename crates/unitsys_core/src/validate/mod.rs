//! Chain-of-responsibility validation before calculation.
//!
//! # Responsibility
//! - Run every registered validator link against `(unit, context)`.
//! - Merge warnings and surface the first failing link's errors.
//!
//! # Invariants
//! - The chain is valid only if every link is valid.
//! - The first invalid link short-circuits the rest.
//! - Link order never changes the verdict, only which error surfaces first.

pub mod range;
pub mod types;

use crate::model::context::UnitContext;
use crate::model::outcome::ValidationOutcome;
use crate::model::unit::Unit;
use log::debug;
use std::sync::Arc;

pub use range::RangeValidator;
pub use types::TypeValidator;

/// One link of the validator chain.
pub trait UnitValidator: Send + Sync {
    /// Stable link name, used for removal and issue attribution.
    fn name(&self) -> &str;
    fn validate(&self, unit: &Unit, context: &UnitContext) -> ValidationOutcome;
}

/// Ordered validator links.
#[derive(Default, Clone)]
pub struct ValidatorChain {
    links: Vec<Arc<dyn UnitValidator>>,
}

impl ValidatorChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chain holding the type and range validators.
    pub fn with_defaults(value_min: f64, value_max: f64) -> Self {
        let mut chain = Self::new();
        chain.push(Arc::new(TypeValidator::new()));
        chain.push(Arc::new(RangeValidator::new(value_min, value_max)));
        chain
    }

    pub fn push(&mut self, validator: Arc<dyn UnitValidator>) {
        self.links.push(validator);
    }

    /// Inserts a link at `index`, appending when `index` is past the end.
    pub fn insert(&mut self, index: usize, validator: Arc<dyn UnitValidator>) {
        let index = index.min(self.links.len());
        self.links.insert(index, validator);
    }

    /// Removes every link named `name`. Returns whether anything was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.links.len();
        self.links.retain(|link| link.name() != name);
        self.links.len() != before
    }

    pub fn clear(&mut self) {
        self.links.clear();
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.links.iter().map(|link| link.name().to_string()).collect()
    }

    /// Runs the chain. An empty chain is valid.
    pub fn run(&self, unit: &Unit, context: &UnitContext) -> ValidationOutcome {
        let mut merged = ValidationOutcome::valid();
        for link in &self.links {
            let outcome = link.validate(unit, context);
            merged.warnings.extend(outcome.warnings);
            if !outcome.is_valid || !outcome.errors.is_empty() {
                debug!(
                    "event=validation_failed module=validate status=error unit_id={} validator={} errors={}",
                    unit.id,
                    link.name(),
                    outcome.errors.len()
                );
                merged.is_valid = false;
                merged.errors = outcome.errors;
                return merged;
            }
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::{UnitValidator, ValidatorChain};
    use crate::model::context::UnitContext;
    use crate::model::outcome::{ValidationIssue, ValidationOutcome};
    use crate::model::unit::{Dimension, ReferenceUnit, SizeConfig, Unit, UnitConfig};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Fixed {
        name: &'static str,
        fail: bool,
        warn: bool,
        calls: AtomicUsize,
    }

    impl Fixed {
        fn new(name: &'static str, fail: bool, warn: bool) -> Arc<Self> {
            Arc::new(Self {
                name,
                fail,
                warn,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl UnitValidator for Fixed {
        fn name(&self) -> &str {
            self.name
        }

        fn validate(&self, _unit: &Unit, _context: &UnitContext) -> ValidationOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let errors = if self.fail {
                vec![ValidationIssue::new(self.name, "fixed_failure", "failed")]
            } else {
                vec![]
            };
            let warnings = if self.warn {
                vec![ValidationIssue::new(self.name, "fixed_warning", "warned")]
            } else {
                vec![]
            };
            ValidationOutcome::from_issues(errors, warnings)
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
    fn first_failure_short_circuits() {
        let warn = Fixed::new("warn", false, true);
        let fail = Fixed::new("fail", true, false);
        let never = Fixed::new("never", false, false);
        let mut chain = ValidatorChain::new();
        chain.push(warn.clone());
        chain.push(fail.clone());
        chain.push(never.clone());

        let outcome = chain.run(&unit(), &UnitContext::default());
        assert!(!outcome.is_valid);
        assert_eq!(outcome.errors[0].validator, "fail");
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(never.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn empty_chain_is_valid() {
        assert!(ValidatorChain::new().run(&unit(), &UnitContext::default()).is_valid);
    }

    #[test]
    fn insert_and_remove_by_name() {
        let mut chain = ValidatorChain::with_defaults(-10.0, 10.0);
        assert_eq!(chain.names(), vec!["type", "range"]);
        chain.insert(0, Fixed::new("custom", false, false));
        chain.insert(99, Fixed::new("tail", false, false));
        assert_eq!(chain.names(), vec!["custom", "type", "range", "tail"]);
        assert!(chain.remove("type"));
        assert!(!chain.remove("type"));
        assert_eq!(chain.len(), 3);
    }
}
