//! Numeric range validation of base values.

use crate::model::context::UnitContext;
use crate::model::outcome::{ValidationIssue, ValidationOutcome};
use crate::model::unit::{BaseValue, Unit};
use crate::validate::UnitValidator;

const NAME: &str = "range";

/// Checks numeric base values against a configured `[min, max]`.
///
/// Bounded random values must keep `min <= current <= max` and stay inside
/// the configured range. Percentages outside `0..=100` only warn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeValidator {
    min: f64,
    max: f64,
}

impl RangeValidator {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    fn check_number(&self, label: &str, value: f64, errors: &mut Vec<ValidationIssue>) {
        if !value.is_finite() {
            errors.push(ValidationIssue::new(
                NAME,
                "non_finite_value",
                format!("{label} must be finite, got {value}"),
            ));
        } else if value < self.min || value > self.max {
            errors.push(ValidationIssue::new(
                NAME,
                "value_out_of_range",
                format!(
                    "{label} {value} is outside [{}, {}]",
                    self.min, self.max
                ),
            ));
        }
    }
}

impl UnitValidator for RangeValidator {
    fn name(&self) -> &str {
        NAME
    }

    fn validate(&self, unit: &Unit, _context: &UnitContext) -> ValidationOutcome {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        match &unit.base_value {
            BaseValue::Number(value) => self.check_number("base value", *value, &mut errors),
            BaseValue::Random(random) => {
                if random.min() > random.max() {
                    errors.push(ValidationIssue::new(
                        NAME,
                        "inverted_random_range",
                        format!(
                            "random min ({}) must be <= max ({})",
                            random.min(),
                            random.max()
                        ),
                    ));
                }
                if !random.contains(random.current()) {
                    errors.push(ValidationIssue::new(
                        NAME,
                        "random_current_out_of_range",
                        format!("random current {} escaped its range", random.current()),
                    ));
                }
                self.check_number("random min", random.min(), &mut errors);
                self.check_number("random max", random.max(), &mut errors);
            }
            BaseValue::Keyword(_) => {}
        }

        if unit.effective_reference().is_percent() {
            if let Some(value) = unit.base_value.as_number() {
                if !(0.0..=100.0).contains(&value) {
                    warnings.push(ValidationIssue::new(
                        NAME,
                        "percent_outside_unit_interval",
                        format!("percentage {value} is outside 0..=100"),
                    ));
                }
            }
        }

        ValidationOutcome::from_issues(errors, warnings)
    }
}
