//! Descriptor shape validation against the declared unit type.

use crate::model::context::UnitContext;
use crate::model::outcome::{ValidationIssue, ValidationOutcome};
use crate::model::unit::{BaseValue, Dimension, Unit, UnitType};
use crate::validate::UnitValidator;

const NAME: &str = "type";

/// Checks that dimension, reference, keyword and options fit `unit_type`.
///
/// Units built from a `UnitConfig` pass by construction; this link catches
/// descriptors mutated afterwards or assembled by hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeValidator;

impl TypeValidator {
    pub fn new() -> Self {
        Self
    }
}

impl UnitValidator for TypeValidator {
    fn name(&self) -> &str {
        NAME
    }

    fn validate(&self, unit: &Unit, context: &UnitContext) -> ValidationOutcome {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let unit_type = unit.unit_type;

        if !unit_type.supports_dimension(unit.dimension) {
            errors.push(ValidationIssue::new(
                NAME,
                "dimension_mismatch",
                format!("{unit_type} unit cannot measure `{}`", unit.dimension),
            ));
        }
        if !unit_type.supports_reference(unit.reference_unit) {
            errors.push(ValidationIssue::new(
                NAME,
                "reference_mismatch",
                format!("{unit_type} unit cannot use `{}`", unit.reference_unit),
            ));
        }
        if let BaseValue::Keyword(keyword) = unit.base_value {
            if !unit_type.supports_keyword(keyword) {
                errors.push(ValidationIssue::new(
                    NAME,
                    "keyword_mismatch",
                    format!("{unit_type} unit cannot use keyword `{}`", keyword.as_str()),
                ));
            }
        }

        let options = &unit.options;
        if options.anchor.is_some() && unit_type != UnitType::Position {
            errors.push(option_mismatch(unit_type, "anchor"));
        }
        if unit_type != UnitType::Size {
            if options.margins.is_some() {
                errors.push(option_mismatch(unit_type, "margins"));
            }
            if options.aspect_ratio.is_some() || unit.maintain_aspect_ratio {
                errors.push(option_mismatch(unit_type, "aspect_ratio"));
            }
            if options.auto_default.is_some() {
                errors.push(option_mismatch(unit_type, "auto_default"));
            }
        } else if unit.maintain_aspect_ratio && unit.dimension == Dimension::Depth {
            errors.push(option_mismatch(unit_type, "aspect_ratio"));
        }

        if let (Some(frame), Some(axis)) = (
            unit.effective_reference().percent_frame(),
            unit.dimension.axis(),
        ) {
            if context.frame(frame).extent(axis) <= 0.0 {
                warnings.push(ValidationIssue::new(
                    NAME,
                    "empty_frame",
                    format!(
                        "{} frame has no {} extent in this context",
                        frame.as_str(),
                        unit.dimension
                    ),
                ));
            }
        }

        ValidationOutcome::from_issues(errors, warnings)
    }
}

fn option_mismatch(unit_type: UnitType, option: &str) -> ValidationIssue {
    ValidationIssue::new(
        NAME,
        "option_mismatch",
        format!("{unit_type} unit cannot carry `{option}`"),
    )
}
