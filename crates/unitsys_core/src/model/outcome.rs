//! Per-call outcomes: calculation results and validation reports.
//!
//! # Invariants
//! - `CalculationResult::error` is `Some` exactly when `value` is a fallback.
//! - `ValidationOutcome::is_valid` is `true` exactly when `errors` is empty.

use crate::model::unit::{Dimension, ReferenceUnit, UnitId, UnitType};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One message raised by a validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Name of the validator link that raised the issue.
    pub validator: String,
    /// Stable machine-readable code, e.g. `value_out_of_range`.
    pub code: &'static str,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(validator: impl Into<String>, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            validator: validator.into(),
            code,
            message: message.into(),
        }
    }
}

impl Display for ValidationIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}:{}] {}", self.validator, self.code, self.message)
    }
}

/// Result of one validation pass. Never cached across contexts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    pub is_valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationOutcome {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn from_issues(errors: Vec<ValidationIssue>, warnings: Vec<ValidationIssue>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    pub fn first_error(&self) -> Option<&ValidationIssue> {
        self.errors.first()
    }
}

impl Default for ValidationOutcome {
    fn default() -> Self {
        Self::valid()
    }
}

/// Runtime calculation failure. Always resolved to a fallback value.
#[derive(Debug, Clone, PartialEq)]
pub enum CalculationError {
    /// No registered strategy accepted the input.
    NoStrategy { input: String },
    /// The validator chain reported hard errors.
    ValidationFailed(Vec<ValidationIssue>),
    /// The reference needs a frame extent the dimension does not have.
    MissingFrame {
        dimension: Dimension,
        reference: ReferenceUnit,
    },
    UnsupportedReference {
        unit_type: UnitType,
        reference: ReferenceUnit,
    },
    NonFinite(f64),
    /// A command was rejected by its own `can_execute` check.
    CommandRejected(String),
    /// Strategy-specific failure.
    Strategy(String),
}

impl CalculationError {
    /// Stable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoStrategy { .. } => "no_strategy",
            Self::ValidationFailed(_) => "validation_failed",
            Self::MissingFrame { .. } => "missing_frame",
            Self::UnsupportedReference { .. } => "unsupported_reference",
            Self::NonFinite(_) => "non_finite",
            Self::CommandRejected(_) => "command_rejected",
            Self::Strategy(_) => "strategy_error",
        }
    }
}

impl Display for CalculationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoStrategy { input } => write!(f, "no strategy can handle {input}"),
            Self::ValidationFailed(issues) => match issues.first() {
                Some(first) => write!(f, "validation failed: {first}"),
                None => write!(f, "validation failed"),
            },
            Self::MissingFrame {
                dimension,
                reference,
            } => write!(f, "`{reference}` has no frame extent for dimension `{dimension}`"),
            Self::UnsupportedReference {
                unit_type,
                reference,
            } => write!(f, "{unit_type} calculator cannot resolve `{reference}`"),
            Self::NonFinite(value) => write!(f, "calculation produced non-finite value {value}"),
            Self::CommandRejected(description) => {
                write!(f, "command cannot execute: {description}")
            }
            Self::Strategy(message) => write!(f, "strategy failed: {message}"),
        }
    }
}

impl Error for CalculationError {}

/// Resolved number plus provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationResult {
    pub value: f64,
    pub unit_id: UnitId,
    pub unit_type: UnitType,
    pub duration_ms: f64,
    pub strategy_used: String,
    pub error: Option<CalculationError>,
}

impl CalculationResult {
    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{CalculationError, ValidationIssue, ValidationOutcome};

    #[test]
    fn outcome_validity_follows_errors() {
        assert!(ValidationOutcome::from_issues(vec![], vec![]).is_valid);
        let outcome = ValidationOutcome::from_issues(
            vec![ValidationIssue::new("range", "value_out_of_range", "too big")],
            vec![],
        );
        assert!(!outcome.is_valid);
        assert_eq!(outcome.first_error().map(|issue| issue.code), Some("value_out_of_range"));
    }

    #[test]
    fn validation_failure_message_names_first_issue() {
        let err = CalculationError::ValidationFailed(vec![ValidationIssue::new(
            "type",
            "dimension_mismatch",
            "bad dimension",
        )]);
        assert_eq!(err.code(), "validation_failed");
        assert_eq!(
            err.to_string(),
            "validation failed: [type:dimension_mismatch] bad dimension"
        );
    }
}
