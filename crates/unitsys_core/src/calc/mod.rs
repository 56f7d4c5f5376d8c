//! Pure calculators: descriptor x context -> number.
//!
//! # Responsibility
//! - Resolve size, position and scale descriptors against frame extents.
//! - Report malformed descriptors as `CalculationError` instead of panicking.
//!
//! # Invariants
//! - Calculators never mutate their inputs and hold no state.
//! - Random base values resolve to their `current` value; redrawing is the
//!   caller's decision.
//! - Bounds are applied after the reference is resolved.

pub mod position;
pub mod scale;
pub mod size;

use crate::model::context::{Frame, UnitContext};
use crate::model::outcome::CalculationError;
use crate::model::unit::{Dimension, ReferenceUnit, Unit, UnitType};

pub use position::resolve_position;
pub use scale::resolve_scale;
pub use size::{derive_height, locked_aspect_ratio, resolve_size, resolve_size_pair, SizePair};

/// Resolves any unit by dispatching on its type.
pub fn resolve_unit(unit: &Unit, context: &UnitContext) -> Result<f64, CalculationError> {
    match unit.unit_type {
        UnitType::Size => resolve_size(unit, context),
        UnitType::Position => resolve_position(unit, context),
        UnitType::Scale => resolve_scale(unit, context),
    }
}

/// `percent / 100 * extent`.
pub fn percent_of(percent: f64, extent: f64) -> f64 {
    percent / 100.0 * extent
}

pub(crate) fn ensure_finite(value: f64) -> Result<f64, CalculationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalculationError::NonFinite(value))
    }
}

pub(crate) fn numeric_base(
    base: Option<f64>,
    reference: ReferenceUnit,
) -> Result<f64, CalculationError> {
    base.ok_or_else(|| {
        CalculationError::Strategy(format!("`{reference}` requires a numeric base value"))
    })
}

pub(crate) fn frame_extent(
    context: &UnitContext,
    frame: Frame,
    dimension: Dimension,
    reference: ReferenceUnit,
) -> Result<f64, CalculationError> {
    let axis = dimension.axis().ok_or(CalculationError::MissingFrame {
        dimension,
        reference,
    })?;
    Ok(context.frame(frame).extent(axis))
}
