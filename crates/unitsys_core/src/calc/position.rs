//! Position calculator.
//!
//! A position is `origin + offset`: the origin comes from the optional
//! anchor, the offset from the reference unit. Percentages scale against
//! the axis' own frame dimension (x against width, y against height).

use crate::calc::{ensure_finite, frame_extent, numeric_base, percent_of};
use crate::model::context::UnitContext;
use crate::model::outcome::CalculationError;
use crate::model::unit::{Anchor, Dimension, ReferenceUnit, Unit, UnitType};

pub fn resolve_position(unit: &Unit, context: &UnitContext) -> Result<f64, CalculationError> {
    let reference = unit.effective_reference();
    let origin = match unit.options.anchor {
        Some(anchor) => anchor_origin(anchor, unit.dimension, reference, context)?,
        None => 0.0,
    };
    let offset = match reference {
        ReferenceUnit::Pixel => numeric_base(unit.base_value.as_number(), reference)?,
        ReferenceUnit::ParentPercent
        | ReferenceUnit::ScenePercent
        | ReferenceUnit::ViewportPercent => {
            let base = numeric_base(unit.base_value.as_number(), reference)?;
            match reference.percent_frame() {
                Some(frame) => {
                    percent_of(base, frame_extent(context, frame, unit.dimension, reference)?)
                }
                None => base,
            }
        }
        ReferenceUnit::Auto => 0.0,
        other => {
            return Err(CalculationError::UnsupportedReference {
                unit_type: UnitType::Position,
                reference: other,
            })
        }
    };
    ensure_finite(unit.options.bounds.clamp(origin + offset))
}

fn anchor_origin(
    anchor: Anchor,
    dimension: Dimension,
    reference: ReferenceUnit,
    context: &UnitContext,
) -> Result<f64, CalculationError> {
    let extent = frame_extent(context, anchor.frame, dimension, reference)?;
    Ok(extent * anchor.edge.fraction())
}
