//! Scale calculator. Scales are dimensionless factors.

use crate::calc::{ensure_finite, numeric_base};
use crate::model::context::UnitContext;
use crate::model::outcome::CalculationError;
use crate::model::unit::{ReferenceUnit, Unit, UnitType};

pub fn resolve_scale(unit: &Unit, _context: &UnitContext) -> Result<f64, CalculationError> {
    let reference = unit.effective_reference();
    let factor = match reference {
        ReferenceUnit::Factor => numeric_base(unit.base_value.as_number(), reference)?,
        ReferenceUnit::ParentPercent
        | ReferenceUnit::ScenePercent
        | ReferenceUnit::ViewportPercent => {
            numeric_base(unit.base_value.as_number(), reference)? / 100.0
        }
        ReferenceUnit::Auto => 1.0,
        other => {
            return Err(CalculationError::UnsupportedReference {
                unit_type: UnitType::Scale,
                reference: other,
            })
        }
    };
    ensure_finite(unit.options.bounds.clamp(factor))
}

#[cfg(test)]
mod tests {
    use super::resolve_scale;
    use crate::model::context::UnitContext;
    use crate::model::outcome::CalculationError;
    use crate::model::unit::{BaseValue, Bounds, Dimension, ReferenceUnit, ScaleConfig, Unit, UnitConfig};

    fn unit(reference: ReferenceUnit, value: f64) -> Unit {
        Unit::from_config(UnitConfig::Scale(ScaleConfig::new(
            "s",
            Dimension::Width,
            reference,
            value,
        )))
        .expect("valid scale config")
    }

    #[test]
    fn factor_is_verbatim_and_percent_divides() {
        let context = UnitContext::uniform(10.0, 10.0);
        assert_eq!(resolve_scale(&unit(ReferenceUnit::Factor, 0.75), &context).unwrap(), 0.75);
        assert_eq!(
            resolve_scale(&unit(ReferenceUnit::ViewportPercent, 150.0), &context).unwrap(),
            1.5
        );
        assert_eq!(resolve_scale(&unit(ReferenceUnit::Auto, 0.0), &context).unwrap(), 1.0);
    }

    #[test]
    fn scale_is_clamped_to_bounds() {
        let mut scale = unit(ReferenceUnit::Factor, 8.0);
        scale.options.bounds = Bounds::new(Some(0.1), Some(4.0));
        assert_eq!(resolve_scale(&scale, &UnitContext::default()).unwrap(), 4.0);
    }

    #[test]
    fn pixel_reference_is_unsupported() {
        let mut scale = unit(ReferenceUnit::Factor, 2.0);
        scale.reference_unit = ReferenceUnit::Pixel;
        scale.base_value = BaseValue::Number(2.0);
        assert!(matches!(
            resolve_scale(&scale, &UnitContext::default()),
            Err(CalculationError::UnsupportedReference { .. })
        ));
    }
}
