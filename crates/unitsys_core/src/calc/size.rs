//! Size calculator and aspect-ratio derivation.

use crate::calc::{ensure_finite, frame_extent, numeric_base, percent_of};
use crate::model::context::{Frame, UnitContext};
use crate::model::outcome::CalculationError;
use crate::model::unit::{Dimension, Keyword, ReferenceUnit, Unit, UnitOptions, UnitType};

/// Resolves a size unit.
///
/// `fill`, `fit` and `stretch` measure against the parent frame; `auto`
/// uses the measured content extent, then the unit's `auto_default`, then 0.
pub fn resolve_size(unit: &Unit, context: &UnitContext) -> Result<f64, CalculationError> {
    let value = resolve_size_reference(
        unit.effective_reference(),
        unit.base_value.as_number(),
        unit.dimension,
        &unit.options,
        context,
    )?;
    ensure_finite(unit.options.bounds.clamp(value))
}

/// Resolves a bare size keyword along `dimension` with default options.
pub fn resolve_size_keyword(
    keyword: Keyword,
    dimension: Dimension,
    context: &UnitContext,
) -> Result<f64, CalculationError> {
    let value = resolve_size_reference(
        keyword.as_reference(),
        None,
        dimension,
        &UnitOptions::default(),
        context,
    )?;
    ensure_finite(value)
}

fn resolve_size_reference(
    reference: ReferenceUnit,
    base: Option<f64>,
    dimension: Dimension,
    options: &UnitOptions,
    context: &UnitContext,
) -> Result<f64, CalculationError> {
    match reference {
        ReferenceUnit::Pixel => numeric_base(base, reference),
        ReferenceUnit::ParentPercent
        | ReferenceUnit::ScenePercent
        | ReferenceUnit::ViewportPercent => {
            let frame = reference.percent_frame().unwrap_or(Frame::Parent);
            let extent = frame_extent(context, frame, dimension, reference)?;
            Ok(percent_of(numeric_base(base, reference)?, extent))
        }
        ReferenceUnit::Fill | ReferenceUnit::Stretch => {
            frame_extent(context, Frame::Parent, dimension, reference)
        }
        ReferenceUnit::Fit => {
            let extent = frame_extent(context, Frame::Parent, dimension, reference)?;
            let margins = options.margins.unwrap_or_default();
            Ok((extent - margins.total()).max(0.0))
        }
        ReferenceUnit::Auto => {
            let measured = context
                .content
                .zip(dimension.axis())
                .map(|(content, axis)| content.extent(axis));
            Ok(measured.or(options.auto_default).unwrap_or(0.0))
        }
        ReferenceUnit::Factor => Err(CalculationError::UnsupportedReference {
            unit_type: UnitType::Size,
            reference,
        }),
    }
}

/// Ratio (`width / height`) linking a locked width/height pair.
///
/// Returns `None` when the pair is not locked, is not a width/height size
/// pair, either side stretches, or no positive ratio is available. Ratio
/// sources in order: height unit, width unit, context constraint.
pub fn locked_aspect_ratio(width: &Unit, height: &Unit, context: &UnitContext) -> Option<f64> {
    if width.unit_type != UnitType::Size || height.unit_type != UnitType::Size {
        return None;
    }
    if width.dimension != Dimension::Width || height.dimension != Dimension::Height {
        return None;
    }
    if !width.maintain_aspect_ratio && !height.maintain_aspect_ratio {
        return None;
    }
    if width.effective_reference() == ReferenceUnit::Stretch
        || height.effective_reference() == ReferenceUnit::Stretch
    {
        return None;
    }
    height
        .options
        .aspect_ratio
        .or(width.options.aspect_ratio)
        .or(context.aspect_ratio)
        .filter(|ratio| ratio.is_valid())
        .map(|ratio| ratio.value())
}

/// Height implied by `width` under `ratio` (`width / height`).
pub fn derive_height(width: f64, ratio: f64) -> f64 {
    width / ratio
}

/// Width/height resolved together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizePair {
    pub width: f64,
    pub height: f64,
    /// `true` when height came from the ratio instead of its own descriptor.
    pub height_derived: bool,
}

/// Resolves a width/height pair; width always resolves first.
pub fn resolve_size_pair(
    width: &Unit,
    height: &Unit,
    context: &UnitContext,
) -> Result<SizePair, CalculationError> {
    let width_value = resolve_size(width, context)?;
    match locked_aspect_ratio(width, height, context) {
        Some(ratio) => {
            let derived = height.options.bounds.clamp(derive_height(width_value, ratio));
            Ok(SizePair {
                width: width_value,
                height: ensure_finite(derived)?,
                height_derived: true,
            })
        }
        None => Ok(SizePair {
            width: width_value,
            height: resolve_size(height, context)?,
            height_derived: false,
        }),
    }
}
