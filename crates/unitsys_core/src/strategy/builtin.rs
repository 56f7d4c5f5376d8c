//! Built-in strategies backed by the pure calculators.

use crate::calc::size::resolve_size_keyword;
use crate::calc::{resolve_position, resolve_scale, resolve_size};
use crate::model::context::UnitContext;
use crate::model::outcome::CalculationError;
use crate::model::unit::{Unit, UnitType};
use crate::strategy::{CalculationStrategy, StrategyInput};

pub const SIZE_PRIORITY: i32 = 10;
pub const POSITION_PRIORITY: i32 = 20;
pub const SCALE_PRIORITY: i32 = 30;
pub const MIXED_PRIORITY: i32 = 100;

fn expect_unit<'a>(
    input: &StrategyInput<'a>,
    strategy: &str,
) -> Result<&'a Unit, CalculationError> {
    match input {
        StrategyInput::Unit(unit) => Ok(*unit),
        other => Err(CalculationError::Strategy(format!(
            "{strategy} strategy expects a unit descriptor, got {}",
            other.describe()
        ))),
    }
}

fn expect_unit_type(unit: &Unit, expected: UnitType) -> Result<(), CalculationError> {
    if unit.unit_type == expected {
        Ok(())
    } else {
        Err(CalculationError::Strategy(format!(
            "{expected} strategy cannot resolve {} unit `{}`",
            unit.unit_type, unit.id
        )))
    }
}

macro_rules! unit_strategy {
    ($name:ident, $unit_type:expr, $priority:expr, $resolve:path) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name {
            priority: i32,
        }

        impl $name {
            pub fn new() -> Self {
                Self {
                    priority: $priority,
                }
            }

            pub fn with_priority(priority: i32) -> Self {
                Self { priority }
            }

            fn resolve(&self, unit: &Unit, context: &UnitContext) -> Result<f64, CalculationError> {
                expect_unit_type(unit, $unit_type)?;
                $resolve(unit, context)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl CalculationStrategy for $name {
            fn unit_type(&self) -> &str {
                $unit_type.as_str()
            }

            fn priority(&self) -> i32 {
                self.priority
            }

            fn can_handle(&self, input: &StrategyInput<'_>) -> bool {
                input.unit_type() == Some($unit_type)
            }

            fn calculate(
                &self,
                input: &StrategyInput<'_>,
                context: &UnitContext,
            ) -> Result<f64, CalculationError> {
                let unit = expect_unit(input, $unit_type.as_str())?;
                self.resolve(unit, context)
            }
        }
    };
}

unit_strategy!(SizeStrategy, UnitType::Size, SIZE_PRIORITY, resolve_size);
unit_strategy!(
    PositionStrategy,
    UnitType::Position,
    POSITION_PRIORITY,
    resolve_position
);
unit_strategy!(ScaleStrategy, UnitType::Scale, SCALE_PRIORITY, resolve_scale);

/// Single entry point when the unit kind is not known statically.
///
/// Delegates tagged units to the inner size/position/scale strategies,
/// resolves raw numbers verbatim and bare keywords as parent-relative sizes.
#[derive(Debug, Clone, Copy)]
pub struct MixedStrategy {
    priority: i32,
    size: SizeStrategy,
    position: PositionStrategy,
    scale: ScaleStrategy,
}

impl MixedStrategy {
    pub fn new() -> Self {
        Self::with_priority(MIXED_PRIORITY)
    }

    pub fn with_priority(priority: i32) -> Self {
        Self {
            priority,
            size: SizeStrategy::new(),
            position: PositionStrategy::new(),
            scale: ScaleStrategy::new(),
        }
    }

    fn delegate(&self, unit_type: UnitType) -> &dyn CalculationStrategy {
        match unit_type {
            UnitType::Size => &self.size,
            UnitType::Position => &self.position,
            UnitType::Scale => &self.scale,
        }
    }
}

impl Default for MixedStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl CalculationStrategy for MixedStrategy {
    fn unit_type(&self) -> &str {
        "mixed"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn can_handle(&self, input: &StrategyInput<'_>) -> bool {
        match input {
            StrategyInput::Number(value) => value.is_finite(),
            StrategyInput::Keyword { dimension, .. } => dimension.axis().is_some(),
            StrategyInput::Unit(unit) => self.delegate(unit.unit_type).can_handle(input)
                && unit.unit_type.supports_dimension(unit.dimension),
        }
    }

    fn calculate(
        &self,
        input: &StrategyInput<'_>,
        context: &UnitContext,
    ) -> Result<f64, CalculationError> {
        match input {
            StrategyInput::Number(value) => Ok(*value),
            StrategyInput::Keyword { keyword, dimension } => {
                resolve_size_keyword(*keyword, *dimension, context)
            }
            StrategyInput::Unit(unit) => self.delegate(unit.unit_type).calculate(input, context),
        }
    }
}
