//! Orchestration: unit table, timing and the manager facade.
//!
//! # Responsibility
//! - Own every unit and every extension table for one session.
//! - Turn runtime calculation problems into fallback results plus events.
//!
//! # Invariants
//! - Only configuration, lookup and range problems surface as `Err`.
//! - All mutation goes through `&mut UnitManager`; there is no shared state.
//!
//! # See also
//! - `DESIGN.md` for the calculation pipeline.

pub mod clock;
pub mod manager;
pub mod registry;

use crate::model::random::RangeError;
use crate::model::unit::{ConfigError, UnitId};
use crate::strategy::StrategyRegistryError;
use registry::RegistryError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use clock::{Clock, ManualClock, SystemClock};
pub use manager::{
    AspectPairResult, CalculationOptions, PerformanceMetrics, SystemStatus, UnitManager,
    UnitSnapshot,
};
pub use registry::UnitRegistry;

/// Hard failures returned by manager operations.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    Config(ConfigError),
    UnitNotFound(UnitId),
    DuplicateUnit(UnitId),
    Range(RangeError),
    /// The unit's base value is not a bounded random value.
    NotRandom(UnitId),
    /// No registered strategy accepts the unit.
    NoStrategy(UnitId),
    InvalidStrategy(StrategyRegistryError),
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid unit config: {err}"),
            Self::UnitNotFound(id) => write!(f, "unit not found: {id}"),
            Self::DuplicateUnit(id) => write!(f, "unit already exists: {id}"),
            Self::Range(err) => write!(f, "random range error: {err}"),
            Self::NotRandom(id) => write!(f, "unit `{id}` does not hold a random value"),
            Self::NoStrategy(id) => write!(f, "no strategy can handle unit `{id}`"),
            Self::InvalidStrategy(err) => write!(f, "invalid strategy: {err}"),
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Range(err) => Some(err),
            Self::InvalidStrategy(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<RangeError> for EngineError {
    fn from(value: RangeError) -> Self {
        Self::Range(value)
    }
}

impl From<StrategyRegistryError> for EngineError {
    fn from(value: StrategyRegistryError) -> Self {
        Self::InvalidStrategy(value)
    }
}

impl From<RegistryError> for EngineError {
    fn from(value: RegistryError) -> Self {
        match value {
            RegistryError::Config(err) => Self::Config(err),
            RegistryError::Duplicate(id) => Self::DuplicateUnit(id),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
