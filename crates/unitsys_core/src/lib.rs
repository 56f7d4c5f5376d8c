//! Core engine for resolving layout units.
//! Sizes, positions and scales are declared relative to parent, scene or
//! viewport frames and resolved to concrete numbers per context.

pub mod calc;
pub mod command;
pub mod config;
pub mod engine;
pub mod logging;
pub mod model;
pub mod observe;
pub mod strategy;
pub mod validate;

pub use command::{
    BatchCalculationCommand, CalculateCommand, CommandHistory, CommandId, UnitCommand,
};
pub use config::{EngineConfig, EngineConfigError};
pub use engine::{
    AspectPairResult, CalculationOptions, Clock, EngineError, EngineResult, ManualClock,
    PerformanceMetrics, SystemClock, SystemStatus, UnitManager, UnitSnapshot,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::context::{BoxSize, Frame, UnitContext, ViewportBox};
pub use model::outcome::{
    CalculationError, CalculationResult, ValidationIssue, ValidationOutcome,
};
pub use model::random::{BoundedRandomValue, RandomSource, RangeError, StdRandomSource};
pub use model::unit::{
    Anchor, AnchorEdge, AspectRatio, BaseValue, Bounds, ConfigError, Dimension, Keyword, Margins,
    PositionConfig, ReferenceUnit, ScaleConfig, SizeConfig, Unit, UnitConfig, UnitId,
    UnitLifecycle, UnitType,
};
pub use observe::{
    LogObserver, ObserverError, ObserverId, ObserverResult, PerformanceObserver, UnitObserver,
};
pub use strategy::{CalculationStrategy, StrategyInput, StrategyRegistry};
pub use validate::{UnitValidator, ValidatorChain};

/// Minimal health-check API for embedding hosts.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
