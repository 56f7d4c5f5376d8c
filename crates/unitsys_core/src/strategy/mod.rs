//! Strategy selection over input shapes.
//!
//! # Responsibility
//! - Define the pluggable `CalculationStrategy` contract.
//! - Select the lowest-priority strategy that accepts an input.
//!
//! # Invariants
//! - Strategies are keyed by `unit_type()`; re-registering a key replaces
//!   the previous strategy (last write wins).
//! - Selection order is ascending `priority()`, ties broken by key.

pub mod builtin;

use crate::model::context::UnitContext;
use crate::model::outcome::CalculationError;
use crate::model::unit::{Dimension, Keyword, Unit, UnitType};
use log::debug;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub use builtin::{MixedStrategy, PositionStrategy, ScaleStrategy, SizeStrategy};

/// Input shape offered to strategies.
#[derive(Debug, Clone, Copy)]
pub enum StrategyInput<'a> {
    /// Raw number, resolved verbatim by strategies that accept it.
    Number(f64),
    /// Bare keyword along one dimension.
    Keyword {
        keyword: Keyword,
        dimension: Dimension,
    },
    /// Full unit descriptor.
    Unit(&'a Unit),
}

impl StrategyInput<'_> {
    /// Unit type tag carried by the input, if any.
    pub fn unit_type(&self) -> Option<UnitType> {
        match self {
            Self::Unit(unit) => Some(unit.unit_type),
            Self::Number(_) | Self::Keyword { .. } => None,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Number(value) => format!("number {value}"),
            Self::Keyword { keyword, dimension } => {
                format!("keyword `{}` on {dimension}", keyword.as_str())
            }
            Self::Unit(unit) => format!("{} unit `{}`", unit.unit_type, unit.id),
        }
    }
}

/// Pluggable resolution algorithm.
pub trait CalculationStrategy: Send + Sync {
    /// Registry key, e.g. `size`.
    fn unit_type(&self) -> &str;
    /// Lower values are tried first.
    fn priority(&self) -> i32;
    fn can_handle(&self, input: &StrategyInput<'_>) -> bool;
    fn calculate(
        &self,
        input: &StrategyInput<'_>,
        context: &UnitContext,
    ) -> Result<f64, CalculationError>;
}

/// Strategy registration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyRegistryError {
    InvalidKey(String),
}

impl Display for StrategyRegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidKey(value) => write!(f, "strategy key is invalid: `{value}`"),
        }
    }
}

impl Error for StrategyRegistryError {}

/// Strategies keyed by declared unit type.
#[derive(Default, Clone)]
pub struct StrategyRegistry {
    strategies: BTreeMap<String, Arc<dyn CalculationStrategy>>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the size, position, scale and mixed strategies.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.install_defaults();
        registry
    }

    pub(crate) fn install_defaults(&mut self) {
        let defaults: [Arc<dyn CalculationStrategy>; 4] = [
            Arc::new(SizeStrategy::new()),
            Arc::new(PositionStrategy::new()),
            Arc::new(ScaleStrategy::new()),
            Arc::new(MixedStrategy::new()),
        ];
        for strategy in defaults {
            self.strategies
                .insert(strategy.unit_type().to_string(), strategy);
        }
    }

    /// Registers one strategy, returning the one it replaced.
    pub fn register(
        &mut self,
        strategy: Arc<dyn CalculationStrategy>,
    ) -> Result<Option<Arc<dyn CalculationStrategy>>, StrategyRegistryError> {
        let key = strategy.unit_type().trim().to_string();
        if !is_valid_strategy_key(&key) {
            return Err(StrategyRegistryError::InvalidKey(key));
        }
        let previous = self.strategies.insert(key.clone(), strategy);
        if previous.is_some() {
            debug!("event=strategy_replace module=strategy status=ok key={key}");
        }
        Ok(previous)
    }

    pub fn remove(&mut self, key: &str) -> Option<Arc<dyn CalculationStrategy>> {
        self.strategies.remove(key.trim())
    }

    pub fn get(&self, key: &str) -> Option<Arc<dyn CalculationStrategy>> {
        self.strategies.get(key.trim()).cloned()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Returns sorted strategy keys.
    pub fn keys(&self) -> Vec<String> {
        self.strategies.keys().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.strategies.clear();
    }

    /// Returns the first strategy, by ascending priority, that accepts `input`.
    ///
    /// # Errors
    /// - `CalculationError::NoStrategy` when nothing matches.
    pub fn select(
        &self,
        input: &StrategyInput<'_>,
    ) -> Result<Arc<dyn CalculationStrategy>, CalculationError> {
        let mut ordered: Vec<&Arc<dyn CalculationStrategy>> = self.strategies.values().collect();
        // BTreeMap iteration is key-ordered and the sort is stable.
        ordered.sort_by_key(|strategy| strategy.priority());
        ordered
            .into_iter()
            .find(|strategy| strategy.can_handle(input))
            .cloned()
            .ok_or_else(|| CalculationError::NoStrategy {
                input: input.describe(),
            })
    }
}

fn is_valid_strategy_key(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}
