//! Bounded random values and the injectable random source.
//!
//! # Invariants
//! - `min <= current <= max` holds for every `BoundedRandomValue`.
//! - Failed sets never mutate `current`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Uniform random source injected into the engine.
pub trait RandomSource: Send {
    /// Returns a value uniformly distributed in `[min, max]`.
    fn next_in_range(&mut self, min: f64, max: f64) -> f64;
}

/// `rand`-backed source; seeded for reproducible runs.
pub struct StdRandomSource {
    rng: StdRng,
}

impl StdRandomSource {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for StdRandomSource {
    fn next_in_range(&mut self, min: f64, max: f64) -> f64 {
        if min >= max {
            return min;
        }
        // `max - min` can overflow for finite bounds; interpolate instead.
        let t: f64 = self.rng.gen_range(0.0..=1.0);
        (min * (1.0 - t) + max * t).clamp(min, max)
    }
}

/// `{min, max, current}` triple redrawn on demand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoundedRandomRepr", into = "BoundedRandomRepr")]
pub struct BoundedRandomValue {
    min: f64,
    max: f64,
    current: f64,
}

impl BoundedRandomValue {
    /// Creates a range with `current` starting at `min`.
    pub fn new(min: f64, max: f64) -> Result<Self, RangeError> {
        Self::with_current(min, max, min)
    }

    pub fn with_current(min: f64, max: f64, current: f64) -> Result<Self, RangeError> {
        if !min.is_finite() || !max.is_finite() || !current.is_finite() {
            return Err(RangeError::NonFinite);
        }
        if min > max {
            return Err(RangeError::InvertedRange { min, max });
        }
        if current < min || current > max {
            return Err(RangeError::OutOfRange {
                value: current,
                min,
                max,
            });
        }
        Ok(Self { min, max, current })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Sets `current` explicitly.
    ///
    /// # Errors
    /// - Returns `RangeError::OutOfRange` without touching `current` when
    ///   `value` lies outside `[min, max]`.
    pub fn set_current(&mut self, value: f64) -> Result<(), RangeError> {
        if !value.is_finite() {
            return Err(RangeError::NonFinite);
        }
        if !self.contains(value) {
            return Err(RangeError::OutOfRange {
                value,
                min: self.min,
                max: self.max,
            });
        }
        self.current = value;
        Ok(())
    }

    /// Redraws `current` uniformly in `[min, max]` and returns it.
    pub fn get_random_value(&mut self, source: &mut dyn RandomSource) -> f64 {
        let drawn = source.next_in_range(self.min, self.max);
        // Sources are external; keep the range invariant even for bad ones.
        self.current = if drawn.is_finite() {
            drawn.clamp(self.min, self.max)
        } else {
            self.min
        };
        self.current
    }
}

#[derive(Serialize, Deserialize)]
struct BoundedRandomRepr {
    min: f64,
    max: f64,
    #[serde(default)]
    current: Option<f64>,
}

impl TryFrom<BoundedRandomRepr> for BoundedRandomValue {
    type Error = RangeError;

    fn try_from(value: BoundedRandomRepr) -> Result<Self, Self::Error> {
        Self::with_current(value.min, value.max, value.current.unwrap_or(value.min))
    }
}

impl From<BoundedRandomValue> for BoundedRandomRepr {
    fn from(value: BoundedRandomValue) -> Self {
        Self {
            min: value.min,
            max: value.max,
            current: Some(value.current),
        }
    }
}

/// Bounded random range errors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeError {
    NonFinite,
    InvertedRange { min: f64, max: f64 },
    OutOfRange { value: f64, min: f64, max: f64 },
}

impl Display for RangeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFinite => write!(f, "random range values must be finite"),
            Self::InvertedRange { min, max } => {
                write!(f, "random range min ({min}) must be <= max ({max})")
            }
            Self::OutOfRange { value, min, max } => {
                write!(f, "value {value} is outside random range [{min}, {max}]")
            }
        }
    }
}

impl Error for RangeError {}

#[cfg(test)]
mod tests {
    use super::{BoundedRandomValue, RandomSource, RangeError, StdRandomSource};

    struct FixedSource(f64);

    impl RandomSource for FixedSource {
        fn next_in_range(&mut self, _min: f64, _max: f64) -> f64 {
            self.0
        }
    }

    #[test]
    fn rejects_inverted_range() {
        assert_eq!(
            BoundedRandomValue::new(5.0, 1.0).unwrap_err(),
            RangeError::InvertedRange { min: 5.0, max: 1.0 }
        );
    }

    #[test]
    fn out_of_range_set_keeps_current() {
        let mut value = BoundedRandomValue::with_current(0.0, 10.0, 4.0).unwrap();
        let err = value.set_current(11.0).unwrap_err();
        assert!(matches!(err, RangeError::OutOfRange { .. }));
        assert_eq!(value.current(), 4.0);

        value.set_current(10.0).unwrap();
        assert_eq!(value.current(), 10.0);
    }

    #[test]
    fn misbehaving_source_is_clamped_into_range() {
        let mut value = BoundedRandomValue::new(1.0, 2.0).unwrap();
        assert_eq!(value.get_random_value(&mut FixedSource(7.0)), 2.0);
        assert_eq!(value.get_random_value(&mut FixedSource(f64::NAN)), 1.0);
    }

    #[test]
    fn seeded_sources_are_reproducible() {
        let mut first = StdRandomSource::seeded(42);
        let mut second = StdRandomSource::seeded(42);
        let mut a = BoundedRandomValue::new(0.0, 100.0).unwrap();
        let mut b = a;
        for _ in 0..16 {
            assert_eq!(a.get_random_value(&mut first), b.get_random_value(&mut second));
        }
    }

    #[test]
    fn full_finite_span_draws_without_overflow() {
        let mut value = BoundedRandomValue::new(-f64::MAX, f64::MAX).unwrap();
        let mut source = StdRandomSource::seeded(7);
        for _ in 0..64 {
            let drawn = value.get_random_value(&mut source);
            assert!(drawn.is_finite());
            assert!(value.contains(drawn));
        }
    }

    #[test]
    fn degenerate_range_always_returns_min() {
        let mut value = BoundedRandomValue::new(3.0, 3.0).unwrap();
        let mut source = StdRandomSource::seeded(1);
        assert_eq!(value.get_random_value(&mut source), 3.0);
    }

    #[test]
    fn deserialization_enforces_invariant() {
        let ok: BoundedRandomValue =
            serde_json::from_value(serde_json::json!({ "min": 1.0, "max": 3.0 })).unwrap();
        assert_eq!(ok.current(), 1.0);

        let err = serde_json::from_value::<BoundedRandomValue>(
            serde_json::json!({ "min": 1.0, "max": 3.0, "current": 9.0 }),
        )
        .unwrap_err();
        assert!(err.to_string().contains("outside random range"));
    }
}
