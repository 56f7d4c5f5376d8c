//! Unit descriptor model.
//!
//! # Responsibility
//! - Define the symbolic measurement descriptor resolved by the engine.
//! - Provide the closed `UnitConfig` union used to create units.
//! - Validate every config exhaustively before a `Unit` exists.
//!
//! # Invariants
//! - `Unit::id` is stable for the lifetime of a registered unit.
//! - A unit built through `Unit::from_config` always satisfies the
//!   type/dimension/reference combination rules of its `UnitType`.
//! - A keyword base value overrides the reference unit at resolution time.

use crate::model::context::{Axis, Frame};
use crate::model::random::BoundedRandomValue;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static UNIT_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:[._-][a-z0-9]+)*$").expect("valid unit id regex"));

/// Stable identifier of one registered unit.
pub type UnitId = String;

/// Measurement kind of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    Size,
    Position,
    Scale,
}

impl UnitType {
    /// Stable string id used in logs and strategy keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Size => "size",
            Self::Position => "position",
            Self::Scale => "scale",
        }
    }

    /// Value substituted when a calculation of this kind fails.
    pub fn fallback_value(self) -> f64 {
        match self {
            Self::Size | Self::Position => 0.0,
            Self::Scale => 1.0,
        }
    }

    pub fn supports_dimension(self, dimension: Dimension) -> bool {
        match self {
            Self::Size => matches!(
                dimension,
                Dimension::Width | Dimension::Height | Dimension::Depth
            ),
            Self::Position => matches!(dimension, Dimension::X | Dimension::Y | Dimension::Depth),
            Self::Scale => true,
        }
    }

    pub fn supports_reference(self, reference: ReferenceUnit) -> bool {
        use ReferenceUnit as R;
        match self {
            Self::Size => !matches!(reference, R::Factor),
            Self::Position => matches!(
                reference,
                R::Pixel | R::ParentPercent | R::ScenePercent | R::ViewportPercent | R::Auto
            ),
            Self::Scale => matches!(
                reference,
                R::Factor | R::ParentPercent | R::ScenePercent | R::ViewportPercent | R::Auto
            ),
        }
    }

    /// Keyword base values are only meaningful for sizes.
    pub fn supports_keyword(self, keyword: Keyword) -> bool {
        match self {
            Self::Size => true,
            Self::Position | Self::Scale => matches!(keyword, Keyword::Auto),
        }
    }
}

impl Display for UnitType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolution mode of a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceUnit {
    Pixel,
    ParentPercent,
    ScenePercent,
    ViewportPercent,
    Fill,
    Fit,
    Stretch,
    Auto,
    Factor,
}

impl ReferenceUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pixel => "pixel",
            Self::ParentPercent => "parent_percent",
            Self::ScenePercent => "scene_percent",
            Self::ViewportPercent => "viewport_percent",
            Self::Fill => "fill",
            Self::Fit => "fit",
            Self::Stretch => "stretch",
            Self::Auto => "auto",
            Self::Factor => "factor",
        }
    }

    /// Frame a percentage reference scales against.
    pub fn percent_frame(self) -> Option<Frame> {
        match self {
            Self::ParentPercent => Some(Frame::Parent),
            Self::ScenePercent => Some(Frame::Scene),
            Self::ViewportPercent => Some(Frame::Viewport),
            _ => None,
        }
    }

    pub fn is_percent(self) -> bool {
        self.percent_frame().is_some()
    }
}

impl Display for ReferenceUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Measured dimension or positional axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Width,
    Height,
    X,
    Y,
    Depth,
}

impl Dimension {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Width => "width",
            Self::Height => "height",
            Self::X => "x",
            Self::Y => "y",
            Self::Depth => "depth",
        }
    }

    /// Frame axis this dimension measures along. `Depth` has none.
    pub fn axis(self) -> Option<Axis> {
        match self {
            Self::Width | Self::X => Some(Axis::Horizontal),
            Self::Height | Self::Y => Some(Axis::Vertical),
            Self::Depth => None,
        }
    }
}

impl Display for Dimension {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Symbolic keyword accepted as a base value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Keyword {
    Fill,
    Fit,
    Stretch,
    Auto,
}

impl Keyword {
    pub fn as_str(self) -> &'static str {
        self.as_reference().as_str()
    }

    pub fn as_reference(self) -> ReferenceUnit {
        match self {
            Self::Fill => ReferenceUnit::Fill,
            Self::Fit => ReferenceUnit::Fit,
            Self::Stretch => ReferenceUnit::Stretch,
            Self::Auto => ReferenceUnit::Auto,
        }
    }
}

impl FromStr for Keyword {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fill" => Ok(Self::Fill),
            "fit" => Ok(Self::Fit),
            "stretch" => Ok(Self::Stretch),
            "auto" => Ok(Self::Auto),
            other => Err(ConfigError::UnknownKeyword(other.to_string())),
        }
    }
}

/// Base value of a descriptor.
///
/// Serialized untagged: a JSON number, a keyword string, or a
/// `{min, max, current}` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BaseValue {
    Number(f64),
    Keyword(Keyword),
    Random(BoundedRandomValue),
}

impl BaseValue {
    /// Numeric view of the value. Random values report their `current`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Random(random) => Some(random.current()),
            Self::Keyword(_) => None,
        }
    }

    pub fn keyword(&self) -> Option<Keyword> {
        match self {
            Self::Keyword(keyword) => Some(*keyword),
            _ => None,
        }
    }

    pub fn kind_str(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Keyword(_) => "keyword",
            Self::Random(_) => "random",
        }
    }
}

impl From<f64> for BaseValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<Keyword> for BaseValue {
    fn from(value: Keyword) -> Self {
        Self::Keyword(value)
    }
}

impl From<BoundedRandomValue> for BaseValue {
    fn from(value: BoundedRandomValue) -> Self {
        Self::Random(value)
    }
}

impl Display for BaseValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Keyword(keyword) => f.write_str(keyword.as_str()),
            Self::Random(random) => write!(
                f,
                "random[{}..={}]@{}",
                random.min(),
                random.max(),
                random.current()
            ),
        }
    }
}

/// Optional clamp applied to a resolved value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl Bounds {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn clamp(&self, value: f64) -> f64 {
        let mut clamped = value;
        if let Some(min) = self.min {
            clamped = clamped.max(min);
        }
        if let Some(max) = self.max {
            clamped = clamped.min(max);
        }
        clamped
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for bound in [self.min, self.max].into_iter().flatten() {
            if !bound.is_finite() {
                return Err(ConfigError::NonFiniteValue("bounds"));
            }
        }
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min > max {
                return Err(ConfigError::InvalidBounds { min, max });
            }
        }
        Ok(())
    }
}

/// Space reserved on both ends of a frame by `fit` sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub start: f64,
    pub end: f64,
}

impl Margins {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn uniform(value: f64) -> Self {
        Self::new(value, value)
    }

    pub fn total(&self) -> f64 {
        self.start + self.end
    }
}

/// Width-to-height ratio, written `W:H` in text form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectRatio {
    pub width: f64,
    pub height: f64,
}

impl AspectRatio {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns `width / height`.
    pub fn value(&self) -> f64 {
        self.width / self.height
    }

    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl FromStr for AspectRatio {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidAspectRatio(value.to_string());
        let (width, height) = value.split_once(':').ok_or_else(invalid)?;
        let width = width.trim().parse::<f64>().map_err(|_| invalid())?;
        let height = height.trim().parse::<f64>().map_err(|_| invalid())?;
        let ratio = Self::new(width, height);
        if !ratio.is_valid() {
            return Err(invalid());
        }
        Ok(ratio)
    }
}

/// Edge of a frame used as a position origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorEdge {
    Start,
    Center,
    End,
}

impl AnchorEdge {
    /// Fraction of the frame extent where this edge lies.
    pub fn fraction(self) -> f64 {
        match self {
            Self::Start => 0.0,
            Self::Center => 0.5,
            Self::End => 1.0,
        }
    }
}

/// Reference-relative origin for positions, e.g. parent center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Anchor {
    pub frame: Frame,
    pub edge: AnchorEdge,
}

impl Anchor {
    pub fn new(frame: Frame, edge: AnchorEdge) -> Self {
        Self { frame, edge }
    }

    pub fn parent_center() -> Self {
        Self::new(Frame::Parent, AnchorEdge::Center)
    }

    pub fn scene_end() -> Self {
        Self::new(Frame::Scene, AnchorEdge::End)
    }
}

/// Kind-specific extras carried by a unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitOptions {
    #[serde(default)]
    pub bounds: Bounds,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margins: Option<Margins>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<AspectRatio>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<Anchor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_default: Option<f64>,
}

/// Lifecycle state of one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitLifecycle {
    Created,
    Active,
    Inactive,
    Destroyed,
}

/// Resolved descriptor tracked by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub unit_type: UnitType,
    pub reference_unit: ReferenceUnit,
    pub dimension: Dimension,
    pub base_value: BaseValue,
    pub maintain_aspect_ratio: bool,
    pub is_active: bool,
    pub lifecycle: UnitLifecycle,
    #[serde(default)]
    pub options: UnitOptions,
}

impl Unit {
    /// Builds a unit from a config after exhaustive validation.
    ///
    /// # Errors
    /// - Returns `ConfigError` for any malformed field; nothing is defaulted.
    pub fn from_config(config: UnitConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let unit_type = config.unit_type();
        let unit = match config {
            UnitConfig::Size(size) => Self {
                name: display_name(size.name, &size.id),
                id: size.id,
                unit_type,
                reference_unit: size.reference_unit,
                dimension: size.dimension,
                base_value: size.base_value,
                maintain_aspect_ratio: size.maintain_aspect_ratio,
                is_active: false,
                lifecycle: UnitLifecycle::Created,
                options: UnitOptions {
                    bounds: size.bounds,
                    margins: size.margins,
                    aspect_ratio: size.aspect_ratio,
                    anchor: None,
                    auto_default: size.auto_default,
                },
            },
            UnitConfig::Position(position) => Self {
                name: display_name(position.name, &position.id),
                id: position.id,
                unit_type,
                reference_unit: position.reference_unit,
                dimension: position.axis,
                base_value: position.base_value,
                maintain_aspect_ratio: false,
                is_active: false,
                lifecycle: UnitLifecycle::Created,
                options: UnitOptions {
                    bounds: position.bounds,
                    anchor: position.anchor,
                    ..UnitOptions::default()
                },
            },
            UnitConfig::Scale(scale) => Self {
                name: display_name(scale.name, &scale.id),
                id: scale.id,
                unit_type,
                reference_unit: scale.reference_unit,
                dimension: scale.dimension,
                base_value: scale.base_value,
                maintain_aspect_ratio: false,
                is_active: false,
                lifecycle: UnitLifecycle::Created,
                options: UnitOptions {
                    bounds: scale.bounds,
                    ..UnitOptions::default()
                },
            },
        };
        Ok(unit)
    }

    /// Reference unit used at resolution time.
    pub fn effective_reference(&self) -> ReferenceUnit {
        match self.base_value.keyword() {
            Some(keyword) => keyword.as_reference(),
            None => self.reference_unit,
        }
    }

    /// Transitions `created|inactive -> active` or `active -> inactive`.
    ///
    /// Destroyed units keep their terminal state.
    pub fn set_active(&mut self, active: bool) {
        if self.lifecycle == UnitLifecycle::Destroyed {
            return;
        }
        self.is_active = active;
        self.lifecycle = if active {
            UnitLifecycle::Active
        } else {
            UnitLifecycle::Inactive
        };
    }

    pub(crate) fn mark_destroyed(&mut self) {
        self.is_active = false;
        self.lifecycle = UnitLifecycle::Destroyed;
    }
}

fn display_name(name: String, id: &str) -> String {
    if name.trim().is_empty() {
        id.to_string()
    } else {
        name
    }
}

/// Creation request for a size unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeConfig {
    pub id: UnitId,
    #[serde(default)]
    pub name: String,
    pub dimension: Dimension,
    pub reference_unit: ReferenceUnit,
    pub base_value: BaseValue,
    #[serde(default)]
    pub maintain_aspect_ratio: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<AspectRatio>,
    #[serde(default)]
    pub bounds: Bounds,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margins: Option<Margins>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_default: Option<f64>,
}

impl SizeConfig {
    pub fn new(
        id: impl Into<String>,
        dimension: Dimension,
        reference_unit: ReferenceUnit,
        base_value: impl Into<BaseValue>,
    ) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            dimension,
            reference_unit,
            base_value: base_value.into(),
            maintain_aspect_ratio: false,
            aspect_ratio: None,
            bounds: Bounds::default(),
            margins: None,
            auto_default: None,
        }
    }

    pub fn with_aspect_ratio(mut self, ratio: AspectRatio) -> Self {
        self.maintain_aspect_ratio = true;
        self.aspect_ratio = Some(ratio);
        self
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = Some(margins);
        self
    }

    pub fn with_auto_default(mut self, value: f64) -> Self {
        self.auto_default = Some(value);
        self
    }
}

/// Creation request for a position unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionConfig {
    pub id: UnitId,
    #[serde(default)]
    pub name: String,
    pub axis: Dimension,
    pub reference_unit: ReferenceUnit,
    pub base_value: BaseValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<Anchor>,
    #[serde(default)]
    pub bounds: Bounds,
}

impl PositionConfig {
    pub fn new(
        id: impl Into<String>,
        axis: Dimension,
        reference_unit: ReferenceUnit,
        base_value: impl Into<BaseValue>,
    ) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            axis,
            reference_unit,
            base_value: base_value.into(),
            anchor: None,
            bounds: Bounds::default(),
        }
    }

    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }
}

/// Creation request for a scale unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleConfig {
    pub id: UnitId,
    #[serde(default)]
    pub name: String,
    pub dimension: Dimension,
    pub reference_unit: ReferenceUnit,
    pub base_value: BaseValue,
    #[serde(default)]
    pub bounds: Bounds,
}

impl ScaleConfig {
    pub fn new(
        id: impl Into<String>,
        dimension: Dimension,
        reference_unit: ReferenceUnit,
        base_value: impl Into<BaseValue>,
    ) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            dimension,
            reference_unit,
            base_value: base_value.into(),
            bounds: Bounds::default(),
        }
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }
}

/// Closed creation request, tagged by `unit_type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit_type", rename_all = "snake_case")]
pub enum UnitConfig {
    Size(SizeConfig),
    Position(PositionConfig),
    Scale(ScaleConfig),
}

impl UnitConfig {
    pub fn unit_type(&self) -> UnitType {
        match self {
            Self::Size(_) => UnitType::Size,
            Self::Position(_) => UnitType::Position,
            Self::Scale(_) => UnitType::Scale,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Size(config) => &config.id,
            Self::Position(config) => &config.id,
            Self::Scale(config) => &config.id,
        }
    }

    /// Validates every field against the declared unit type.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_unit_id(self.id())?;
        let unit_type = self.unit_type();
        match self {
            Self::Size(config) => {
                check_combination(
                    unit_type,
                    config.dimension,
                    config.reference_unit,
                    &config.base_value,
                )?;
                config.bounds.validate()?;
                if let Some(margins) = config.margins {
                    if !margins.start.is_finite() || !margins.end.is_finite() {
                        return Err(ConfigError::NonFiniteValue("margins"));
                    }
                    if margins.start < 0.0 || margins.end < 0.0 {
                        return Err(ConfigError::NegativeMargin);
                    }
                }
                if let Some(ratio) = config.aspect_ratio {
                    if !ratio.is_valid() {
                        return Err(ConfigError::InvalidAspectRatio(format!(
                            "{}:{}",
                            ratio.width, ratio.height
                        )));
                    }
                }
                if config.maintain_aspect_ratio && config.dimension == Dimension::Depth {
                    return Err(ConfigError::AspectLockUnsupported(config.dimension));
                }
                if let Some(value) = config.auto_default {
                    if !value.is_finite() {
                        return Err(ConfigError::NonFiniteValue("auto_default"));
                    }
                }
                Ok(())
            }
            Self::Position(config) => {
                check_combination(
                    unit_type,
                    config.axis,
                    config.reference_unit,
                    &config.base_value,
                )?;
                if config.anchor.is_some() && config.axis == Dimension::Depth {
                    return Err(ConfigError::AnchorUnsupported(config.axis));
                }
                config.bounds.validate()
            }
            Self::Scale(config) => {
                check_combination(
                    unit_type,
                    config.dimension,
                    config.reference_unit,
                    &config.base_value,
                )?;
                config.bounds.validate()
            }
        }
    }
}

/// Validates a unit id (`[a-z0-9]` words joined by single `.`, `_` or `-`).
pub fn validate_unit_id(id: &str) -> Result<(), ConfigError> {
    if id.trim().is_empty() {
        return Err(ConfigError::EmptyId);
    }
    if !UNIT_ID_RE.is_match(id) {
        return Err(ConfigError::InvalidId(id.to_string()));
    }
    Ok(())
}

pub(crate) fn check_combination(
    unit_type: UnitType,
    dimension: Dimension,
    reference: ReferenceUnit,
    base_value: &BaseValue,
) -> Result<(), ConfigError> {
    if !unit_type.supports_dimension(dimension) {
        return Err(ConfigError::InvalidDimension {
            unit_type,
            dimension,
        });
    }
    if !unit_type.supports_reference(reference) {
        return Err(ConfigError::UnsupportedReference {
            unit_type,
            reference,
        });
    }
    match base_value {
        BaseValue::Number(value) if !value.is_finite() => {
            Err(ConfigError::NonFiniteValue("base_value"))
        }
        BaseValue::Keyword(keyword) if !unit_type.supports_keyword(*keyword) => {
            Err(ConfigError::UnsupportedKeyword {
                unit_type,
                keyword: *keyword,
            })
        }
        _ => Ok(()),
    }
}

/// Configuration errors raised when a unit is created.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    EmptyId,
    InvalidId(String),
    InvalidDimension {
        unit_type: UnitType,
        dimension: Dimension,
    },
    UnsupportedReference {
        unit_type: UnitType,
        reference: ReferenceUnit,
    },
    UnsupportedKeyword {
        unit_type: UnitType,
        keyword: Keyword,
    },
    UnknownKeyword(String),
    NonFiniteValue(&'static str),
    InvalidBounds {
        min: f64,
        max: f64,
    },
    NegativeMargin,
    InvalidAspectRatio(String),
    AspectLockUnsupported(Dimension),
    AnchorUnsupported(Dimension),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "unit id cannot be empty"),
            Self::InvalidId(value) => write!(f, "unit id is invalid: `{value}`"),
            Self::InvalidDimension {
                unit_type,
                dimension,
            } => write!(f, "{unit_type} units do not support dimension `{dimension}`"),
            Self::UnsupportedReference {
                unit_type,
                reference,
            } => write!(f, "{unit_type} units do not support reference `{reference}`"),
            Self::UnsupportedKeyword { unit_type, keyword } => write!(
                f,
                "{unit_type} units do not support keyword `{}`",
                keyword.as_str()
            ),
            Self::UnknownKeyword(value) => write!(
                f,
                "unknown keyword `{value}`; expected fill|fit|stretch|auto"
            ),
            Self::NonFiniteValue(field) => write!(f, "{field} must be a finite number"),
            Self::InvalidBounds { min, max } => {
                write!(f, "bounds min ({min}) must be <= max ({max})")
            }
            Self::NegativeMargin => write!(f, "margins must be >= 0"),
            Self::InvalidAspectRatio(value) => {
                write!(f, "aspect ratio is invalid: `{value}`; expected W:H > 0")
            }
            Self::AspectLockUnsupported(dimension) => {
                write!(f, "aspect ratio lock is not supported on `{dimension}`")
            }
            Self::AnchorUnsupported(dimension) => {
                write!(f, "anchors are not supported on `{dimension}`")
            }
        }
    }
}

impl Error for ConfigError {}
