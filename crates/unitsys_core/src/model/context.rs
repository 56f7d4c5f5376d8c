//! Calculation context supplied per resolution.
//!
//! # Invariants
//! - The engine never mutates a `UnitContext`.
//! - Frames are plain extents; origins are always `0`.

use crate::model::unit::AspectRatio;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reference frame a measurement can be relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frame {
    Parent,
    Scene,
    Viewport,
}

impl Frame {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Parent => "parent",
            Self::Scene => "scene",
            Self::Viewport => "viewport",
        }
    }
}

/// Axis of a two-dimensional frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Width/height extent of a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxSize {
    pub width: f64,
    pub height: f64,
}

impl BoxSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }
}

/// Viewport extent plus device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportBox {
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_pixel_ratio")]
    pub pixel_ratio: f64,
}

fn default_pixel_ratio() -> f64 {
    1.0
}

impl ViewportBox {
    pub fn new(width: f64, height: f64, pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    pub fn size(&self) -> BoxSize {
        BoxSize::new(self.width, self.height)
    }
}

impl Default for ViewportBox {
    fn default() -> Self {
        Self::new(0.0, 0.0, default_pixel_ratio())
    }
}

/// Read-only snapshot of the frames one calculation resolves against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitContext {
    pub parent: BoxSize,
    pub scene: BoxSize,
    pub viewport: ViewportBox,
    /// Measured content extent used by `auto` sizes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<BoxSize>,
    /// Aspect-ratio constraint applied to locked size pairs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<AspectRatio>,
    #[serde(default)]
    pub custom: BTreeMap<String, f64>,
}

impl UnitContext {
    pub fn new(parent: BoxSize, scene: BoxSize, viewport: ViewportBox) -> Self {
        Self {
            parent,
            scene,
            viewport,
            content: None,
            aspect_ratio: None,
            custom: BTreeMap::new(),
        }
    }

    /// Context where parent, scene and viewport share one extent.
    pub fn uniform(width: f64, height: f64) -> Self {
        let size = BoxSize::new(width, height);
        Self::new(size, size, ViewportBox::new(width, height, 1.0))
    }

    pub fn with_parent(mut self, width: f64, height: f64) -> Self {
        self.parent = BoxSize::new(width, height);
        self
    }

    pub fn with_content(mut self, width: f64, height: f64) -> Self {
        self.content = Some(BoxSize::new(width, height));
        self
    }

    pub fn with_aspect_ratio(mut self, ratio: AspectRatio) -> Self {
        self.aspect_ratio = Some(ratio);
        self
    }

    pub fn with_custom(mut self, key: impl Into<String>, value: f64) -> Self {
        self.custom.insert(key.into(), value);
        self
    }

    pub fn frame(&self, frame: Frame) -> BoxSize {
        match frame {
            Frame::Parent => self.parent,
            Frame::Scene => self.scene,
            Frame::Viewport => self.viewport.size(),
        }
    }

    pub fn custom(&self, key: &str) -> Option<f64> {
        self.custom.get(key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::{Axis, Frame, UnitContext};

    #[test]
    fn frame_lookup_uses_matching_box() {
        let context = UnitContext::uniform(1920.0, 1080.0).with_parent(800.0, 600.0);
        assert_eq!(context.frame(Frame::Parent).extent(Axis::Horizontal), 800.0);
        assert_eq!(context.frame(Frame::Scene).extent(Axis::Vertical), 1080.0);
        assert_eq!(context.frame(Frame::Viewport).extent(Axis::Horizontal), 1920.0);
    }

    #[test]
    fn viewport_pixel_ratio_defaults_to_one_on_the_wire() {
        let context: UnitContext = serde_json::from_value(serde_json::json!({
            "parent": { "width": 10.0, "height": 20.0 },
            "scene": { "width": 30.0, "height": 40.0 },
            "viewport": { "width": 50.0, "height": 60.0 }
        }))
        .expect("context should deserialize");
        assert_eq!(context.viewport.pixel_ratio, 1.0);
        assert!(context.custom.is_empty());
    }
}
