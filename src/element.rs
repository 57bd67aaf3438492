use egui::{Color32, Pos2, Rect};
use serde::{Deserialize, Serialize};

use crate::document::Scale;
use crate::geometry;
use crate::layer::LayerId;

/// Geometry of a drawable element, discriminated by a `type` tag in the
/// snapshot format.
///
/// Adding a shape kind here is a single-point change: `area`, `hit_test` and
/// the renderer all match exhaustively over this enum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    /// Top-left corner plus non-negative extents, in pixel space
    Rectangle {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    /// Center plus non-negative radius
    Circle { x: f32, y: f32, radius: f32 },
    /// At least three vertices, implicitly closed
    Polygon { points: Vec<Pos2> },
    /// At least two vertices, open
    Path { points: Vec<Pos2> },
    Line { x1: f32, y1: f32, x2: f32, y2: f32 },
}

impl Shape {
    /// The snapshot `type` tag for this shape.
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Rectangle { .. } => "rectangle",
            Shape::Circle { .. } => "circle",
            Shape::Polygon { .. } => "polygon",
            Shape::Path { .. } => "path",
            Shape::Line { .. } => "line",
        }
    }

    pub fn area(&self, scale: &Scale) -> Option<f32> {
        geometry::area(self, scale)
    }

    pub fn hit_test(&self, p: Pos2) -> bool {
        geometry::hit_test(self, p)
    }

    pub fn bounding_rect(&self) -> Rect {
        geometry::bounding_rect(self)
    }
}

/// One drawable unit on the canvas.
///
/// The style fields override the layer defaults when set; `Document::add_element`
/// stamps them from the layer at insertion time, so a stored element never
/// changes color when its layer's defaults are edited later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(flatten)]
    pub shape: Shape,
    /// Key into the owning document's layer table, never an owning pointer
    pub layer: LayerId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(
        rename = "outlineColor",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub outline_color: Option<Color32>,
    #[serde(rename = "fillColor", default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<Color32>,
    #[serde(
        rename = "outlineAlpha",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub outline_alpha: Option<f32>,
    #[serde(rename = "fillAlpha", default, skip_serializing_if = "Option::is_none")]
    pub fill_alpha: Option<f32>,
}

impl Element {
    /// A new element with no label and no style overrides; the style is
    /// resolved from the layer when the element is added to a document.
    pub fn new(shape: Shape, layer: LayerId) -> Self {
        Self {
            shape,
            layer,
            label: None,
            outline_color: None,
            fill_color: None,
            outline_alpha: None,
            fill_alpha: None,
        }
    }

    pub fn area(&self, scale: &Scale) -> Option<f32> {
        self.shape.area(scale)
    }

    pub fn hit_test(&self, p: Pos2) -> bool {
        self.shape.hit_test(p)
    }

    pub fn bounding_rect(&self) -> Rect {
        self.shape.bounding_rect()
    }
}
