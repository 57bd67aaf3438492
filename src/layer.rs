use std::collections::BTreeMap;
use std::fmt;

use egui::Color32;
use serde::{Deserialize, Serialize};

/// Stable key referring to a layer in the document's layer table.
///
/// Elements store this key instead of a direct link to the layer, so the
/// document serializes without reference cycles and layers can be restored
/// independently of elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(String);

impl LayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for LayerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A named visibility/style grouping of elements.
///
/// Layers are created at document initialization or restored from a loaded
/// snapshot; they are never deleted within a session. `z_index` is the fixed
/// draw order, independent of element insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    /// Display name shown in the layer panel
    pub name: String,
    /// Fixed draw order, lower values draw first
    pub z_index: u32,
    pub visible: bool,
    /// Whole-layer opacity in [0, 1], multiplied into element alphas
    pub opacity: f32,
    /// Default outline color for elements stamped onto this layer
    pub outline_color: Color32,
    /// Default fill color for elements stamped onto this layer
    pub fill_color: Color32,
    pub outline_alpha: f32,
    pub fill_alpha: f32,
}

impl Layer {
    pub fn new(name: &str, z_index: u32, outline_color: Color32, fill_color: Color32) -> Self {
        Self {
            name: name.to_string(),
            z_index,
            visible: true,
            opacity: 1.0,
            outline_color,
            fill_color,
            outline_alpha: 1.0,
            fill_alpha: 0.35,
        }
    }
}

/// Outline color used for elements whose layer key no longer resolves.
pub const FALLBACK_OUTLINE: Color32 = Color32::BLACK;
/// Fill color used for elements whose layer key no longer resolves.
pub const FALLBACK_FILL: Color32 = Color32::GRAY;
pub const FALLBACK_OUTLINE_ALPHA: f32 = 1.0;
pub const FALLBACK_FILL_ALPHA: f32 = 0.35;

/// The built-in layer set for a fresh document, bottom to top:
/// ground, hardscape, planting, water, structures.
pub fn builtin_layers() -> BTreeMap<LayerId, Layer> {
    let mut layers = BTreeMap::new();
    layers.insert(
        LayerId::new("ground"),
        Layer::new(
            "Ground",
            0,
            Color32::from_rgb(0x6b, 0x8e, 0x23),
            Color32::from_rgb(0xb5, 0xd1, 0x8a),
        ),
    );
    layers.insert(
        LayerId::new("hardscape"),
        Layer::new(
            "Hardscape",
            1,
            Color32::from_rgb(0x69, 0x69, 0x69),
            Color32::from_rgb(0xc0, 0xc0, 0xc0),
        ),
    );
    layers.insert(
        LayerId::new("planting"),
        Layer::new(
            "Planting",
            2,
            Color32::from_rgb(0x22, 0x6b, 0x22),
            Color32::from_rgb(0x66, 0xbb, 0x66),
        ),
    );
    layers.insert(
        LayerId::new("water"),
        Layer::new(
            "Water",
            3,
            Color32::from_rgb(0x1e, 0x5a, 0xa8),
            Color32::from_rgb(0x7e, 0xb6, 0xe8),
        ),
    );
    layers.insert(
        LayerId::new("structures"),
        Layer::new(
            "Structures",
            4,
            Color32::from_rgb(0x6b, 0x4a, 0x2b),
            Color32::from_rgb(0xc9, 0xa8, 0x7c),
        ),
    );
    layers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_set_has_fixed_distinct_draw_order() {
        let layers = builtin_layers();
        assert_eq!(layers.len(), 5);
        assert_eq!(layers[&LayerId::new("ground")].z_index, 0);
        assert_eq!(layers[&LayerId::new("structures")].z_index, 4);

        let mut ranks: Vec<u32> = layers.values().map(|l| l.z_index).collect();
        ranks.sort_unstable();
        ranks.dedup();
        assert_eq!(ranks.len(), layers.len());
    }

    #[test]
    fn new_layers_start_visible_and_opaque() {
        let layer = Layer::new("Test", 9, Color32::BLACK, Color32::GRAY);
        assert!(layer.visible);
        assert_eq!(layer.opacity, 1.0);
    }
}
