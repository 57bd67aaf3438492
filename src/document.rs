use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::element::Element;
use crate::layer::{
    builtin_layers, Layer, LayerId, FALLBACK_FILL, FALLBACK_FILL_ALPHA, FALLBACK_OUTLINE,
    FALLBACK_OUTLINE_ALPHA,
};

/// Global pixels-to-real-world conversion: `pixels` px correspond to
/// `meters` m. The default matches the drafting grid, 20 px per meter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    pub pixels: f32,
    pub meters: f32,
}

impl Scale {
    pub fn pixels_per_meter(&self) -> f32 {
        self.pixels / self.meters
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self {
            pixels: 20.0,
            meters: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSettings {
    /// Grid cell size in pixels, always positive
    pub size: u32,
    /// Whether the grid overlay is drawn
    pub enabled: bool,
    /// Whether recorded points snap to grid intersections
    pub snap_enabled: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            size: 20,
            enabled: true,
            snap_enabled: true,
        }
    }
}

/// Fully-resolved style for one element: the element's own override when
/// present, else its layer's default, else the fallbacks for an unresolved
/// layer key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedStyle {
    pub outline_color: Color32,
    pub fill_color: Color32,
    pub outline_alpha: f32,
    pub fill_alpha: f32,
}

/// The in-memory design document: the ordered element collection, the layer
/// table, the grid settings and the global scale.
///
/// Elements reference layers by key only; the document owns both sides.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub name: String,
    pub last_modified: DateTime<Utc>,
    pub grid: GridSettings,
    pub scale: Scale,
    elements: Vec<Element>,
    layers: BTreeMap<LayerId, Layer>,
}

impl Document {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            last_modified: Utc::now(),
            grid: GridSettings::default(),
            scale: Scale::default(),
            elements: Vec::new(),
            layers: builtin_layers(),
        }
    }

    /// Rebuild a document from loaded parts. Used by snapshot loading only;
    /// interactive edits go through `add_element`.
    pub(crate) fn from_parts(
        name: String,
        last_modified: DateTime<Utc>,
        grid: GridSettings,
        scale: Scale,
        elements: Vec<Element>,
        layers: BTreeMap<LayerId, Layer>,
    ) -> Self {
        Self {
            name,
            last_modified,
            grid,
            scale,
            elements,
            layers,
        }
    }

    /// Stamps the element's outline/fill color and alpha from its layer (an
    /// explicit override wins) and appends it to the collection.
    ///
    /// The style is captured at insertion time: editing the layer's defaults
    /// later does not recolor elements already placed.
    pub fn add_element(&mut self, mut element: Element) {
        let style = self.resolved_style(&element);
        element.outline_color = Some(style.outline_color);
        element.fill_color = Some(style.fill_color);
        element.outline_alpha = Some(style.outline_alpha);
        element.fill_alpha = Some(style.fill_alpha);
        self.elements.push(element);
        self.touch();
    }

    /// Removes and returns the most recently added element.
    pub fn remove_last_element(&mut self) -> Option<Element> {
        let removed = self.elements.pop();
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    /// Elements in insertion order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    pub fn element_mut(&mut self, index: usize) -> Option<&mut Element> {
        self.elements.get_mut(index)
    }

    /// Elements sorted bottom-to-top by their layer's fixed z rank.
    ///
    /// The sort is stable: within a layer, insertion order is preserved, so
    /// later-drawn elements still paint above earlier ones. Elements whose
    /// layer key does not resolve sort above everything.
    pub fn elements_in_z_order(&self) -> Vec<&Element> {
        let mut ordered: Vec<&Element> = self.elements.iter().collect();
        ordered.sort_by_key(|e| self.layer_z_index(&e.layer));
        ordered
    }

    fn layer_z_index(&self, id: &LayerId) -> u32 {
        self.layers.get(id).map(|l| l.z_index).unwrap_or(u32::MAX)
    }

    pub fn layers(&self) -> &BTreeMap<LayerId, Layer> {
        &self.layers
    }

    pub fn layer(&self, id: &LayerId) -> Option<&Layer> {
        self.layers.get(id)
    }

    pub fn set_layer_visible(&mut self, id: &LayerId, visible: bool) {
        if let Some(layer) = self.layers.get_mut(id) {
            layer.visible = visible;
        }
    }

    pub fn set_layer_opacity(&mut self, id: &LayerId, opacity: f32) {
        if let Some(layer) = self.layers.get_mut(id) {
            layer.opacity = opacity.clamp(0.0, 1.0);
        }
    }

    /// Updates a layer's default colors for elements stamped from now on.
    pub fn set_layer_default_colors(&mut self, id: &LayerId, outline: Color32, fill: Color32) {
        if let Some(layer) = self.layers.get_mut(id) {
            layer.outline_color = outline;
            layer.fill_color = fill;
        }
    }

    pub fn set_layer_default_alphas(&mut self, id: &LayerId, outline: f32, fill: f32) {
        if let Some(layer) = self.layers.get_mut(id) {
            layer.outline_alpha = outline.clamp(0.0, 1.0);
            layer.fill_alpha = fill.clamp(0.0, 1.0);
        }
    }

    /// The style this element draws with right now: its own overrides where
    /// present, its layer's defaults otherwise.
    pub fn resolved_style(&self, element: &Element) -> ResolvedStyle {
        let layer = self.layers.get(&element.layer);
        ResolvedStyle {
            outline_color: element
                .outline_color
                .or(layer.map(|l| l.outline_color))
                .unwrap_or(FALLBACK_OUTLINE),
            fill_color: element
                .fill_color
                .or(layer.map(|l| l.fill_color))
                .unwrap_or(FALLBACK_FILL),
            outline_alpha: element
                .outline_alpha
                .or(layer.map(|l| l.outline_alpha))
                .unwrap_or(FALLBACK_OUTLINE_ALPHA),
            fill_alpha: element
                .fill_alpha
                .or(layer.map(|l| l.fill_alpha))
                .unwrap_or(FALLBACK_FILL_ALPHA),
        }
    }

    /// Refreshes the last-modified timestamp.
    pub fn touch(&mut self) {
        self.last_modified = Utc::now();
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("Untitled Project")
    }
}
