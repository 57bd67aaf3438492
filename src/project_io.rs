use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::document::{Document, GridSettings, Scale};
use crate::element::Element;
use crate::layer::{builtin_layers, Layer, LayerId};

/// Errors that can occur while saving or loading a project snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read project file: {0}")]
    Read(#[from] std::io::Error),

    #[error("invalid project file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The on-disk document snapshot.
///
/// Loading is deliberately lenient: everything except the element list can
/// be absent, and an unusable `scale` degrades to the previous one instead
/// of failing the whole load.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snapshot {
    #[serde(default = "default_name")]
    name: String,
    #[serde(default = "Utc::now")]
    last_modified: DateTime<Utc>,
    #[serde(default)]
    grid_settings: GridSettings,
    #[serde(default, deserialize_with = "lenient_scale")]
    scale: Option<Scale>,
    #[serde(default)]
    elements: Vec<Element>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    layers: Option<BTreeMap<LayerId, Layer>>,
}

fn default_name() -> String {
    "Untitled Project".to_string()
}

/// Accepts a missing, malformed, or non-positive scale without failing the
/// surrounding document.
fn lenient_scale<'de, D>(deserializer: D) -> Result<Option<Scale>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let scale: Option<Scale> = serde_json::from_value(value).ok();
    Ok(scale.filter(|s| s.pixels > 0.0 && s.meters > 0.0))
}

impl Snapshot {
    fn from_document(document: &Document) -> Self {
        Self {
            name: document.name.clone(),
            last_modified: document.last_modified,
            grid_settings: document.grid,
            scale: Some(document.scale),
            elements: document.elements().to_vec(),
            layers: Some(document.layers().clone()),
        }
    }

    /// Builds the replacement document, falling back to `current`'s scale
    /// and the built-in layer set where the snapshot is silent.
    fn into_document(self, current: &Document) -> Document {
        Document::from_parts(
            self.name,
            self.last_modified,
            self.grid_settings,
            self.scale.unwrap_or(current.scale),
            self.elements,
            self.layers.unwrap_or_else(builtin_layers),
        )
    }
}

/// Writes the document as pretty-printed JSON, refreshing its
/// last-modified timestamp first.
pub fn save(document: &mut Document, path: &Path) -> Result<(), SnapshotError> {
    document.touch();
    let snapshot = Snapshot::from_document(document);
    let json = serde_json::to_string_pretty(&snapshot)?;
    fs::write(path, json)?;
    log::info!("saved project {:?} to {}", document.name, path.display());
    Ok(())
}

/// Parses a snapshot into a complete replacement document.
///
/// Nothing is mutated here: on any error the caller keeps its current
/// document, and on success it swaps the returned one in wholesale.
pub fn load(path: &Path, current: &Document) -> Result<Document, SnapshotError> {
    let json = fs::read_to_string(path)?;
    let snapshot: Snapshot = serde_json::from_str(&json)?;
    let document = snapshot.into_document(current);
    log::info!(
        "loaded project {:?} ({} elements) from {}",
        document.name,
        document.elements().len(),
        path.display()
    );
    Ok(document)
}
