use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors from the flat-file plant catalog and project register.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read data file: {0}")]
    Read(std::io::Error),

    #[error("failed to write data file: {0}")]
    Write(std::io::Error),

    #[error("malformed data file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One plant species available for placement, from the catalog file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    pub id: String,
    pub name: String,
    pub category: String,
    /// Mature spread in meters, for sizing planting circles
    pub spread_m: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct PlantsFile {
    plants: Vec<Plant>,
}

/// Reads the plant catalog from its JSON file (`{ "plants": [...] }`).
pub fn load_plants(path: &Path) -> Result<Vec<Plant>, CatalogError> {
    let json = fs::read_to_string(path).map_err(CatalogError::Read)?;
    let file: PlantsFile = serde_json::from_str(&json)?;
    Ok(file.plants)
}

/// One saved-project record in the register.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ProjectsFile {
    projects: Vec<ProjectRecord>,
}

/// Append-only register of saved projects backed by a single JSON file
/// (`{ "projects": [...] }`). Each appended record is stamped with a
/// generated id and creation timestamp.
#[derive(Debug, Clone)]
pub struct ProjectRegister {
    path: PathBuf,
}

impl ProjectRegister {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn list(&self) -> Result<Vec<ProjectRecord>, CatalogError> {
        Ok(self.read_file()?.projects)
    }

    pub fn append(&self, name: &str) -> Result<ProjectRecord, CatalogError> {
        let mut file = self.read_file()?;
        let record = ProjectRecord {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        file.projects.push(record.clone());
        let json = serde_json::to_string_pretty(&file)?;
        fs::write(&self.path, json).map_err(CatalogError::Write)?;
        log::info!("registered project {:?} as {}", name, record.id);
        Ok(record)
    }

    fn read_file(&self) -> Result<ProjectsFile, CatalogError> {
        // A register that does not exist yet is just empty.
        if !self.path.exists() {
            return Ok(ProjectsFile::default());
        }
        let json = fs::read_to_string(&self.path).map_err(CatalogError::Read)?;
        Ok(serde_json::from_str(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plants_file_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plants.json");
        fs::write(
            &path,
            r#"{"plants":[{"id":"acer-p","name":"Japanese Maple","category":"tree","spreadM":4.5}]}"#,
        )
        .unwrap();

        let plants = load_plants(&path).unwrap();
        assert_eq!(plants.len(), 1);
        assert_eq!(plants[0].name, "Japanese Maple");
        assert_eq!(plants[0].spread_m, 4.5);
    }

    #[test]
    fn missing_plants_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_plants(&dir.path().join("nope.json")).is_err());
    }

    #[test]
    fn register_appends_with_generated_id_and_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let register = ProjectRegister::new(dir.path().join("projects.json"));

        assert!(register.list().unwrap().is_empty());

        let first = register.append("Front Yard").unwrap();
        let second = register.append("Back Garden").unwrap();
        assert_ne!(first.id, second.id);

        let listed = register.list().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].name, "Front Yard");
        assert_eq!(listed[1].name, "Back Garden");
    }

    #[test]
    fn malformed_register_surfaces_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects.json");
        fs::write(&path, "{ not json").unwrap();
        let register = ProjectRegister::new(path);
        assert!(matches!(register.list(), Err(CatalogError::Parse(_))));
    }
}
