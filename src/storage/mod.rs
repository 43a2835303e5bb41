//! Local persistence for the dashboard data set, plus an in-process
//! transport that serves it through the REST envelope protocol.

pub mod local;

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Client, Issue, Project};
use crate::errors::StoreError;

pub use local::LocalTransport;

const TMP_SUFFIX: &str = "tmp";

pub type Result<T> = std::result::Result<T, StoreError>;

/// Every record the dashboard knows about.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub issues: Vec<Issue>,
}

impl Workspace {
    pub fn client(&self, id: uuid::Uuid) -> Option<&Client> {
        self.clients.iter().find(|client| client.id == id)
    }

    pub fn project(&self, id: uuid::Uuid) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == id)
    }
}

/// Single-file JSON store with atomic replace-on-save.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the workspace; a missing file is an empty workspace.
    pub fn load(&self) -> Result<Workspace> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "data file missing, starting empty");
            return Ok(Workspace::default());
        }
        let data = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save(&self, workspace: &Workspace) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(workspace)?;
        let tmp = tmp_path(&self.path);
        write_file(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &str) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_empty_workspace() {
        let dir = tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("data.json"));
        assert_eq!(store.load().unwrap(), Workspace::default());
    }

    #[test]
    fn save_replaces_file_without_leaving_temp() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("data.json");
        let store = JsonStore::new(&path);
        let mut workspace = Workspace::default();
        workspace
            .clients
            .push(Client::new("Acme", "Jo Smith", "jo@acme.test"));

        store.save(&workspace).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
        assert_eq!(store.load().unwrap(), workspace);
    }
}
