//! File-backed catalog storage: managed directory layout, atomic staged
//! writes, timestamped backups with retention, and a state file remembering
//! the last opened catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::catalog::Catalog;
use crate::errors::CoreError;
use crate::utils::{app_data_dir, ensure_dir, write_atomic};

use super::Result;

const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const CATALOG_DIR: &str = "catalogs";
const BACKUP_DIR: &str = "backups";
const STATE_FILE: &str = "state.json";
const DEFAULT_RETENTION: usize = 5;

#[derive(Clone)]
pub struct JsonStorage {
    catalogs_dir: PathBuf,
    backups_dir: PathBuf,
    state_file: PathBuf,
    retention: usize,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreState {
    last_catalog: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct BackupFile {
    created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    note: Option<String>,
    catalog: Catalog,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let app_root = root.unwrap_or_else(app_data_dir);
        ensure_dir(&app_root)?;
        let catalogs_dir = app_root.join(CATALOG_DIR);
        let backups_dir = app_root.join(BACKUP_DIR);
        ensure_dir(&catalogs_dir)?;
        ensure_dir(&backups_dir)?;
        Ok(Self {
            catalogs_dir,
            backups_dir,
            state_file: app_root.join(STATE_FILE),
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None, None)
    }

    pub fn catalog_path(&self, name: &str) -> PathBuf {
        self.catalogs_dir
            .join(format!("{}.json", canonical_name(name)))
    }

    pub fn save(&self, catalog: &Catalog, name: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(catalog)?;
        write_atomic(&self.catalog_path(name), &json)?;
        self.record_last_catalog(Some(name))?;
        Ok(())
    }

    pub fn load(&self, name: &str) -> Result<Catalog> {
        let path = self.catalog_path(name);
        if !path.exists() {
            return Err(CoreError::NotFound(name.to_string()));
        }
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn list_catalogs(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.catalogs_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn backup(&self, catalog: &Catalog, name: &str, note: Option<&str>) -> Result<()> {
        let dir = self.backups_dir.join(canonical_name(name));
        ensure_dir(&dir)?;
        let created_at = Utc::now();
        let file = dir.join(format!(
            "{}.json",
            created_at.format(BACKUP_TIMESTAMP_FORMAT)
        ));
        let payload = BackupFile {
            created_at,
            note: note.map(str::to_string),
            catalog: catalog.clone(),
        };
        write_atomic(&file, &serde_json::to_string_pretty(&payload)?)?;
        self.prune_backups(&dir)?;
        Ok(())
    }

    pub fn list_backups(&self, name: &str) -> Result<Vec<String>> {
        let dir = self.backups_dir.join(canonical_name(name));
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut stamps = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                stamps.push(stem.to_string());
            }
        }
        stamps.sort();
        stamps.reverse();
        Ok(stamps)
    }

    pub fn restore(&self, name: &str, backup_name: &str) -> Result<Catalog> {
        let file = self
            .backups_dir
            .join(canonical_name(name))
            .join(format!("{backup_name}.json"));
        if !file.exists() {
            return Err(CoreError::NotFound(backup_name.to_string()));
        }
        let data = fs::read_to_string(file)?;
        let payload: BackupFile = serde_json::from_str(&data)?;
        Ok(payload.catalog)
    }

    pub fn last_catalog(&self) -> Result<Option<String>> {
        Ok(self.read_state()?.last_catalog)
    }

    pub fn record_last_catalog(&self, name: Option<&str>) -> Result<()> {
        let mut state = self.read_state()?;
        state.last_catalog = name.map(canonical_name);
        write_atomic(&self.state_file, &serde_json::to_string_pretty(&state)?)?;
        Ok(())
    }

    fn read_state(&self) -> Result<StoreState> {
        if self.state_file.exists() {
            let data = fs::read_to_string(&self.state_file)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(StoreState::default())
        }
    }

    fn prune_backups(&self, dir: &Path) -> Result<()> {
        let mut files: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("json"))
            .collect();
        files.sort();
        while files.len() > self.retention {
            let oldest = files.remove(0);
            fs::remove_file(&oldest)?;
        }
        Ok(())
    }
}

fn canonical_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

