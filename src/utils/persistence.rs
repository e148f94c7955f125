use std::{fs, path::Path};

use crate::{catalog::Catalog, errors::Result, utils::write_atomic};

/// Writes the provided catalog to disk atomically by staging to a temporary file.
pub fn save_catalog_to_file(catalog: &Catalog, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(catalog)?;
    write_atomic(path, &json)?;
    Ok(())
}

/// Loads a catalog snapshot from disk, returning structured errors on failure.
pub fn load_catalog_from_file(path: &Path) -> Result<Catalog> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}
