use caja_core::{
    catalog::{Catalog, CatalogKind},
    category::CategoryNode,
    storage::JsonStorage,
    utils::persistence,
};
use chrono::Utc;
use tempfile::TempDir;

fn sample_catalog() -> Catalog {
    let mut catalog = Catalog::new("Consultorio Centro", CatalogKind::Income);
    catalog.add_category(CategoryNode::new("1".parse().unwrap(), "Honorarios"));
    catalog.add_category(CategoryNode::new("1.1".parse().unwrap(), "Dr. Perez"));
    catalog
        .record_transaction(&"1.1".parse().unwrap(), 100.0, Utc::now())
        .unwrap();
    catalog
}

fn storage(dir: &TempDir) -> JsonStorage {
    JsonStorage::new(Some(dir.path().to_path_buf()), None).unwrap()
}

#[test]
fn save_load_round_trip_preserves_the_catalog() {
    let dir = TempDir::new().unwrap();
    let storage = storage(&dir);
    let catalog = sample_catalog();

    storage.save(&catalog, "consultorio").unwrap();
    let loaded = storage.load("consultorio").unwrap();

    assert_eq!(loaded.id, catalog.id);
    assert_eq!(loaded.categories, catalog.categories);
    assert_eq!(loaded.transactions.len(), 1);
    assert_eq!(loaded.schema_version, catalog.schema_version);
}

#[test]
fn saving_records_the_last_catalog() {
    let dir = TempDir::new().unwrap();
    let storage = storage(&dir);

    assert_eq!(storage.last_catalog().unwrap(), None);
    storage.save(&sample_catalog(), "Consultorio Centro").unwrap();
    assert_eq!(
        storage.last_catalog().unwrap().as_deref(),
        Some("consultorio_centro")
    );
    assert_eq!(storage.list_catalogs().unwrap(), ["consultorio_centro"]);
}

#[test]
fn backup_and_restore_round_trip() {
    let dir = TempDir::new().unwrap();
    let storage = storage(&dir);
    let catalog = sample_catalog();

    storage.backup(&catalog, "consultorio", Some("before sync")).unwrap();
    let backups = storage.list_backups("consultorio").unwrap();
    assert_eq!(backups.len(), 1);

    let restored = storage.restore("consultorio", &backups[0]).unwrap();
    assert_eq!(restored.id, catalog.id);
}

#[test]
fn retention_caps_the_backup_count() {
    let dir = TempDir::new().unwrap();
    let storage = JsonStorage::new(Some(dir.path().to_path_buf()), Some(2)).unwrap();
    let catalog = sample_catalog();

    for note in ["a", "b", "c"] {
        storage.backup(&catalog, "consultorio", Some(note)).unwrap();
        // Backups are stamped to the second; spread them out.
        std::thread::sleep(std::time::Duration::from_millis(1100));
    }
    assert_eq!(storage.list_backups("consultorio").unwrap().len(), 2);
}

#[test]
fn missing_catalog_is_a_structured_error() {
    let dir = TempDir::new().unwrap();
    let storage = storage(&dir);
    assert!(storage.load("nope").is_err());
}

#[test]
fn ad_hoc_path_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("snapshot.json");
    let catalog = sample_catalog();

    persistence::save_catalog_to_file(&catalog, &path).unwrap();
    let loaded = persistence::load_catalog_from_file(&path).unwrap();
    assert_eq!(loaded.name, catalog.name);
}

#[test]
fn wire_shape_matches_the_original_api() {
    let catalog = sample_catalog();
    let json = serde_json::to_value(&catalog).unwrap();

    let node = &json["categories"][1];
    assert_eq!(node["codigo"], "1.1");
    assert_eq!(node["nombre"], "Dr. Perez");
    assert_eq!(node["nivel"], 2);
    assert_eq!(node["categoriaPadre"], "1");
    assert_eq!(node["esLista"], false);
    assert_eq!(node["activo"], true);

    let txn = &json["transactions"][0];
    assert_eq!(txn["importe"], 100.0);
    assert_eq!(txn["categoria"]["codigo"], "1.1");
    assert_eq!(txn["categoria"]["rutaCategoria"][0]["nombre"], "Honorarios");
    assert!(txn["fecha"].is_string());
}
