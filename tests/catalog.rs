mod common;

use std::fs;

use common::{TestWorkspace, set_age};
use lead_inspector::{
    catalog::{self, DatasetSource},
    config::CatalogRoots,
};

const SEED: &str = "CREATE TABLE leads (name TEXT); INSERT INTO leads VALUES ('Ada');";

#[test]
fn list_discovers_both_roots_newest_first() {
    let workspace = TestWorkspace::new();
    let old_csv = workspace.write_csv("old.csv", "name\nAda");
    let new_db = workspace.write_database("acme", SEED);
    let mid_csv = workspace.write_csv("mid.csv", "name\nGrace");
    set_age(&old_csv, 3_000);
    set_age(&mid_csv, 2_000);
    set_age(&new_db, 1_000);

    let listed = catalog::list(&workspace.roots());
    let names: Vec<&str> = listed.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["leads/acme/table.db", "lead-list/mid.csv", "lead-list/old.csv"]
    );

    let db = &listed[0];
    assert_eq!(db.display_name, "acme (SQLite)");
    assert_eq!(db.source, DatasetSource::SqliteTable);
    assert_eq!(db.path, new_db);

    let csv = &listed[1];
    assert_eq!(csv.display_name, "mid.csv");
    assert_eq!(csv.source, DatasetSource::CsvFile);
    assert!(csv.size_label.ends_with(" KB"));
}

#[test]
fn list_ignores_non_csv_files_and_folders_without_database() {
    let workspace = TestWorkspace::new();
    workspace.write_csv("notes.txt", "ignore me");
    workspace.write_csv("keep.csv", "name\nAda");
    workspace.write("leads/empty-folder/readme.md", "no database here");
    workspace.write("leads/stray-file.db", "not inside a folder");

    let listed = catalog::list(&workspace.roots());
    let names: Vec<&str> = listed.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["lead-list/keep.csv"]);
}

#[test]
fn list_tolerates_missing_csv_root() {
    let workspace = TestWorkspace::bare();
    let roots = workspace.roots();
    fs::create_dir_all(&roots.sqlite_root).expect("sqlite root");
    let older = workspace.write_database("older", SEED);
    let newer = workspace.write_database("newer", SEED);
    set_age(&older, 500);
    set_age(&newer, 10);

    let listed = catalog::list(&roots);
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|d| d.source == DatasetSource::SqliteTable));
    assert_eq!(listed[0].name, "leads/newer/table.db");
    assert_eq!(listed[1].name, "leads/older/table.db");
}

#[test]
fn list_with_no_roots_is_empty() {
    let workspace = TestWorkspace::bare();
    let roots = CatalogRoots::under(&workspace.path().join("nowhere"));
    assert!(catalog::list(&roots).is_empty());
}

#[test]
fn descriptors_serialize_with_boundary_field_names() {
    let workspace = TestWorkspace::new();
    workspace.write_csv("batch.csv", "name\nAda");
    let listed = catalog::list(&workspace.roots());
    let json = serde_json::to_value(&listed[0]).expect("serialize");
    assert_eq!(json["name"], "lead-list/batch.csv");
    assert_eq!(json["displayName"], "batch.csv");
    assert_eq!(json["source"], "lead-list");
    assert!(json.get("sizeLabel").is_some());
    assert!(json.get("modifiedAt").is_some());
    assert!(json.get("path").is_none());
}
