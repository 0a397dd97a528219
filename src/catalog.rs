//! Dataset discovery across the CSV and SQLite roots.
//!
//! Every call rescans the filesystem. A root that is missing or unreadable
//! contributes nothing; so does any single entry whose metadata cannot be
//! read. Neither aborts the listing.

use std::{
    fmt,
    fs::{self, DirEntry},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;

use crate::{
    config::{CSV_ROOT_DIR, CatalogRoots, SQLITE_ROOT_DIR},
    sqlite_codec::DATABASE_FILE_NAME,
    table::format_tenths,
};

pub const CSV_EXTENSION: &str = ".csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DatasetSource {
    #[serde(rename = "lead-list")]
    CsvFile,
    #[serde(rename = "leads")]
    SqliteTable,
}

impl DatasetSource {
    pub fn kind(self) -> &'static str {
        match self {
            DatasetSource::CsvFile => "csv-file",
            DatasetSource::SqliteTable => "sqlite-table",
        }
    }

    /// Prefix of the logical names drawn from this source.
    pub fn prefix(self) -> &'static str {
        match self {
            DatasetSource::CsvFile => CSV_ROOT_DIR,
            DatasetSource::SqliteTable => SQLITE_ROOT_DIR,
        }
    }
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetDescriptor {
    /// Source-prefixed relative path; unique across both roots.
    pub name: String,
    pub display_name: String,
    pub size_bytes: u64,
    pub size_label: String,
    pub modified_at: DateTime<Utc>,
    pub source: DatasetSource,
    #[serde(skip)]
    pub path: PathBuf,
}

pub fn list(roots: &CatalogRoots) -> Vec<DatasetDescriptor> {
    let mut found = Vec::new();
    scan_csv_root(&roots.csv_root, &mut found);
    scan_sqlite_root(&roots.sqlite_root, &mut found);
    found.sort_by(|a, b| {
        b.modified_at
            .cmp(&a.modified_at)
            .then_with(|| a.name.cmp(&b.name))
    });
    debug!("Catalog listed {} dataset(s)", found.len());
    found
}

pub fn size_label(bytes: u64) -> String {
    format!("{} KB", format_tenths(bytes as f64 / 1024.0))
}

fn scan_csv_root(root: &Path, found: &mut Vec<DatasetDescriptor>) {
    for entry in read_root(root) {
        let Some(file_name) = entry_name(&entry) else {
            continue;
        };
        if !file_name.ends_with(CSV_EXTENSION) {
            continue;
        }
        let path = entry.path();
        if let Some(descriptor) = describe(
            &path,
            format!("{CSV_ROOT_DIR}/{file_name}"),
            file_name,
            DatasetSource::CsvFile,
        ) {
            found.push(descriptor);
        }
    }
}

fn scan_sqlite_root(root: &Path, found: &mut Vec<DatasetDescriptor>) {
    for entry in read_root(root) {
        let Some(dir_name) = entry_name(&entry) else {
            continue;
        };
        let db_path = entry.path().join(DATABASE_FILE_NAME);
        if !db_path.is_file() {
            continue;
        }
        if let Some(descriptor) = describe(
            &db_path,
            format!("{SQLITE_ROOT_DIR}/{dir_name}/{DATABASE_FILE_NAME}"),
            format!("{dir_name} (SQLite)"),
            DatasetSource::SqliteTable,
        ) {
            found.push(descriptor);
        }
    }
}

fn read_root(root: &Path) -> Vec<DirEntry> {
    match fs::read_dir(root) {
        Ok(entries) => entries
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    warn!("Skipping unreadable entry in {:?}: {err}", root);
                    None
                }
            })
            .collect(),
        Err(err) => {
            info!("No datasets from {:?}: {err}", root);
            Vec::new()
        }
    }
}

fn entry_name(entry: &DirEntry) -> Option<String> {
    let name = entry.file_name();
    match name.to_str() {
        Some(name) => Some(name.to_string()),
        None => {
            warn!("Skipping non UTF-8 entry {:?}", entry.path());
            None
        }
    }
}

fn describe(
    path: &Path,
    name: String,
    display_name: String,
    source: DatasetSource,
) -> Option<DatasetDescriptor> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => metadata,
        Ok(_) => return None,
        Err(err) => {
            warn!("Skipping {:?}: {err}", path);
            return None;
        }
    };
    let modified_at = match metadata.modified() {
        Ok(time) => DateTime::<Utc>::from(time),
        Err(err) => {
            warn!("Skipping {:?}: no modification time ({err})", path);
            return None;
        }
    };
    Some(DatasetDescriptor {
        name,
        display_name,
        size_bytes: metadata.len(),
        size_label: size_label(metadata.len()),
        modified_at,
        source,
        path: path.to_path_buf(),
    })
}
