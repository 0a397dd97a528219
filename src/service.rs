//! Resolves logical dataset names to storage and runs codec operations.
//!
//! Logical names follow two conventions:
//! - `lead-list/<file>.csv` → a CSV file under the CSV root
//! - `leads/<dir>/<file>.db` → a SQLite database under the SQLite root
//!
//! Nothing is cached; each call loads from disk.

use std::path::{Component, Path, PathBuf};

use log::{debug, info};
use serde_json::{Map, Value as JsonValue};

use crate::{
    analysis::{self, SignatureTable, WorkflowSummary},
    catalog::{self, DatasetDescriptor, DatasetSource},
    config::{CSV_ROOT_DIR, CatalogRoots, SQLITE_ROOT_DIR},
    csv_codec,
    dataset::{Dataset, Row},
    error::{DataError, DataResult},
    sqlite_codec,
};

/// A logical name resolved to its storage format and physical path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetRef {
    pub source: DatasetSource,
    pub path: PathBuf,
}

impl DatasetRef {
    /// Returns `None` when `name` follows neither naming convention.
    pub fn resolve(name: &str, roots: &CatalogRoots) -> Option<Self> {
        if let Some(rest) = strip_root(name, CSV_ROOT_DIR)
            && rest.ends_with(catalog::CSV_EXTENSION)
            && is_safe_relative(rest)
        {
            return Some(Self {
                source: DatasetSource::CsvFile,
                path: roots.csv_root.join(rest),
            });
        }
        if let Some(rest) = strip_root(name, SQLITE_ROOT_DIR)
            && rest.ends_with(".db")
            && is_safe_relative(rest)
        {
            return Some(Self {
                source: DatasetSource::SqliteTable,
                path: roots.sqlite_root.join(rest),
            });
        }
        None
    }
}

fn strip_root<'a>(name: &'a str, root: &str) -> Option<&'a str> {
    name.strip_prefix(root)?.strip_prefix('/')
}

// Rejects traversal out of the root as well as absolute or empty segments.
fn is_safe_relative(rest: &str) -> bool {
    !rest.is_empty()
        && rest.split('/').all(|segment| !segment.is_empty())
        && Path::new(rest)
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
}

#[derive(Debug, Clone)]
pub struct DataService {
    roots: CatalogRoots,
    signatures: SignatureTable,
}

impl DataService {
    pub fn new(roots: CatalogRoots) -> Self {
        Self::with_signatures(roots, SignatureTable::builtin().clone())
    }

    pub fn with_signatures(roots: CatalogRoots, signatures: SignatureTable) -> Self {
        Self { roots, signatures }
    }

    pub fn roots(&self) -> &CatalogRoots {
        &self.roots
    }

    pub fn list_datasets(&self) -> Vec<DatasetDescriptor> {
        catalog::list(&self.roots)
    }

    pub fn load(&self, name: &str) -> DataResult<Dataset> {
        let target = DatasetRef::resolve(name, &self.roots)
            .ok_or_else(|| DataError::InvalidReference(name.to_string()))?;
        debug!("Loading '{}' from {:?}", name, target.path);
        match target.source {
            DatasetSource::CsvFile => csv_codec::read_file(&target.path),
            DatasetSource::SqliteTable => sqlite_codec::decode(&target.path),
        }
    }

    /// Replaces the stored contents of `name`. Zero rows is a no-op.
    pub fn save(&self, name: &str, dataset: &Dataset) -> DataResult<()> {
        let target = DatasetRef::resolve(name, &self.roots).ok_or_else(|| {
            DataError::UnsupportedOperation(format!(
                "saving '{name}': only {CSV_ROOT_DIR}/*.csv and {SQLITE_ROOT_DIR}/*/*.db are writable"
            ))
        })?;
        match target.source {
            DatasetSource::CsvFile => csv_codec::write_file(&target.path, dataset)?,
            DatasetSource::SqliteTable => sqlite_codec::encode(&target.path, dataset)?,
        }
        if !dataset.is_empty() {
            info!("Saved {} row(s) to '{}'", dataset.len(), name);
        }
        Ok(())
    }

    pub fn summarize(&self, name: &str) -> DataResult<WorkflowSummary> {
        let dataset = self.load(name)?;
        Ok(analysis::analyze(&dataset, &self.signatures))
    }

    pub fn get_data(&self, name: &str) -> DataResult<Vec<Row>> {
        self.load(name).map(Dataset::into_rows)
    }

    pub fn get_workflow(&self, name: &str) -> DataResult<WorkflowSummary> {
        self.summarize(name)
    }

    pub fn save_records(&self, name: &str, records: Vec<Map<String, JsonValue>>) -> DataResult<()> {
        self.save(name, &Dataset::from_records(records))
    }

    /// Writes any dataset out as a CSV file at `destination`.
    pub fn export(&self, name: &str, destination: &Path) -> DataResult<usize> {
        let dataset = self.load(name)?;
        csv_codec::write_file(destination, &dataset)?;
        info!(
            "Exported {} row(s) from '{}' to {:?}",
            dataset.len(),
            name,
            destination
        );
        Ok(dataset.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roots() -> CatalogRoots {
        CatalogRoots::new("/data/lead-list", "/data/leads")
    }

    #[test]
    fn resolve_maps_csv_names_into_csv_root() {
        let target = DatasetRef::resolve("lead-list/batch.csv", &roots()).expect("csv ref");
        assert_eq!(target.source, DatasetSource::CsvFile);
        assert_eq!(target.path, PathBuf::from("/data/lead-list/batch.csv"));
    }

    #[test]
    fn resolve_maps_database_names_into_sqlite_root() {
        let target = DatasetRef::resolve("leads/acme/table.db", &roots()).expect("db ref");
        assert_eq!(target.source, DatasetSource::SqliteTable);
        assert_eq!(target.path, PathBuf::from("/data/leads/acme/table.db"));
    }

    #[test]
    fn resolve_rejects_unknown_and_escaping_names() {
        for name in [
            "lead-list/batch.json",
            "leads/acme/table.csv",
            "other/batch.csv",
            "lead-list/../secrets.csv",
            "lead-list//batch.csv",
            "lead-listbatch.csv",
        ] {
            assert!(DatasetRef::resolve(name, &roots()).is_none(), "{name}");
        }
    }
}
