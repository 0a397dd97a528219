use std::path::{Path, PathBuf};

use serde::Serialize;

pub const CSV_ROOT_DIR: &str = "lead-list";
pub const SQLITE_ROOT_DIR: &str = "leads";

/// The two directories the catalog scans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogRoots {
    /// Flat directory of `.csv` files.
    pub csv_root: PathBuf,
    /// Directory of per-dataset subdirectories, each holding one database.
    pub sqlite_root: PathBuf,
}

impl CatalogRoots {
    pub fn new(csv_root: impl Into<PathBuf>, sqlite_root: impl Into<PathBuf>) -> Self {
        Self {
            csv_root: csv_root.into(),
            sqlite_root: sqlite_root.into(),
        }
    }

    /// Conventional layout below a project directory.
    pub fn under(base: &Path) -> Self {
        Self::new(base.join(CSV_ROOT_DIR), base.join(SQLITE_ROOT_DIR))
    }

    /// Resolves the roots from a base directory plus optional overrides.
    pub fn resolve(base: &Path, csv_root: Option<&Path>, sqlite_root: Option<&Path>) -> Self {
        let defaults = Self::under(base);
        Self {
            csv_root: csv_root.map(Path::to_path_buf).unwrap_or(defaults.csv_root),
            sqlite_root: sqlite_root
                .map(Path::to_path_buf)
                .unwrap_or(defaults.sqlite_root),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_prefers_explicit_overrides() {
        let roots = CatalogRoots::resolve(Path::new("/data"), None, Some(Path::new("/db")));
        assert_eq!(roots.csv_root, PathBuf::from("/data/lead-list"));
        assert_eq!(roots.sqlite_root, PathBuf::from("/db"));
    }
}
