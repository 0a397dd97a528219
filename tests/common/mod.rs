#![allow(dead_code)]

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use lead_inspector::config::CatalogRoots;
use rusqlite::Connection;
use tempfile::{TempDir, tempdir};

/// Scratch project directory laid out as `lead-list/` and `leads/`.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh project directory with both dataset roots present.
    pub fn new() -> Self {
        let workspace = Self {
            temp_dir: tempdir().expect("temp dir"),
        };
        fs::create_dir_all(workspace.roots().csv_root).expect("create csv root");
        fs::create_dir_all(workspace.roots().sqlite_root).expect("create sqlite root");
        workspace
    }

    /// Creates a project directory without any dataset roots.
    pub fn bare() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn roots(&self) -> CatalogRoots {
        CatalogRoots::under(self.temp_dir.path())
    }

    /// Writes a CSV file under `lead-list/` and returns its path.
    pub fn write_csv(&self, file_name: &str, contents: &str) -> PathBuf {
        let path = self.roots().csv_root.join(file_name);
        fs::write(&path, contents).expect("write csv fixture");
        path
    }

    /// Creates `leads/<dir>/table.db` with a `leads` table built from `sql`.
    pub fn write_database(&self, dir: &str, sql: &str) -> PathBuf {
        let folder = self.roots().sqlite_root.join(dir);
        fs::create_dir_all(&folder).expect("create dataset folder");
        let path = folder.join("table.db");
        let conn = Connection::open(&path).expect("open sqlite fixture");
        conn.execute_batch(sql).expect("seed sqlite fixture");
        path
    }

    /// Writes an arbitrary file relative to the project directory.
    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(&path, contents).expect("write file");
        path
    }
}

/// Pins a file's modification time to `secs_ago` seconds in the past.
pub fn set_age(path: &Path, secs_ago: u64) {
    let when = SystemTime::now() - Duration::from_secs(secs_ago);
    File::options()
        .write(true)
        .open(path)
        .expect("open for mtime")
        .set_modified(when)
        .expect("set mtime");
}
