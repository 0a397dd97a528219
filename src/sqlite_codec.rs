//! Single-table SQLite storage.
//!
//! Each database file holds one table, [`TABLE_NAME`], with every column typed
//! as TEXT. Reads stringify whatever the table holds; writes replace the
//! table wholesale inside one transaction.

use std::{path::Path, time::Duration};

use log::{debug, info};
use rusqlite::{Connection, OpenFlags, OptionalExtension, types::ValueRef};

use crate::{
    dataset::{ColumnSet, Dataset, Row},
    error::{DataError, DataResult},
};

pub const TABLE_NAME: &str = "leads";
pub const DATABASE_FILE_NAME: &str = "table.db";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub fn decode(path: &Path) -> DataResult<Dataset> {
    let conn = open(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;

    // Opening is lazy; the first statement is what fails on a corrupt file.
    let table_exists = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [TABLE_NAME],
            |_| Ok(()),
        )
        .optional()
        .map_err(|err| DataError::storage(path, err))?
        .is_some();
    if !table_exists {
        return Err(DataError::NotFound(format!(
            "table '{TABLE_NAME}' in {}",
            path.display()
        )));
    }

    let mut stmt = conn
        .prepare(&format!("SELECT * FROM {}", quote_identifier(TABLE_NAME)))
        .map_err(|err| DataError::storage(path, err))?;
    let column_names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

    let mut rows = Vec::new();
    let mut cursor = stmt.query([]).map_err(|err| DataError::storage(path, err))?;
    while let Some(record) = cursor.next().map_err(|err| DataError::storage(path, err))? {
        let mut row = Row::new();
        for (idx, name) in column_names.iter().enumerate() {
            let value = record
                .get_ref(idx)
                .map_err(|err| DataError::MalformedInput(format!("column '{name}': {err}")))?;
            row.insert(name.clone(), value_to_text(value));
        }
        rows.push(row);
    }

    debug!("Read {} row(s) from {:?}", rows.len(), path);
    Ok(Dataset::new(ColumnSet::new(column_names), rows))
}

/// Replaces the table with `dataset`. Zero rows leave the database untouched.
pub fn encode(path: &Path, dataset: &Dataset) -> DataResult<()> {
    if dataset.is_empty() {
        debug!("Skipping table rewrite for {:?}: no rows", path);
        return Ok(());
    }
    if dataset.columns().is_empty() {
        return Err(DataError::MalformedInput(format!(
            "cannot write {} row(s) without columns to {}",
            dataset.len(),
            path.display()
        )));
    }
    let mut conn = open(
        path,
        OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
    )?;
    rewrite_table(&mut conn, dataset.columns(), dataset.rows())
        .map_err(|err| DataError::storage(path, err))?;
    info!(
        "Rewrote table '{TABLE_NAME}' in {:?} with {} row(s) and {} column(s)",
        path,
        dataset.len(),
        dataset.columns().len()
    );
    Ok(())
}

// Dropping the transaction without commit rolls back, so any error below
// leaves the previous table in place.
fn rewrite_table(conn: &mut Connection, columns: &ColumnSet, rows: &[Row]) -> rusqlite::Result<()> {
    let table = quote_identifier(TABLE_NAME);
    let quoted: Vec<String> = columns.names().iter().map(|c| quote_identifier(c)).collect();
    let definitions = quoted
        .iter()
        .map(|c| format!("{c} TEXT"))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = vec!["?"; quoted.len()].join(", ");

    let tx = conn.transaction()?;
    tx.execute(&format!("DROP TABLE IF EXISTS {table}"), [])?;
    tx.execute(&format!("CREATE TABLE {table} ({definitions})"), [])?;
    {
        let mut insert = tx.prepare(&format!(
            "INSERT INTO {table} ({}) VALUES ({placeholders})",
            quoted.join(", ")
        ))?;
        for row in rows {
            insert.execute(rusqlite::params_from_iter(columns.project(row)))?;
        }
    }
    tx.commit()
}

fn open(path: &Path, flags: OpenFlags) -> DataResult<Connection> {
    let conn = Connection::open_with_flags(path, flags | OpenFlags::SQLITE_OPEN_NO_MUTEX)
        .map_err(|err| DataError::storage(path, err))?;
    conn.busy_timeout(BUSY_TIMEOUT)
        .map_err(|err| DataError::storage(path, err))?;
    Ok(conn)
}

fn value_to_text(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => String::from_utf8_lossy(bytes).into_owned(),
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_identifier_doubles_embedded_quotes() {
        assert_eq!(quote_identifier("plain"), "\"plain\"");
        assert_eq!(quote_identifier("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn value_to_text_stringifies_every_storage_class() {
        assert_eq!(value_to_text(ValueRef::Null), "");
        assert_eq!(value_to_text(ValueRef::Integer(42)), "42");
        assert_eq!(value_to_text(ValueRef::Real(1.5)), "1.5");
        assert_eq!(value_to_text(ValueRef::Text(b"Ada")), "Ada");
    }

    #[test]
    fn rewrite_failure_keeps_previous_table() {
        let mut conn = Connection::open_in_memory().expect("memory db");
        conn.execute_batch("CREATE TABLE leads (\"name\" TEXT); INSERT INTO leads VALUES ('Ada');")
            .expect("seed");

        // A column set with an empty identifier list cannot be created.
        let result = rewrite_table(&mut conn, &ColumnSet::default(), &[Row::new()]);
        assert!(result.is_err());

        let name: String = conn
            .query_row("SELECT name FROM leads", [], |row| row.get(0))
            .expect("previous row survives");
        assert_eq!(name, "Ada");
    }
}
