//! CSV text to [`Dataset`] and back.
//!
//! Reading splits fields on commas outside quotes. A `"` anywhere in a field
//! toggles quoted mode and is not kept; inside quoted mode `""` stands for one
//! literal quote and newlines belong to the field. Each field is trimmed after
//! splitting. Short rows are padded with empty strings and surplus fields are
//! dropped. A blank line between records is a row of empty values.
//!
//! Writing quotes a field only when it contains a comma, a newline or a double
//! quote. Header names follow the same rule so they read back unchanged.

use std::path::Path;

use log::debug;

use crate::{
    dataset::{ColumnSet, Dataset, Row},
    error::{DataError, DataResult},
    io_utils,
};

pub fn decode(text: &str) -> DataResult<Dataset> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Dataset::empty());
    }

    let mut records = split_records(text)?.into_iter();
    let headers = records.next().unwrap_or_default();

    let rows = records
        .map(|record| {
            headers
                .iter()
                .enumerate()
                .map(|(col, header)| {
                    let value = record.get(col).cloned().unwrap_or_default();
                    (header.clone(), value)
                })
                .collect::<Row>()
        })
        .collect();

    Ok(Dataset::new(ColumnSet::new(headers), rows))
}

pub fn encode(dataset: &Dataset) -> DataResult<String> {
    if dataset.is_empty() {
        return Ok(String::new());
    }
    let columns = dataset.columns();
    let mut writer = io_utils::open_csv_writer(Vec::new());
    writer
        .write_record(columns.names())
        .map_err(|err| DataError::MalformedInput(format!("Writing header: {err}")))?;
    for (idx, row) in dataset.rows().iter().enumerate() {
        writer
            .write_record(columns.project(row))
            .map_err(|err| DataError::MalformedInput(format!("Writing row {}: {err}", idx + 2)))?;
    }
    let mut bytes = writer
        .into_inner()
        .map_err(|err| DataError::MalformedInput(format!("Flushing CSV output: {err}")))?;
    if bytes.last() == Some(&b'\n') {
        bytes.pop();
    }
    String::from_utf8(bytes).map_err(|err| DataError::MalformedInput(err.to_string()))
}

pub fn read_file(path: &Path) -> DataResult<Dataset> {
    let bytes = io_utils::read_bytes(path)?;
    let text = io_utils::decode_utf8(&bytes)?;
    let dataset = decode(&text).map_err(|err| match err {
        DataError::MalformedInput(reason) => {
            DataError::MalformedInput(format!("{}: {reason}", path.display()))
        }
        other => other,
    })?;
    debug!(
        "Decoded {} row(s) across {} column(s) from {:?}",
        dataset.len(),
        dataset.columns().len(),
        path
    );
    Ok(dataset)
}

/// Replaces the file at `path`. Zero rows leave the file untouched.
pub fn write_file(path: &Path, dataset: &Dataset) -> DataResult<()> {
    if dataset.is_empty() {
        debug!("Skipping CSV write to {:?}: no rows", path);
        return Ok(());
    }
    let text = encode(dataset)?;
    io_utils::write_atomically(path, text.as_bytes())?;
    debug!("Wrote {} row(s) to {:?}", dataset.len(), path);
    Ok(())
}

// Input ending inside quoted mode is an error naming the line the quote opened on.
fn split_records(text: &str) -> DataResult<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut quoted_since: Option<usize> = None;
    let mut line = 1usize;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match (ch, quoted_since) {
            ('"', Some(_)) if chars.peek() == Some(&'"') => {
                chars.next();
                current.push('"');
            }
            ('"', Some(_)) => quoted_since = None,
            ('"', None) => quoted_since = Some(line),
            ('\n', Some(_)) => {
                line += 1;
                current.push('\n');
            }
            ('\n', None) => {
                line += 1;
                fields.push(take_field(&mut current));
                records.push(std::mem::take(&mut fields));
            }
            (',', None) => fields.push(take_field(&mut current)),
            _ => current.push(ch),
        }
    }

    if let Some(start) = quoted_since {
        return Err(DataError::MalformedInput(format!(
            "unterminated quoted field starting on line {start}"
        )));
    }
    fields.push(take_field(&mut current));
    records.push(fields);
    Ok(records)
}

fn take_field(current: &mut String) -> String {
    let field = current.trim().to_string();
    current.clear();
    field
}
