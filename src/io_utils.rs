//! I/O helpers shared by the codecs.
//!
//! - **Writer construction**: CSV writers quote only when a field needs it.
//! - **Decoding**: file bytes go through `encoding_rs` so a UTF-8 BOM is
//!   dropped and invalid sequences are rejected instead of replaced.
//! - **Atomic replace**: writes land in a sibling temp file that is renamed
//!   over the target once complete.

use std::{
    fs,
    io::{self, Write},
    path::Path,
};

use csv::{QuoteStyle, Terminator};
use encoding_rs::UTF_8;
use tempfile::NamedTempFile;

use crate::error::{DataError, DataResult};

pub const CSV_DELIMITER: u8 = b',';

pub fn open_csv_writer<W>(writer: W) -> csv::Writer<W>
where
    W: Write,
{
    let mut builder = csv::WriterBuilder::new();
    builder
        .delimiter(CSV_DELIMITER)
        .quote_style(QuoteStyle::Necessary)
        .double_quote(true)
        .terminator(Terminator::Any(b'\n'));
    builder.from_writer(writer)
}

pub fn read_bytes(path: &Path) -> DataResult<Vec<u8>> {
    fs::read(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => DataError::NotFound(path.display().to_string()),
        _ => DataError::io(path, err),
    })
}

pub fn decode_utf8(bytes: &[u8]) -> DataResult<String> {
    let (text, had_errors) = UTF_8.decode_with_bom_removal(bytes);
    if had_errors {
        Err(DataError::MalformedInput(
            "input is not valid UTF-8 text".to_string(),
        ))
    } else {
        Ok(text.into_owned())
    }
}

/// Replaces `path` with `contents` in one rename.
pub fn write_atomically(path: &Path, contents: &[u8]) -> DataResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir).map_err(|err| DataError::io(dir, err))?;
    temp.write_all(contents)
        .and_then(|_| temp.flush())
        .map_err(|err| DataError::io(temp.path(), err))?;
    temp.persist(path)
        .map_err(|err| DataError::io(path, err.error))?;
    Ok(())
}
