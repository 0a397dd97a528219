//! Tabular record model shared by both storage formats.
//!
//! Every value is text. A [`Dataset`] keeps its column order explicitly
//! because the row maps themselves carry no order; CSV headers, declared
//! SQLite columns, and the key order of the first JSON record all feed it.

use std::{borrow::Cow, collections::BTreeMap};

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

pub type Row = BTreeMap<String, String>;

/// Ordered, de-duplicated column names a write operation will use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnSet(Vec<String>);

impl ColumnSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut columns: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            if !columns.contains(&name) {
                columns.push(name);
            }
        }
        ColumnSet(columns)
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|c| c == name)
    }

    /// Values of `row` laid out in column order, missing keys as empty strings.
    pub fn project<'a>(&'a self, row: &'a Row) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .map(move |column| row.get(column).map(String::as_str).unwrap_or(""))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dataset {
    columns: ColumnSet,
    rows: Vec<Row>,
}

impl Dataset {
    pub fn new(columns: ColumnSet, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a dataset from loosely-typed JSON objects, taking column order
    /// from the first record.
    pub fn from_records(records: Vec<Map<String, JsonValue>>) -> Self {
        let columns = records
            .first()
            .map(|first| ColumnSet::new(first.keys().cloned()))
            .unwrap_or_default();
        let rows = records
            .into_iter()
            .map(|record| {
                record
                    .into_iter()
                    .map(|(key, value)| (key, json_to_text(value)))
                    .collect::<Row>()
            })
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell value for `column` in row `index`; a missing key reads as "".
    pub fn cell(&self, index: usize, column: &str) -> Option<&str> {
        self.rows
            .get(index)
            .map(|row| row.get(column).map(String::as_str).unwrap_or(""))
    }

    /// Rows as positional records following the column order.
    pub fn records(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| self.columns.project(row).map(str::to_string).collect())
            .collect()
    }

    pub fn head(&self, count: usize) -> Dataset {
        Dataset {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(count).cloned().collect(),
        }
    }

    /// Keeps rows where any cell contains `query`, ignoring case.
    pub fn filter_matching(&self, query: &str) -> Dataset {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.clone();
        }
        let rows = self
            .rows
            .iter()
            .filter(|row| {
                row.values()
                    .any(|value| value.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect();
        Dataset {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Stable lexical sort on one column. Unknown columns leave order untouched.
    pub fn sort_by(&mut self, column: &str, descending: bool) {
        if !self.columns.contains(column) {
            return;
        }
        self.rows.sort_by(|a, b| {
            let left = a.get(column).map(String::as_str).unwrap_or("");
            let right = b.get(column).map(String::as_str).unwrap_or("");
            let ordering = left.cmp(right);
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
    }
}

fn json_to_text(value: JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s,
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Parses a `column[:asc|desc]` sort directive.
pub fn parse_sort_directive(raw: &str) -> (Cow<'_, str>, bool) {
    match raw.rsplit_once(':') {
        Some((column, dir)) if dir.eq_ignore_ascii_case("desc") => (Cow::Borrowed(column), true),
        Some((column, dir)) if dir.eq_ignore_ascii_case("asc") => (Cow::Borrowed(column), false),
        _ => (Cow::Borrowed(raw), false),
    }
}
