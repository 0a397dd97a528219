//! Plain-text grid rendering and value formatting for terminal output.

use std::fmt::Write as _;

/// Cells wider than this are cut and end with an ellipsis.
pub const MAX_CELL_WIDTH: usize = 40;

const COLUMN_GAP: &str = "  ";

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let header_cells: Vec<String> = headers.iter().map(|h| clip_cell(h)).collect();
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            (0..headers.len())
                .map(|idx| row.get(idx).map(|c| clip_cell(c)).unwrap_or_default())
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = header_cells.iter().map(|h| h.chars().count().max(1)).collect();
    for row in &body {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", join_padded(&header_cells, &widths));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(output, "{}", join_padded(&rule, &widths));
    for row in &body {
        let _ = writeln!(output, "{}", join_padded(row, &widths));
    }
    output
}

pub fn print_table(headers: &[String], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

/// One decimal place with halves rounded away from zero (`6.25` → `"6.3"`).
pub fn format_tenths(value: f64) -> String {
    format!("{:.1}", (value * 10.0).round() / 10.0)
}

fn join_padded(cells: &[String], widths: &[usize]) -> String {
    let mut line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(COLUMN_GAP);
    let trimmed = line.trim_end().len();
    line.truncate(trimmed);
    line
}

fn clip_cell(value: &str) -> String {
    let flat: String = value
        .chars()
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .collect();
    if flat.chars().count() <= MAX_CELL_WIDTH {
        return flat;
    }
    let mut clipped: String = flat.chars().take(MAX_CELL_WIDTH - 1).collect();
    clipped.push('…');
    clipped
}
