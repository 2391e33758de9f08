//! Plain-text tables for terminal output.

use std::{borrow::Cow, fmt::Write as _};

/// Cell width used for data previews; longer cells are cut and end with `…`.
pub const MAX_CELL_WIDTH: usize = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    render(headers, rows, usize::MAX)
}

pub fn render_clipped(headers: &[String], rows: &[Vec<String>], max_width: usize) -> String {
    render(headers, rows, max_width.max(2))
}

pub fn print_table(headers: &[String], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

pub fn print_clipped(headers: &[String], rows: &[Vec<String>], max_width: usize) {
    print!("{}", render_clipped(headers, rows, max_width));
}

fn render(headers: &[String], rows: &[Vec<String>], limit: usize) -> String {
    let mut widths = headers
        .iter()
        .map(|h| display_width(h).min(limit))
        .collect::<Vec<_>>();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(display_width(cell).min(limit));
        }
    }
    let widths = widths.into_iter().map(|w| w.max(3)).collect::<Vec<_>>();

    // A column whose non-empty cells are all numbers is right-aligned.
    let aligns = (0..widths.len())
        .map(|idx| {
            let mut cells = rows
                .iter()
                .filter_map(|row| row.get(idx))
                .filter(|cell| !cell.is_empty())
                .peekable();
            if cells.peek().is_some() && cells.all(|cell| cell.trim().parse::<f64>().is_ok()) {
                Align::Right
            } else {
                Align::Left
            }
        })
        .collect::<Vec<_>>();

    let mut output = String::new();
    let header_aligns = vec![Align::Left; widths.len()];
    let _ = writeln!(output, "{}", format_row(headers, &widths, &header_aligns, limit));
    let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&rule, &widths, &header_aligns, limit));
    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths, &aligns, limit));
    }
    output
}

fn format_row(values: &[String], widths: &[usize], aligns: &[Align], limit: usize) -> String {
    let mut line = String::new();
    for (idx, width) in widths.iter().enumerate() {
        if idx > 0 {
            line.push_str("  ");
        }
        let cell = values.get(idx).map(|v| fit_cell(v, limit)).unwrap_or_default();
        let padding = " ".repeat(width.saturating_sub(display_width(&cell)));
        match aligns.get(idx) {
            Some(Align::Right) => {
                line.push_str(&padding);
                line.push_str(&cell);
            }
            _ => {
                line.push_str(&cell);
                line.push_str(&padding);
            }
        }
    }
    line.truncate(line.trim_end().len());
    line
}

fn fit_cell(value: &str, limit: usize) -> Cow<'_, str> {
    let cleaned = if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    };
    if display_width(&cleaned) <= limit {
        return cleaned;
    }
    let mut cut = cleaned
        .chars()
        .take(limit - 1)
        .collect::<String>();
    cut.push('…');
    Cow::Owned(cut)
}

fn display_width(value: &str) -> usize {
    value.chars().count()
}
