//! Plain-text rendering of datasets and bin specifications for the terminal.

use std::fmt::Write as _;

use crate::{binning::BinSpec, data::format_float, dataset::Dataset};

/// Renders the first `limit` rows of `dataset` under a `name` / `type` header.
pub fn render_dataset(dataset: &Dataset, limit: usize) -> String {
    let names = dataset
        .columns()
        .iter()
        .map(|c| c.name.clone())
        .collect::<Vec<_>>();
    let types = dataset
        .columns()
        .iter()
        .map(|c| c.column_type().to_string())
        .collect::<Vec<_>>();
    let rows = (0..dataset.row_count().min(limit))
        .map(|row| dataset.row_display(row))
        .collect::<Vec<_>>();
    render(&[names, types], &rows)
}

/// Renders one line per bin: label, lower edge, upper edge, and interval form.
pub fn render_bins(spec: &BinSpec) -> String {
    let header = ["label", "lower", "upper", "interval"].map(String::from).to_vec();
    let last = spec.labels.len().saturating_sub(1);
    let rows = spec
        .labels
        .iter()
        .enumerate()
        .map(|(idx, label)| {
            let lower = format_float(spec.edges[idx]);
            let upper = format_float(spec.edges[idx + 1]);
            let closing = if idx == last { ']' } else { ')' };
            let interval = format!("[{lower}, {upper}{closing}");
            vec![label.clone(), lower, upper, interval]
        })
        .collect::<Vec<_>>();
    render(&[header], &rows)
}

fn render(headers: &[Vec<String>], rows: &[Vec<String>]) -> String {
    let column_count = headers.first().map(Vec::len).unwrap_or(0);
    let mut widths = vec![1usize; column_count];
    for line in headers.iter().chain(rows) {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell_width(cell));
        }
    }

    let mut output = String::new();
    for header in headers {
        let _ = writeln!(output, "{}", format_line(header, &widths));
    }
    let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_line(&rule, &widths));
    for row in rows {
        let _ = writeln!(output, "{}", format_line(row, &widths));
    }
    output
}

fn format_line(cells: &[String], widths: &[usize]) -> String {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let cell = cell.replace(['\n', '\r', '\t'], " ");
            let padding = width.saturating_sub(cell_width(&cell));
            format!("{cell}{}", " ".repeat(padding))
        })
        .collect::<Vec<_>>()
        .join("  ");
    line.trim_end().to_string()
}

fn cell_width(cell: &str) -> usize {
    cell.chars().count()
}
