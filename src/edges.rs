//! Bin edge computation.
//!
//! Edges are derived from the observed values of a numeric column under one
//! of four modes:
//!
//! - **explicit**: caller-supplied edges, with the final edge pinned to the
//!   column maximum so the largest value is never excluded;
//! - **linear**: evenly spaced points between the minimum and maximum;
//! - **log**: evenly spaced points in log10 space (minimum must be positive);
//! - **auto**: evenly spaced percentile ranks, deduplicated.
//!
//! Missing cells and `NaN` floats are ignored when measuring a column.

use clap::ValueEnum;
use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    dataset::Column,
    error::{PrepError, Result},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BinScale {
    #[default]
    Linear,
    Log,
    #[serde(alias = "percentile")]
    #[value(alias = "percentile")]
    Auto,
}

/// Keeps the first occurrence of every distinct edge, preserving order.
pub fn dedup_edges(edges: &[f64]) -> Vec<f64> {
    edges
        .iter()
        .copied()
        // Adding 0.0 folds -0.0 into 0.0 so both zeros share one key.
        .unique_by(|edge| (edge + 0.0).to_bits())
        .collect()
}

/// Linear-interpolation percentile of already sorted values, `rank` in `0..=100`.
pub fn percentile(sorted: &[f64], rank: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = (rank / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// Computes `label_count + 1` edges for `column`, or validates `explicit` ones.
pub fn compute_bin_edges(
    column: &Column,
    label_count: usize,
    scale: BinScale,
    explicit: Option<&[f64]>,
) -> Result<Vec<f64>> {
    let values = column.numeric_values()?;
    if label_count == 0 {
        return Err(PrepError::EmptyLabels);
    }
    let mut observed = values
        .into_iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .collect::<Vec<_>>();
    if observed.is_empty() {
        return Err(PrepError::domain(format!(
            "column '{}' has no values to bin",
            column.name
        )));
    }
    observed.sort_by(f64::total_cmp);
    let min = observed[0];
    let max = observed[observed.len() - 1];

    let edges = match explicit {
        Some(edges) => explicit_edges(edges, label_count, max)?,
        None => match scale {
            BinScale::Linear => linear_edges(min, max, label_count),
            BinScale::Log => log_edges(&column.name, min, max, label_count)?,
            BinScale::Auto => percentile_edges(&observed, label_count),
        },
    };
    debug!(
        "Computed {} edge(s) for column '{}': {:?}",
        edges.len(),
        column.name,
        edges
    );
    Ok(edges)
}

fn explicit_edges(edges: &[f64], label_count: usize, max: f64) -> Result<Vec<f64>> {
    if edges.len() != label_count + 1 {
        return Err(PrepError::ShapeMismatch {
            edges: edges.len(),
            labels: label_count,
        });
    }
    let mut edges = edges.to_vec();
    if let Some(last) = edges.last_mut()
        && *last != max
    {
        debug!("Overriding final edge {last} with observed maximum {max}");
        *last = max;
    }
    Ok(edges)
}

fn linear_edges(min: f64, max: f64, label_count: usize) -> Vec<f64> {
    let step = (max - min) / label_count as f64;
    let mut edges = (0..=label_count)
        .map(|i| min + step * i as f64)
        .collect::<Vec<_>>();
    edges[label_count] = max;
    edges
}

fn log_edges(name: &str, min: f64, max: f64, label_count: usize) -> Result<Vec<f64>> {
    if min <= 0.0 {
        return Err(PrepError::domain(format!(
            "log scale requires positive values but column '{name}' has minimum {min}"
        )));
    }
    let mut edges = linear_edges(min.log10(), max.log10(), label_count)
        .into_iter()
        .map(|exponent| 10f64.powf(exponent))
        .collect::<Vec<_>>();
    edges[0] = min;
    edges[label_count] = max;
    Ok(edges)
}

fn percentile_edges(sorted: &[f64], label_count: usize) -> Vec<f64> {
    // Step stays floor(100 / n) even when it does not divide 100 evenly.
    let step = 100 / label_count;
    let mut edges = (0..label_count)
        .filter_map(|i| percentile(sorted, (i * step) as f64))
        .collect::<Vec<_>>();
    edges.push(sorted[sorted.len() - 1]);
    dedup_edges(&edges)
}
