//! Assignment of numeric values to labeled intervals.
//!
//! Intervals are half-open `[e[i], e[i+1])` except the last one, which is
//! closed on both ends so the column maximum (always the final edge) lands in
//! the top bin. Values outside the edges, missing cells, and `NaN` produce a
//! missing label.

use itertools::Itertools;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{
    dataset::{Categorical, Column, ColumnData, Dataset},
    edges::{BinScale, compute_bin_edges},
    error::{PrepError, Result},
};

/// Edges and labels applied by a binning call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinSpec {
    pub edges: Vec<f64>,
    pub labels: Vec<String>,
}

impl BinSpec {
    /// Pairs `edges` with `labels`, enforcing `edges.len() == labels.len() + 1`
    /// and strictly increasing edges.
    pub fn new(edges: Vec<f64>, labels: Vec<String>) -> Result<Self> {
        if labels.is_empty() {
            return Err(PrepError::EmptyLabels);
        }
        if edges.len() != labels.len() + 1 {
            return Err(PrepError::ShapeMismatch {
                edges: edges.len(),
                labels: labels.len(),
            });
        }
        if !edges.iter().tuple_windows().all(|(a, b)| a < b) {
            return Err(PrepError::domain(format!(
                "bin edges must increase monotonically: {edges:?}"
            )));
        }
        Ok(Self { edges, labels })
    }

    /// Index of the interval holding `value`, if any.
    pub fn interval_of(&self, value: f64) -> Option<usize> {
        let last = self.edges.len() - 1;
        if value.is_nan() || value < self.edges[0] || value > self.edges[last] {
            return None;
        }
        let idx = self.edges.partition_point(|edge| *edge <= value);
        Some(idx.min(last) - 1)
    }

    /// Encodes `values` into an ordered categorical over the bin labels.
    pub fn assign(&self, values: &[Option<f64>]) -> Categorical {
        let codes = values
            .iter()
            .map(|value| value.and_then(|v| self.interval_of(v)))
            .collect();
        Categorical::new(self.labels.clone(), codes, true)
    }
}

/// Options for [`bin`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BinOptions {
    /// Explicit edges; when absent they are computed from `scale`.
    #[serde(default)]
    pub edges: Option<Vec<f64>>,
    #[serde(default)]
    pub scale: BinScale,
    #[serde(default)]
    pub drop_source: bool,
}

impl BinOptions {
    /// Defaults for bin-and-expand: linear scale, computed edges, source dropped.
    pub fn for_expansion() -> Self {
        Self::default().drop_source(true)
    }

    pub fn with_edges(mut self, edges: Vec<f64>) -> Self {
        self.edges = Some(edges);
        self
    }

    pub fn with_scale(mut self, scale: BinScale) -> Self {
        self.scale = scale;
        self
    }

    pub fn drop_source(mut self, drop_source: bool) -> Self {
        self.drop_source = drop_source;
        self
    }
}

/// Bins `source` into a categorical `output` column using `labels`.
pub fn bin(
    dataset: &mut Dataset,
    source: &str,
    output: &str,
    labels: &[String],
    options: &BinOptions,
) -> Result<BinSpec> {
    let column = dataset.column(source)?;
    let values = column.numeric_values()?;
    if labels.is_empty() {
        return Err(PrepError::EmptyLabels);
    }
    if !labels.iter().all_unique() {
        return Err(PrepError::domain(format!(
            "bin labels must be unique: {labels:?}"
        )));
    }

    let edges = compute_bin_edges(
        column,
        labels.len(),
        options.scale,
        options.edges.as_deref(),
    )?;
    if edges.len() < 2 {
        return Err(PrepError::domain(format!(
            "column '{source}' does not have enough distinct values to form a bin"
        )));
    }
    let used = edges.len() - 1;
    if used < labels.len() {
        warn!(
            "Percentile edges for '{source}' collapsed to {used} bin(s); using labels {:?}",
            &labels[..used]
        );
    }
    let spec = BinSpec::new(edges, labels[..used].to_vec())?;

    let categorical = spec.assign(&values);
    let replaced = dataset.set_column(Column::new(output, ColumnData::Categorical(categorical)))?;
    if replaced {
        warn!("Binning overwrote existing column '{output}'");
    }
    if options.drop_source {
        if source == output {
            warn!("Keeping '{source}' because it was overwritten by the binned output");
        } else {
            dataset.drop_column(source)?;
        }
    }
    debug!(
        "Binned '{source}' into '{output}' with edges {:?}",
        spec.edges
    );
    Ok(spec)
}
