//! Bin-and-expand: discretize a continuous column straight into one-hot
//! indicator columns.

use log::info;

use crate::{
    binning::{BinOptions, bin},
    dataset::Dataset,
    encode::{ExpandOptions, one_hot_expand},
    error::Result,
};

/// Name of the intermediate categorical column written by [`bin_expand`].
pub fn bin_field_name(source: &str) -> String {
    format!("{source}_bin")
}

/// Bins `source` into `<source>_bin` and expands that column into indicators.
///
/// `options.drop_source` controls both whether `source` is removed and whether
/// the intermediate `<source>_bin` column is replaced by its indicators. Use
/// [`BinOptions::for_expansion`] for the usual defaults (drop enabled).
pub fn bin_expand(
    dataset: &mut Dataset,
    source: &str,
    labels: &[String],
    options: &BinOptions,
) -> Result<Vec<String>> {
    let output = bin_field_name(source);
    let spec = bin(dataset, source, &output, labels, options)?;
    let expand = ExpandOptions::default().replace(options.drop_source);
    let names = one_hot_expand(dataset, &output, &expand)?;
    info!(
        "Expanded '{source}' into {} bin indicator(s) over edges {:?}",
        names.len(),
        spec.edges
    );
    Ok(names)
}
