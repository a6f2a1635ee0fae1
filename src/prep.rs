//! Command executors for the binning, expansion, and cleaning subcommands.
//!
//! Each executor loads the input file into a [`Dataset`], applies one core
//! operation, and writes the result as delimited text.

use anyhow::{Context, Result, bail};
use log::info;

use crate::{
    binning::{BinOptions, BinSpec, bin},
    clean::fill_clean,
    cli::{
        BinArgs, BinExpandArgs, CleanArgs, EdgesArgs, ExpandArgs, InputArgs, LabelArgs,
        OutputArgs, PreviewArgs,
    },
    data::parse_fill_value,
    dataset::Dataset,
    edges::compute_bin_edges,
    encode::{ExpandOptions, full_expand},
    io_utils,
    labels::resolve_labels,
    pipeline::{bin_expand, bin_field_name},
    table,
};

pub fn execute_bin(args: &BinArgs) -> Result<()> {
    let (mut dataset, delimiter) = load(&args.input)?;
    let labels = resolve_labels(&args.labels.labels, args.labels.bins)?;
    let target = args
        .target
        .clone()
        .unwrap_or_else(|| bin_field_name(&args.source));
    let options = bin_options(&args.labels).drop_source(args.drop_source);
    let spec = bin(&mut dataset, &args.source, &target, &labels, &options)
        .with_context(|| format!("Binning column '{}'", args.source))?;
    info!(
        "Binned '{}' into '{}' using {} bin(s) with edges {:?}",
        args.source,
        target,
        spec.labels.len(),
        spec.edges
    );
    save(&dataset, &args.output, delimiter)
}

pub fn execute_bin_expand(args: &BinExpandArgs) -> Result<()> {
    let (mut dataset, delimiter) = load(&args.input)?;
    let labels = resolve_labels(&args.labels.labels, args.labels.bins)?;
    let options = bin_options(&args.labels).drop_source(!args.keep_source);
    let names = bin_expand(&mut dataset, &args.source, &labels, &options)
        .with_context(|| format!("Expanding bins for column '{}'", args.source))?;
    info!(
        "Generated {} indicator column(s) from '{}'",
        names.len(),
        args.source
    );
    save(&dataset, &args.output, delimiter)
}

pub fn execute_expand(args: &ExpandArgs) -> Result<()> {
    let (dataset, delimiter) = load(&args.input)?;
    let columns = clean_names(&args.columns);
    let mut options = ExpandOptions::default()
        .replace(!args.keep_source)
        .sort_labels(args.sort_labels);
    if !args.order.is_empty() {
        options = options.with_order(clean_names(&args.order));
    }
    let expanded = full_expand(&dataset, &columns, &options)
        .with_context(|| format!("Expanding column(s) {columns:?}"))?;
    info!(
        "Expanded {} column(s); output has {} column(s)",
        columns.len(),
        expanded.column_count()
    );
    save(&expanded, &args.output, delimiter)
}

pub fn execute_edges(args: &EdgesArgs) -> Result<()> {
    let (dataset, _) = load(&args.input)?;
    let labels = resolve_labels(&args.labels.labels, args.labels.bins)?;
    let options = bin_options(&args.labels);
    let column = dataset.column(&args.source)?;
    let edges = compute_bin_edges(
        column,
        labels.len(),
        options.scale,
        options.edges.as_deref(),
    )
    .with_context(|| format!("Computing edges for column '{}'", args.source))?;
    // Percentile edges may collapse; report only the bins that remain.
    let used = edges.len().saturating_sub(1).min(labels.len());
    if used == 0 {
        bail!(
            "Column '{}' does not have enough distinct values to form a bin",
            args.source
        );
    }
    let spec = BinSpec::new(edges, labels[..used].to_vec())?;
    print!("{}", table::render_bins(&spec));
    info!(
        "Computed {} bin(s) for '{}' using {:?} scale",
        used, args.source, options.scale
    );
    Ok(())
}

pub fn execute_clean(args: &CleanArgs) -> Result<()> {
    let (dataset, delimiter) = load(&args.input)?;
    let columns = clean_names(&args.columns);
    let fill = args.fill.as_deref().map(parse_fill_value);
    let cleaned = fill_clean(&dataset, &columns, fill.as_ref())
        .with_context(|| format!("Cleaning column(s) {columns:?}"))?;
    info!("Cleaned {} column(s)", columns.len());
    save(&cleaned, &args.output, delimiter)
}

pub fn execute_preview(args: &PreviewArgs) -> Result<()> {
    let (dataset, _) = load(&args.input)?;
    print!("{}", table::render_dataset(&dataset, args.rows));
    info!(
        "Displayed {} of {} row(s) from {:?}",
        dataset.row_count().min(args.rows),
        dataset.row_count(),
        args.input.input
    );
    Ok(())
}

fn bin_options(args: &LabelArgs) -> BinOptions {
    let options = BinOptions::default().with_scale(args.scale);
    if args.edges.is_empty() {
        options
    } else {
        options.with_edges(args.edges.clone())
    }
}

fn clean_names(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .map(|c| c.to_string())
        .collect()
}

fn load(args: &InputArgs) -> Result<(Dataset, u8)> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let dataset = io_utils::read_dataset(&args.input, delimiter, encoding)?;
    info!(
        "Loaded {} row(s) across {} column(s) from {:?}",
        dataset.row_count(),
        dataset.column_count(),
        args.input
    );
    Ok((dataset, delimiter))
}

fn save(dataset: &Dataset, args: &OutputArgs, input_delimiter: u8) -> Result<()> {
    let delimiter = io_utils::resolve_output_delimiter(
        args.output.as_deref(),
        args.output_delimiter,
        input_delimiter,
    );
    io_utils::write_dataset(dataset, args.output.as_deref(), delimiter, !args.no_header)
}
